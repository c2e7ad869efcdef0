//! Hot-module-reload instrumentation for web component modules
//!
//! This crate rewrites JavaScript modules so a dev server can hot-replace
//! custom element classes:
//! - **Parser**: a JavaScript module lexer, parser and AST (`parser` module)
//! - **Transform**: base class resolution, registration injection and the
//!   module prologue (`transform` module)
//! - **Codegen**: splices synthesized statements into the original text
//!   (`codegen` module)
//! - **Hosting**: configuration, virtual module paths and built-in patches
//!   for dev servers embedding the transform
//!
//! # Example
//!
//! ```rust,ignore
//! use wc_hmr_engine::{BaseClassDescriptor, HmrConfig, Transformer};
//! use std::path::Path;
//!
//! let config = HmrConfig::new(
//!     "/home/me/app",
//!     vec![BaseClassDescriptor::global("HTMLElement")],
//! )?;
//! let transformer = Transformer::new(config);
//!
//! let code = transformer.transform(
//!     "class MyElement extends HTMLElement {}\n",
//!     Path::new("src/my-element.js"),
//! )?;
//! ```

#![warn(rust_2018_idioms)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::module_inception)]

// ============================================================================
// Core Modules
// ============================================================================

/// JavaScript module front end: lexer, parser and AST
pub mod parser;

/// Base class resolution, registration injection and orchestration
pub mod transform;

/// Re-serialization of transformed modules
pub mod codegen;

// ============================================================================
// Hosting
// ============================================================================

/// Options and validated configuration
pub mod config;

/// Error types
pub mod error;

/// Virtual module namespace served by the host
pub mod virtual_modules;

/// Built-in base class patches
pub mod patches;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{BaseClassDescriptor, ConfigFormat, HmrConfig, HmrOptions, Origin};
pub use error::{ConfigError, ServeError, SyntaxError, TransformError};
pub use transform::{transform, TransformOutput, Transformer};
pub use virtual_modules::{is_virtual_module, should_transform, VirtualModule};
