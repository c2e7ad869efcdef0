//! Hot-reload instrumentation of one module
//!
//! [`Transformer`] parses a module, resolves which local names denote base
//! classes, registers every class extending one of them and, when anything
//! was registered, opens the module with the patch imports, the runtime
//! import and a `import.meta.hot.accept` guard. A module with nothing to
//! register comes back byte-identical.
//!
//! # Example
//!
//! ```ignore
//! use wc_hmr_engine::{BaseClassDescriptor, HmrConfig, Transformer};
//! use std::path::Path;
//!
//! let config = HmrConfig::new("/app", vec![BaseClassDescriptor::lit_element()]).unwrap();
//! let transformer = Transformer::new(config);
//! let code = transformer
//!     .transform(
//!         "import { LitElement } from 'lit-element';\nclass A extends LitElement {}\n",
//!         Path::new("/app/src/a.js"),
//!     )
//!     .unwrap();
//! assert!(code.contains("__$wc_hmr$__.register(import.meta.url, A);"));
//! ```

pub mod inject;
pub mod resolver;
pub mod synthetic;

use crate::codegen;
use crate::config::{normalize_path, HmrConfig, HmrOptions};
use crate::error::{SyntaxError, TransformError};
use crate::parser::parser::guards::{DEEP_STACK_SIZE, MAX_DEEP_PARSE_DEPTH, MAX_PARSE_DEPTH};
use crate::parser::{ParseError, Parser};
use std::path::{Path, PathBuf};

pub use inject::{inject_registrations, mixin_root};
pub use resolver::{descriptors_for_import, resolve_base_classes, ResolvedBaseClasses};
pub use synthetic::Synthesizer;

/// Result of transforming one module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    /// Transformed source (the input itself when nothing was registered)
    pub code: String,

    /// Registered class names, in discovery order
    pub registered: Vec<String>,

    /// Patch indices imported by the prologue
    pub patches: Vec<usize>,
}

impl TransformOutput {
    fn unchanged(source: &str) -> Self {
        Self {
            code: source.to_string(),
            registered: Vec::new(),
            patches: Vec::new(),
        }
    }

    pub fn is_changed(&self) -> bool {
        !self.registered.is_empty()
    }
}

/// Applies one [`HmrConfig`] to any number of modules.
///
/// Holds no per-module state; share it across threads freely.
#[derive(Debug, Clone)]
pub struct Transformer {
    config: HmrConfig,
}

impl Transformer {
    pub fn new(config: HmrConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HmrConfig {
        &self.config
    }

    /// Transform `source`, returning the new module text.
    pub fn transform(&self, source: &str, module_path: &Path) -> Result<String, TransformError> {
        Ok(self.transform_module(source, module_path)?.code)
    }

    /// Transform `source`, also reporting what was registered.
    ///
    /// A relative `module_path` is taken relative to the project root.
    /// Modules nesting past the inline parse limit are retried on a thread
    /// with a large stack.
    pub fn transform_module(&self, source: &str, module_path: &Path) -> Result<TransformOutput, SyntaxError> {
        let module_path = self.absolute_module_path(module_path);

        match self.instrument(source, &module_path, MAX_PARSE_DEPTH) {
            Err(ParseFailure::TooDeep(err)) => {
                tracing::debug!(
                    module = %module_path.display(),
                    "module nests deeper than {} levels, retrying on a deep stack",
                    MAX_PARSE_DEPTH
                );
                self.instrument_on_deep_stack(source, &module_path).unwrap_or(Err(err))
            }
            result => result.map_err(ParseFailure::into_error),
        }
    }

    /// Run [`Transformer::instrument`] on a [`DEEP_STACK_SIZE`] thread.
    ///
    /// `None` if the thread could not be spawned.
    fn instrument_on_deep_stack(&self, source: &str, module_path: &Path) -> Option<Result<TransformOutput, SyntaxError>> {
        std::thread::scope(|scope| {
            let handle = std::thread::Builder::new()
                .name("wc-hmr-deep-parse".to_string())
                .stack_size(DEEP_STACK_SIZE)
                .spawn_scoped(scope, || self.instrument(source, module_path, MAX_DEEP_PARSE_DEPTH))
                .ok()?;
            match handle.join() {
                Ok(result) => Some(result.map_err(ParseFailure::into_error)),
                Err(panic) => std::panic::resume_unwind(panic),
            }
        })
    }

    /// Parse, resolve, inject and re-serialize, nesting at most `max_depth`
    /// levels deep. The module AST never outlives this call.
    fn instrument(&self, source: &str, module_path: &Path, max_depth: usize) -> Result<TransformOutput, ParseFailure> {
        let parser = Parser::new(source)
            .map_err(|errors| {
                ParseFailure::Invalid(match errors.first() {
                    Some(err) => SyntaxError::from_lex_error(err, module_path.to_path_buf()),
                    None => unknown_syntax_error(module_path),
                })
            })?
            .with_max_depth(max_depth);
        let (mut module, mut interner) = parser.parse().map_err(|errors| {
            let too_deep = errors.iter().any(ParseError::is_nesting_limit);
            let error = match errors.first() {
                Some(err) => SyntaxError::from_parse_error(err, module_path.to_path_buf()),
                None => unknown_syntax_error(module_path),
            };
            if too_deep {
                ParseFailure::TooDeep(error)
            } else {
                ParseFailure::Invalid(error)
            }
        })?;

        let base_classes = resolve_base_classes(&module, &interner, &self.config, module_path);
        if base_classes.is_empty() {
            return Ok(TransformOutput::unchanged(source));
        }

        let synth = Synthesizer::new(&mut interner);
        let registered = inject_registrations(&mut module, &interner, &base_classes, &synth);
        if registered.is_empty() {
            return Ok(TransformOutput::unchanged(source));
        }

        let prologue = synth.prologue(&mut interner, &base_classes.patches);
        module.statements.splice(0..0, prologue);

        let code = codegen::generate(source, &module, &interner);
        let registered: Vec<String> = registered
            .iter()
            .map(|class| interner.resolve(class.name).to_string())
            .collect();

        tracing::debug!(
            module = %module_path.display(),
            registrations = registered.len(),
            patches = ?base_classes.patches,
            "instrumented module"
        );

        Ok(TransformOutput {
            code,
            registered,
            patches: base_classes.patches,
        })
    }

    fn absolute_module_path(&self, module_path: &Path) -> PathBuf {
        normalize_path(&self.config.project_root().join(module_path))
    }
}

/// Why a parse attempt failed
enum ParseFailure {
    /// Nesting hit the attempt's depth limit
    TooDeep(SyntaxError),
    Invalid(SyntaxError),
}

impl ParseFailure {
    fn into_error(self) -> SyntaxError {
        match self {
            ParseFailure::TooDeep(err) | ParseFailure::Invalid(err) => err,
        }
    }
}

fn unknown_syntax_error(module_path: &Path) -> SyntaxError {
    SyntaxError {
        message: "Module could not be parsed".to_string(),
        hint: None,
        file_path: module_path.to_path_buf(),
        line: 1,
        column: 1,
        offset: 0,
    }
}

/// Validate `options` and transform one module.
///
/// Hosts transforming many modules should build a [`Transformer`] once.
pub fn transform(source: &str, module_path: &Path, options: &HmrOptions) -> Result<String, TransformError> {
    let config = HmrConfig::from_options(options)?;
    Transformer::new(config).transform(source, module_path)
}
