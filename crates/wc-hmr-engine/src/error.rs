//! Error types for configuration, transformation and virtual module serving

use crate::parser::{LexError, ParseError};
use regex::Regex;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building an [`HmrConfig`](crate::HmrConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No `descriptors` (or `baseClasses`) key
    #[error("Missing descriptors option: configure at least one base class")]
    MissingDescriptors,

    /// `descriptors` is present but not an array
    #[error("descriptors option should be an array")]
    DescriptorsNotArray,

    /// `descriptors` is an empty array
    #[error("descriptors option should contain at least one base class")]
    EmptyDescriptors,

    /// An entry of `descriptors` is not an object
    #[error("Base class descriptor {index} should be an object")]
    DescriptorNotObject {
        /// Position in the descriptor list
        index: usize,
    },

    /// An entry has no `name`, or an empty one
    #[error("Missing name option in base class descriptor {index}")]
    MissingName {
        /// Position in the descriptor list
        index: usize,
    },

    /// `origin` is present but not a string
    #[error("origin option of base class descriptor {index} should be a string")]
    InvalidOrigin {
        /// Position in the descriptor list
        index: usize,
    },

    /// `patch` is present but not a string
    #[error("patch option of base class descriptor {index} should be a string")]
    InvalidPatch {
        /// Position in the descriptor list
        index: usize,
    },

    /// No `projectRoot` (or `rootDir`) key
    #[error("Missing projectRoot option")]
    MissingProjectRoot,

    /// A preset name that does not exist
    #[error("Unknown base class preset '{0}'")]
    UnknownPreset(String),

    /// A config file extension other than `.toml` or `.json`
    #[error("Unsupported config format for {}: expected a .toml or .json file", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The config file could not be read
    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// TOML did not parse
    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON did not parse
    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

/// A module that could not be parsed.
///
/// The message never contains the module path; hosts report it separately.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct SyntaxError {
    /// Parser message with the file path removed
    pub message: String,
    /// Optional fix-it hint
    pub hint: Option<String>,
    /// Module that failed to parse
    pub file_path: PathBuf,
    /// 1-based line
    pub line: u32,
    /// 1-based column
    pub column: u32,
    /// Byte offset into the module source
    pub offset: usize,
}

impl SyntaxError {
    /// Build from a parser error.
    pub fn from_parse_error(err: &ParseError, file_path: PathBuf) -> Self {
        let message = strip_file_path(&err.message, &file_path);
        Self {
            message,
            hint: err.suggestion.clone(),
            file_path,
            line: err.span.line,
            column: err.span.column,
            offset: err.span.start,
        }
    }

    /// Build from a lexer error.
    pub fn from_lex_error(err: &LexError, file_path: PathBuf) -> Self {
        let span = *err.span();
        let message = strip_file_path(&err.description(), &file_path);
        Self {
            message,
            hint: err.hint(),
            file_path,
            line: span.line,
            column: span.column,
            offset: span.start,
        }
    }
}

/// Remove every occurrence of `<path>`, optionally followed by ` `, `:` and
/// ` `, from an error message.
pub fn strip_file_path(message: &str, file_path: &std::path::Path) -> String {
    let path = file_path.to_string_lossy();
    if path.is_empty() {
        return message.to_string();
    }
    match Regex::new(&format!("{} ?:? ?", regex::escape(&path))) {
        Ok(pattern) => pattern.replace_all(message, "").into_owned(),
        Err(_) => message.to_string(),
    }
}

/// Errors returned by [`Transformer::transform`](crate::Transformer::transform)
#[derive(Debug, Error)]
pub enum TransformError {
    /// Options did not validate
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The module did not parse
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

/// Errors raised when serving a virtual module
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServeError {
    /// A patch path whose index is missing, out of range or has no patch
    #[error(
        "Something went wrong while loading a base class patch. Can't find a patch with index {index}, request path {request_path}"
    )]
    PatchNotFound {
        /// Index text taken from the request path
        index: String,
        /// The full request path
        request_path: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::token::Span;
    use std::path::Path;

    #[test]
    fn test_strip_file_path() {
        let path = Path::new("/root/app/src/foo.js");
        assert_eq!(
            strip_file_path("/root/app/src/foo.js: Unexpected token (1:4)", path),
            "Unexpected token (1:4)"
        );
        assert_eq!(
            strip_file_path("in /root/app/src/foo.js : oops", path),
            "in oops"
        );
        assert_eq!(strip_file_path("Unexpected token", path), "Unexpected token");
    }

    #[test]
    fn test_strip_escapes_regex_characters() {
        let path = Path::new("/root/a+b/(x).js");
        assert_eq!(strip_file_path("/root/a+b/(x).js: bad", path), "bad");
        assert_eq!(strip_file_path("/root/aab/(x).js: bad", path), "/root/aab/(x).js: bad");
    }

    #[test]
    fn test_syntax_error_from_parse_error() {
        let err = ParseError::invalid_syntax("Class declarations require a name", Span::new(7, 12, 2, 3))
            .with_suggestion("Name the class");
        let syntax = SyntaxError::from_parse_error(&err, PathBuf::from("/p/a.js"));

        assert_eq!(syntax.message, "Class declarations require a name");
        assert_eq!(syntax.hint.as_deref(), Some("Name the class"));
        assert_eq!((syntax.line, syntax.column, syntax.offset), (2, 3, 7));
        assert_eq!(syntax.to_string(), "Class declarations require a name");
    }

    #[test]
    fn test_patch_not_found_message() {
        let err = ServeError::PatchNotFound {
            index: "3".to_string(),
            request_path: "/__web-dev-server__/wc-hmr/patch/3.js".to_string(),
        };
        assert!(err.to_string().contains("Can't find a patch with index 3"));
    }
}
