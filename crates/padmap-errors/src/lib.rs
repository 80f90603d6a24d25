//! Centralized error types for the padmap catalogue compiler.
//!
//! Every failure during compilation is fatal: the catalogue is static input,
//! so an error means either a corrupt catalogue or an exhausted fixed
//! capacity. There is no retry path and no partial artifact.
//!
//! # Architecture
//!
//! - [`compile`]: the [`CompileError`] taxonomy raised by the pipeline stages
//! - [`context`]: classification ([`ErrorCategory`]) and the small value types
//!   carried inside error variants
//!
//! # Example
//!
//! ```
//! use padmap_errors::{CompileError, CompileResult, TitleField};
//!
//! fn require_name(name: Option<&str>) -> CompileResult<&str> {
//!     name.ok_or_else(|| CompileError::missing_field("<unnamed>", TitleField::Name))
//! }
//!
//! let err = require_name(None).unwrap_err();
//! assert_eq!(err.code(), 4);
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod compile;
pub mod context;

pub use compile::CompileError;
pub use context::{ErrorCategory, Region, SymbolKind, TitleField};

/// A specialized `Result` type for compilation stages.
pub type CompileResult<T> = std::result::Result<T, CompileError>;
