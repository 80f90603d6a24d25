//! Error types for padmapc

use padmap_compiler::CatalogueError;
use padmap_errors::CompileError;
use padmap_format::DecodeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Identifier not found: {0}")]
    IdentifierNotFound(String),

    #[error("Catalogue error: {0}")]
    Catalogue(#[from] CatalogueError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Offset added to [`CompileError::code`] for the process exit status.
pub const COMPILE_EXIT_BASE: i32 = 10;

/// Process exit status for a failed command.
pub fn exit_code(error: &anyhow::Error) -> i32 {
    if let Some(compile) = error.downcast_ref::<CompileError>() {
        return COMPILE_EXIT_BASE + i32::from(compile.code());
    }
    match error.downcast_ref::<CliError>() {
        Some(CliError::InvalidArguments(_)) => 2,
        Some(CliError::IdentifierNotFound(_)) => 3,
        Some(CliError::Catalogue(_)) => 4,
        Some(CliError::Decode(_)) => 5,
        Some(CliError::Io(_)) => 6,
        _ => 1,
    }
}
