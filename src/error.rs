//! Error kinds for module loading and export invocation.

use std::io;

use thiserror::Error;

/// Why a module could not be turned into a compiled `wasmtime::Module`.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no module path provided")]
    MissingPath,

    #[error("unrecognized module suffix (expected .wasm or .wat): {path:?}")]
    UnrecognizedSuffix { path: String },

    #[error("failed to read module {path}")]
    FileAccess {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse WebAssembly text {path}")]
    InvalidText {
        path: String,
        #[source]
        source: wat::Error,
    },

    #[error("failed to compile module {path}")]
    Compile {
        path: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Failures after a module has compiled: instantiation and export calls.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("failed to instantiate module")]
    Instantiate {
        #[source]
        source: anyhow::Error,
    },

    #[error("module has no export named '{export}'")]
    MissingExport { export: String },

    #[error("export '{export}' is not a function")]
    NotAFunction { export: String },

    #[error("export '{export}' takes {expected} argument(s), {provided} provided")]
    ArityMismatch {
        export: String,
        expected: usize,
        provided: usize,
    },

    #[error("argument {index} of '{export}' cannot be passed as {expected}")]
    ArgumentType {
        export: String,
        index: usize,
        expected: String,
    },

    #[error("call to '{export}' trapped")]
    Trap {
        export: String,
        #[source]
        source: anyhow::Error,
    },
}

impl LoadError {
    /// True for the errors raised before any file access is attempted.
    pub fn is_path_error(&self) -> bool {
        matches!(self, Self::MissingPath | Self::UnrecognizedSuffix { .. })
    }
}
