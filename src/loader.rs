//! Module loading.
//!
//! Classifies a path by its suffix, reads the file, and hands the contents
//! to the engine. Classification happens before any file access, so a bad
//! suffix never touches the filesystem.

use std::io;

use tracing::debug;
use wasmtime::{Engine, Module};

use crate::error::LoadError;

const BINARY_SUFFIX: &str = ".wasm";
const TEXT_SUFFIX: &str = ".wat";

/// Encoding of a module file, derived from its suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    /// `.wasm` binary encoding.
    Binary,
    /// `.wat` text format.
    Text,
}

impl ModuleKind {
    /// Classify a path by an exact, case-sensitive tail match.
    pub fn from_path(path: &str) -> Result<Self, LoadError> {
        if path.ends_with(BINARY_SUFFIX) {
            Ok(Self::Binary)
        } else if path.ends_with(TEXT_SUFFIX) {
            Ok(Self::Text)
        } else {
            Err(LoadError::UnrecognizedSuffix {
                path: path.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Text => "text",
        }
    }
}

/// Load and compile the module at `path` with the given engine.
///
/// Every load reads the file again and compiles a new `Module`; nothing is
/// cached between calls.
pub fn load(engine: &Engine, path: Option<&str>) -> Result<Module, LoadError> {
    let path = path.ok_or(LoadError::MissingPath)?;
    let kind = ModuleKind::from_path(path)?;
    debug!(path, kind = kind.as_str(), "loading module");

    match kind {
        ModuleKind::Binary => {
            let bytes = std::fs::read(path).map_err(file_access(path))?;
            debug!(path, bytes = bytes.len(), "read binary module");
            compile(engine, path, &bytes)
        }
        ModuleKind::Text => {
            let source = std::fs::read_to_string(path).map_err(file_access(path))?;
            debug!(path, bytes = source.len(), "read text module");
            let bytes = wat::parse_str(&source).map_err(|source| LoadError::InvalidText {
                path: path.to_string(),
                source,
            })?;
            compile(engine, path, &bytes)
        }
    }
}

fn file_access(path: &str) -> impl FnOnce(io::Error) -> LoadError + '_ {
    move |source| LoadError::FileAccess {
        path: path.to_string(),
        source,
    }
}

fn compile(engine: &Engine, path: &str, bytes: &[u8]) -> Result<Module, LoadError> {
    Module::from_binary(engine, bytes).map_err(|e| LoadError::Compile {
        path: path.to_string(),
        source: e.into(),
    })
}
