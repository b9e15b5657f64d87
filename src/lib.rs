//! Load a WebAssembly module from disk and invoke its exports.
//!
//! The path suffix selects the decoder (`.wasm` binary, `.wat` text), the
//! module is compiled and instantiated through Wasmtime, and each configured
//! export is called with literal arguments.

pub mod config;
pub mod error;
pub mod invocation;
pub mod loader;
pub mod runtime;

pub use config::RunnerConfig;
pub use error::{InvokeError, LoadError};
pub use invocation::{default_invocations, Arg, Invocation, InvocationResult};
pub use loader::{load, ModuleKind};
pub use runtime::{run, run_each, HostRuntime, Session};
