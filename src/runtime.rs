//! Wasmtime host runtime.
//!
//! Owns the engine and hands out sessions: one fresh Store and Instance per
//! module, with optional fuel metering. Modules are instantiated with no
//! imports.

use std::io;

use anyhow::{Context, Result};
use tracing::{debug, info};
use wasmtime::{Config, Engine, Instance, Module, Store, Val};

use crate::config::RunnerConfig;
use crate::error::{InvokeError, LoadError};
use crate::invocation::{Invocation, InvocationResult};
use crate::loader;

/// The runtime holds the configured engine shared by every load.
pub struct HostRuntime {
    engine: Engine,
    max_fuel: Option<u64>,
}

impl HostRuntime {
    /// Create a runtime, enabling fuel metering when a budget is configured.
    pub fn new(config: &RunnerConfig) -> Result<Self> {
        let mut engine_config = Config::new();
        engine_config.consume_fuel(config.max_fuel.is_some());

        let engine = Engine::new(&engine_config).context("failed to create Wasmtime engine")?;

        Ok(Self {
            engine,
            max_fuel: config.max_fuel,
        })
    }

    #[cfg(test)]
    fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Load and compile a module with this runtime's engine.
    pub fn load(&self, path: Option<&str>) -> Result<Module, LoadError> {
        loader::load(&self.engine, path)
    }

    /// Instantiate `module` in a fresh Store.
    pub fn instantiate(&self, module: &Module) -> Result<Session, InvokeError> {
        let mut store = Store::new(&self.engine, ());
        if let Some(fuel) = self.max_fuel {
            store
                .set_fuel(fuel)
                .map_err(|e| InvokeError::Instantiate { source: e.into() })?;
        }

        let instance = Instance::new(&mut store, module, &[])
            .map_err(|e| InvokeError::Instantiate { source: e.into() })?;

        Ok(Session {
            store,
            instance,
            max_fuel: self.max_fuel,
        })
    }
}

/// A live instance and the Store that owns its state.
pub struct Session {
    store: Store<()>,
    instance: Instance,
    max_fuel: Option<u64>,
}

impl Session {
    /// Call one export with the invocation's arguments.
    ///
    /// Arguments are converted to the export's declared parameter types;
    /// the arity must match exactly.
    pub fn invoke(&mut self, invocation: &Invocation) -> Result<InvocationResult, InvokeError> {
        let export = invocation.export.as_str();

        let func = self
            .instance
            .get_export(&mut self.store, export)
            .ok_or_else(|| InvokeError::MissingExport {
                export: export.to_string(),
            })?
            .into_func()
            .ok_or_else(|| InvokeError::NotAFunction {
                export: export.to_string(),
            })?;

        let ty = func.ty(&self.store);
        let param_types: Vec<_> = ty.params().collect();
        if param_types.len() != invocation.args.len() {
            return Err(InvokeError::ArityMismatch {
                export: export.to_string(),
                expected: param_types.len(),
                provided: invocation.args.len(),
            });
        }

        let params = invocation
            .args
            .iter()
            .zip(&param_types)
            .enumerate()
            .map(|(index, (arg, ty))| {
                arg.to_val(ty).ok_or_else(|| InvokeError::ArgumentType {
                    export: export.to_string(),
                    index,
                    expected: ty.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut results = vec![Val::I32(0); ty.results().len()];
        let fuel_before = self.fuel_remaining();

        if let Err(e) = func.call(&mut self.store, &params, &mut results) {
            return Err(InvokeError::Trap {
                export: export.to_string(),
                source: e.into(),
            });
        }

        if let (Some(before), Some(after)) = (fuel_before, self.fuel_remaining()) {
            debug!(export, fuel = before.saturating_sub(after), "export returned");
        } else {
            debug!(export, "export returned");
        }

        Ok(InvocationResult {
            name: invocation.display_name().to_string(),
            args: invocation.args.clone(),
            results,
        })
    }

    /// Fuel consumed since instantiation, if metering is enabled.
    pub fn fuel_consumed(&self) -> Option<u64> {
        let budget = self.max_fuel?;
        Some(budget.saturating_sub(self.fuel_remaining()?))
    }

    fn fuel_remaining(&self) -> Option<u64> {
        self.max_fuel?;
        self.store.get_fuel().ok()
    }
}

/// Load the module at `path`, instantiate it once, and run every invocation
/// in order, collecting the results. Stops at the first failure.
pub fn run(
    runtime: &HostRuntime,
    path: Option<&str>,
    invocations: &[Invocation],
) -> Result<Vec<InvocationResult>> {
    let mut results = Vec::with_capacity(invocations.len());
    run_each(runtime, path, invocations, |result| {
        results.push(result.clone());
        Ok(())
    })?;
    Ok(results)
}

/// Like [`run`], but hands each result to `on_result` as soon as its call
/// returns. Results produced before a failing call have already been
/// delivered when the error is returned.
pub fn run_each<F>(
    runtime: &HostRuntime,
    path: Option<&str>,
    invocations: &[Invocation],
    mut on_result: F,
) -> Result<()>
where
    F: FnMut(&InvocationResult) -> io::Result<()>,
{
    let module = runtime.load(path)?;
    let mut session = runtime.instantiate(&module)?;
    info!(path = path.unwrap_or_default(), "module instantiated");

    for invocation in invocations {
        let result = session.invoke(invocation).with_context(|| {
            format!("invocation of '{}' failed", invocation.display_name())
        })?;
        on_result(&result).context("failed to write result")?;
    }

    if let Some(fuel) = session.fuel_consumed() {
        info!(fuel, "all invocations complete");
    }
    Ok(())
}
