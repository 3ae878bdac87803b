//! The interpreter handle.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use rhai::{Dynamic, Engine, EvalAltResult, OptimizationLevel, Position, Scope};

use crate::interface::register_interface_api;
use crate::store::register_store_api;

/// Owns the rhai engine for one activation period.
///
/// A handle is created once on activation and consumed by
/// [`InterpreterHandle::shutdown`]; re-activation builds a new one.
pub struct InterpreterHandle {
    engine: Engine,
}

impl InterpreterHandle {
    /// Creates the engine and registers the host types scripts can receive.
    pub fn create() -> Self {
        let mut engine = Engine::new();
        engine.set_max_expr_depths(64, 64);
        engine.set_optimization_level(OptimizationLevel::Simple);

        engine.on_print(|text| log::info!("[script] {}", text));

        engine.on_debug(|text, source, pos| {
            let src_info = source.map_or_else(String::new, |s| format!(" in '{}'", s));
            let pos_info = if pos.is_none() {
                String::new()
            } else {
                format!(" @ {}", pos)
            };
            log::debug!("[script debug]{}{}: {}", src_info, pos_info, text);
        });

        register_interface_api(&mut engine);
        register_store_api(&mut engine);

        log::debug!("Interpreter created");

        Self { engine }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub(crate) fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    /// Evaluates `script` inside `scope`, returning the value of the last
    /// expression.
    ///
    /// A panic raised by a host function is turned into a runtime error.
    pub fn execute(&self, script: &str, scope: &mut Scope) -> Result<Dynamic, Box<EvalAltResult>> {
        let run = panic::catch_unwind(AssertUnwindSafe(|| {
            self.engine.eval_with_scope::<Dynamic>(scope, script)
        }));

        run.unwrap_or_else(|payload| {
            let message = panic_message(payload.as_ref());
            log::error!("Host function panicked: {}", message);
            Err(EvalAltResult::ErrorRuntime(
                format!("Host function panicked: {}", message).into(),
                Position::NONE,
            )
            .into())
        })
    }

    /// Releases the engine and everything registered into it.
    pub fn shutdown(self) {
        drop(self.engine);
        log::debug!("Interpreter shut down");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
