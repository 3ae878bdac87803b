//! Activation and deactivation of the scripting feature.

use std::fs;
use std::path::Path;

use quill_core::{Command, FeatureConfig, QuillError, Result};
use quill_host::{
    CapabilityBinder, CapabilityLibrary, CapabilityRegistry, InterfaceHandle, InterpreterHandle,
    PersistentStore, ScopeBuilder,
};

use crate::dispatcher::{CommandOutcome, Dispatcher};
use crate::output::{CommandRouter, OperatorOutput};
use crate::pipeline::ExecutionPipeline;

/// One activation period of the scripting feature.
///
/// Owns the interpreter, the store and the command registrations. Dropping
/// back to an inactive feature goes through [`ScriptingFeature::deactivate`];
/// activating again builds everything from scratch.
pub struct ScriptingFeature {
    dispatcher: Dispatcher,
    router: Box<dyn CommandRouter>,
}

impl ScriptingFeature {
    /// Brings the feature up and registers every command token with `router`.
    ///
    /// `libraries` are host-provided; script libraries named in `config` are
    /// appended after them. Nothing is registered if activation fails.
    pub fn activate(
        config: &FeatureConfig,
        registry: CapabilityRegistry,
        libraries: Vec<CapabilityLibrary>,
        interface: InterfaceHandle,
        mut router: Box<dyn CommandRouter>,
        output: Box<dyn OperatorOutput>,
    ) -> Result<Self> {
        let config_dir = config.resolve_config_dir()?;
        fs::create_dir_all(&config_dir).map_err(|e| {
            QuillError::activation(format!("config directory {}", config_dir.display()), e)
        })?;

        let configured = config.libraries.iter().map(|library| {
            CapabilityLibrary::script(&library.name, config.library_path(library, &config_dir))
        });

        let binder = CapabilityBinder::new(registry)
            .with_prelude(config.prelude.clone())
            .with_libraries(libraries)
            .with_libraries(configured);

        let mut handle = InterpreterHandle::create();
        if let Err(e) = binder.bind(&mut handle) {
            handle.shutdown();
            return Err(e);
        }

        let scopes = ScopeBuilder::new(interface, PersistentStore::new());
        let pipeline = ExecutionPipeline::new(handle, binder, scopes, output);
        let dispatcher = Dispatcher::new(pipeline, &config_dir);

        for (token, description) in Command::table() {
            router.add_handler(token, description);
        }

        log::info!(
            "Scripting feature '{}' activated in {}",
            config.feature,
            config_dir.display()
        );

        Ok(Self { dispatcher, router })
    }

    /// Routes one command to the dispatcher.
    pub fn handle_command(&mut self, command: Command, args: &str) -> CommandOutcome {
        self.dispatcher.dispatch(command, args)
    }

    pub fn store(&self) -> &PersistentStore {
        self.dispatcher.store()
    }

    pub fn config_dir(&self) -> &Path {
        self.dispatcher.config_dir()
    }

    /// Unregisters every command, then shuts the interpreter down.
    pub fn deactivate(self) {
        let Self {
            dispatcher,
            mut router,
        } = self;

        for command in Command::ALL {
            router.remove_handler(command.token());
        }

        dispatcher.shutdown();
        log::info!("Scripting feature deactivated");
    }
}
