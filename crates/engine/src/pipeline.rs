//! The execution pipeline.

use quill_core::{QuillError, Result};
use quill_host::{
    CapabilityBinder, InterpreterHandle, PersistentStore, ScopeBuilder, classify,
};

use crate::output::OperatorOutput;

/// Runs operator scripts behind the capability preamble.
pub struct ExecutionPipeline {
    /// Interpreter the scripts run in.
    handle: InterpreterHandle,

    /// Source of the import preamble.
    binder: CapabilityBinder,

    /// Produces a fresh scope per execution.
    scopes: ScopeBuilder,

    /// Where echoed results go.
    output: Box<dyn OperatorOutput>,
}

/// Result of a pipeline run that did not propagate an error.
#[derive(Debug)]
pub enum ExecutionOutcome {
    /// The script ran. `output` holds the echoed text, if any.
    Completed { output: Option<String> },

    /// An import could not be resolved. Already logged.
    Contained(QuillError),
}

impl ExecutionPipeline {
    /// Creates a pipeline over an already bound handle.
    pub fn new(
        handle: InterpreterHandle,
        binder: CapabilityBinder,
        scopes: ScopeBuilder,
        output: Box<dyn OperatorOutput>,
    ) -> Self {
        Self {
            handle,
            binder,
            scopes,
            output,
        }
    }

    /// Composes and runs `script` in a fresh scope.
    ///
    /// Resolution failures are logged and contained. Every other guest
    /// failure is returned as an error for the caller to report.
    pub fn execute(&mut self, script: &str, echo: bool) -> Result<ExecutionOutcome> {
        let preamble = self.binder.preamble();
        let composed = preamble.compose(script);
        let preamble_lines = preamble.line_count();

        let mut scope = self.scopes.new_scope();

        match self.handle.execute(&composed, &mut scope) {
            Ok(value) => {
                let output = if echo && !value.is_unit() {
                    Some(value.to_string())
                } else {
                    None
                };

                if let Some(ref text) = output {
                    self.output.print(text);
                }

                Ok(ExecutionOutcome::Completed { output })
            }
            Err(err) => match classify(err, preamble_lines) {
                err @ QuillError::Resolution { .. } => {
                    log::error!("{}", err);
                    Ok(ExecutionOutcome::Contained(err))
                }
                err => Err(err),
            },
        }
    }

    /// Import lines for the currently exposed capabilities.
    pub fn import_lines(&self) -> Vec<String> {
        self.binder.import_lines()
    }

    pub fn store(&self) -> &PersistentStore {
        self.scopes.store()
    }

    /// Shuts the interpreter down.
    pub fn shutdown(self) {
        self.handle.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::testing::RecordingOutput;
    use quill_core::ErrorKind;
    use quill_host::{CapabilityRegistry, HostInterface, INT, InterfaceHandle, Module};
    use std::path::PathBuf;

    struct TestHost;

    impl HostInterface for TestHost {
        fn name(&self) -> String {
            "test".to_string()
        }

        fn version(&self) -> String {
            "0.0.0".to_string()
        }

        fn config_directory(&self) -> PathBuf {
            PathBuf::from("/tmp")
        }
    }

    fn pipeline(registry: CapabilityRegistry, output: RecordingOutput) -> ExecutionPipeline {
        let mut handle = InterpreterHandle::create();
        let binder = CapabilityBinder::new(registry);
        binder.bind(&mut handle).unwrap();
        let scopes = ScopeBuilder::new(InterfaceHandle::new(TestHost), PersistentStore::new());
        ExecutionPipeline::new(handle, binder, scopes, Box::new(output))
    }

    #[test]
    fn test_echo_delivers_result() {
        let output = RecordingOutput::default();
        let mut pipeline = pipeline(CapabilityRegistry::new(), output.clone());

        let outcome = pipeline.execute("40 + 2", true).unwrap();
        assert!(matches!(
            outcome,
            ExecutionOutcome::Completed { output: Some(ref text) } if text == "42"
        ));
        assert_eq!(*output.lines.borrow(), vec!["42"]);
    }

    #[test]
    fn test_no_echo_discards_result() {
        let output = RecordingOutput::default();
        let mut pipeline = pipeline(CapabilityRegistry::new(), output.clone());

        let outcome = pipeline.execute("40 + 2", false).unwrap();
        assert!(matches!(outcome, ExecutionOutcome::Completed { output: None }));
        assert!(output.lines.borrow().is_empty());
    }

    #[test]
    fn test_unit_result_is_not_echoed() {
        let output = RecordingOutput::default();
        let mut pipeline = pipeline(CapabilityRegistry::new(), output.clone());

        pipeline.execute("let x = 1;", true).unwrap();
        assert!(output.lines.borrow().is_empty());
    }

    #[test]
    fn test_runtime_error_propagates_with_operator_line() {
        let registry = CapabilityRegistry::new();
        registry.expose("Quill.Math", "Calc", Module::new());
        let mut pipeline = pipeline(registry, RecordingOutput::default());

        let err = pipeline.execute("let x = 1;\nx + missing", false).unwrap_err();
        match err {
            QuillError::Runtime { line, .. } => assert_eq!(line, Some(2)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unresolved_import_is_contained() {
        let mut pipeline = pipeline(CapabilityRegistry::new(), RecordingOutput::default());

        let outcome = pipeline
            .execute("import \"Quill.Gone/Thing\" as Thing;\n1", true)
            .unwrap();
        match outcome {
            ExecutionOutcome::Contained(err) => assert_eq!(err.kind(), ErrorKind::Resolution),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_store_persists_between_executions() {
        let mut pipeline = pipeline(CapabilityRegistry::new(), RecordingOutput::default());

        pipeline.execute("store[\"n\"] = 20;", false).unwrap();
        let outcome = pipeline.execute("store[\"n\"] * 2 + 2", true).unwrap();
        assert!(matches!(
            outcome,
            ExecutionOutcome::Completed { output: Some(ref text) } if text == "42"
        ));
        assert_eq!(pipeline.store().get("n").unwrap().as_int().unwrap(), 20 as INT);
    }

    #[test]
    fn test_capability_exposed_between_executions_is_visible() {
        let registry = CapabilityRegistry::new();
        let mut pipeline = pipeline(registry.clone(), RecordingOutput::default());

        let before = pipeline.execute("Calc::double(2)", false);
        assert!(!matches!(before, Ok(ExecutionOutcome::Completed { .. })));

        let mut calc = Module::new();
        calc.set_native_fn("double", |x: INT| Ok(x * 2));
        registry.expose("Quill.Math", "Calc", calc);

        let outcome = pipeline.execute("Calc::double(21)", true).unwrap();
        assert!(matches!(
            outcome,
            ExecutionOutcome::Completed { output: Some(ref text) } if text == "42"
        ));
        assert_eq!(pipeline.import_lines().len(), 1);
    }
}
