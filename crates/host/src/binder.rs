//! Capability binding and the import preamble.

use quill_core::Result;
use rhai::{Engine, EvalAltResult, Module, ModuleResolver, Position, Shared};

use crate::capability::{Capability, CapabilityLibrary, CapabilityRegistry};
use crate::handle::InterpreterHandle;

/// Separates host-generated code from operator code.
pub const BEGIN_CUSTOM_MARKER: &str = "// ### begin custom";

/// Host-generated code prepended to every script.
#[derive(Debug, Clone)]
pub struct Preamble {
    text: String,
    imports: Vec<String>,
    line_count: usize,
    generation: u64,
}

impl Preamble {
    fn build(prelude: &[String], imports: Vec<String>, generation: u64) -> Self {
        let mut text = String::new();

        for line in prelude.iter().chain(imports.iter()) {
            text.push_str(line);
            text.push('\n');
        }

        text.push_str(BEGIN_CUSTOM_MARKER);
        text.push('\n');

        let line_count = text.lines().count();

        Self {
            text,
            imports,
            line_count,
            generation,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The generated capability import lines (prelude excluded).
    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    /// Number of lines preceding the operator's first line.
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Registry generation this preamble was built from.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Prepends the preamble to an operator script.
    pub fn compose(&self, script: &str) -> String {
        let mut composed = String::with_capacity(self.text.len() + script.len());
        composed.push_str(&self.text);
        composed.push_str(script);
        composed
    }
}

/// Turns the capability registry and libraries into interpreter bindings.
pub struct CapabilityBinder {
    registry: CapabilityRegistry,
    libraries: Vec<CapabilityLibrary>,
    prelude: Vec<String>,
    cached: Option<Preamble>,
}

impl CapabilityBinder {
    /// Creates a binder over the given registry.
    pub fn new(registry: CapabilityRegistry) -> Self {
        Self {
            registry,
            libraries: Vec::new(),
            prelude: Vec::new(),
            cached: None,
        }
    }

    /// Adds a library loaded at bind time.
    pub fn with_library(mut self, library: CapabilityLibrary) -> Self {
        self.libraries.push(library);
        self
    }

    /// Adds several libraries.
    pub fn with_libraries(mut self, libraries: impl IntoIterator<Item = CapabilityLibrary>) -> Self {
        self.libraries.extend(libraries);
        self
    }

    /// Sets fixed lines emitted before the generated imports.
    pub fn with_prelude(mut self, prelude: Vec<String>) -> Self {
        self.prelude = prelude;
        self.cached = None;
        self
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Loads every library into a fresh handle and installs the registry as
    /// its module resolver.
    ///
    /// A library that cannot be loaded fails activation.
    pub fn bind(&self, handle: &mut InterpreterHandle) -> Result<()> {
        for library in &self.libraries {
            let module = library.load(handle.engine())?;
            handle
                .engine_mut()
                .register_static_module(library.name(), module);
            log::debug!("Loaded capability library '{}'", library.name());
        }

        handle
            .engine_mut()
            .set_module_resolver(RegistryResolver::new(self.registry.clone()));

        Ok(())
    }

    /// One import line per currently exposed capability, read fresh from the
    /// registry.
    pub fn import_lines(&self) -> Vec<String> {
        self.registry
            .exposed()
            .iter()
            .map(Capability::import_line)
            .collect()
    }

    /// Returns the preamble, rebuilding it if the registry changed since the
    /// last call.
    pub fn preamble(&mut self) -> &Preamble {
        let (generation, capabilities) = self.registry.snapshot();

        let preamble = match self.cached.take() {
            Some(cached) if cached.generation == generation => cached,
            _ => {
                let imports = capabilities.iter().map(Capability::import_line).collect();
                log::debug!("Rebuilding preamble for registry generation {}", generation);
                Preamble::build(&self.prelude, imports, generation)
            }
        };

        self.cached.insert(preamble)
    }
}

/// Resolves `import "<namespace>/<name>"` against the live registry.
#[derive(Clone)]
struct RegistryResolver {
    registry: CapabilityRegistry,
}

impl RegistryResolver {
    fn new(registry: CapabilityRegistry) -> Self {
        Self { registry }
    }
}

impl ModuleResolver for RegistryResolver {
    fn resolve(
        &self,
        _engine: &Engine,
        _source: Option<&str>,
        path: &str,
        pos: Position,
    ) -> std::result::Result<Shared<Module>, Box<EvalAltResult>> {
        self.registry
            .resolve(path)
            .ok_or_else(|| EvalAltResult::ErrorModuleNotFound(path.to_string(), pos).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::QuillError;
    use rhai::{INT, Scope};
    use std::fs;
    use tempfile::tempdir;

    fn calc_module() -> Module {
        let mut module = Module::new();
        module.set_native_fn("double", |x: INT| Ok(x * 2));
        module
    }

    #[test]
    fn test_preamble_has_one_import_per_capability() {
        let registry = CapabilityRegistry::new();
        registry.expose("Quill.Math", "Calc", calc_module());
        registry.expose("Quill.Text", "Strings", Module::new());

        let mut binder = CapabilityBinder::new(registry);
        let preamble = binder.preamble();

        assert_eq!(preamble.imports().len(), 2);
        assert_eq!(
            preamble.text(),
            "import \"Quill.Math/Calc\" as Calc;\nimport \"Quill.Text/Strings\" as Strings;\n// ### begin custom\n"
        );
        assert_eq!(preamble.line_count(), 3);
    }

    #[test]
    fn test_preamble_with_prelude() {
        let mut binder = CapabilityBinder::new(CapabilityRegistry::new())
            .with_prelude(vec!["import \"Quill/Base\" as Base;".to_string()]);

        let preamble = binder.preamble();
        assert!(preamble.imports().is_empty());
        assert_eq!(preamble.line_count(), 2);
        assert_eq!(
            preamble.compose("1 + 1"),
            "import \"Quill/Base\" as Base;\n// ### begin custom\n1 + 1"
        );
    }

    #[test]
    fn test_preamble_follows_registry_changes() {
        let registry = CapabilityRegistry::new();
        let mut binder = CapabilityBinder::new(registry.clone());

        assert!(binder.preamble().imports().is_empty());
        let first = binder.preamble().generation();

        registry.expose("Quill.Math", "Calc", calc_module());
        let preamble = binder.preamble();
        assert_ne!(preamble.generation(), first);
        assert_eq!(preamble.imports(), ["import \"Quill.Math/Calc\" as Calc;"]);

        registry.withdraw("Quill.Math", "Calc");
        assert!(binder.preamble().imports().is_empty());
    }

    #[test]
    fn test_preamble_is_reused_while_registry_unchanged() {
        let registry = CapabilityRegistry::new();
        registry.expose("Quill.Math", "Calc", calc_module());
        let mut binder = CapabilityBinder::new(registry);

        let first = binder.preamble().text().as_ptr();
        let second = binder.preamble().text().as_ptr();
        assert_eq!(first, second);
    }

    #[test]
    fn test_bind_resolves_exposed_capabilities() {
        let registry = CapabilityRegistry::new();
        registry.expose("Quill.Math", "Calc", calc_module());

        let mut handle = InterpreterHandle::create();
        let mut binder = CapabilityBinder::new(registry);
        binder.bind(&mut handle).unwrap();

        let script = binder.preamble().compose("Calc::double(21)");
        let result = handle.execute(&script, &mut Scope::new()).unwrap();
        assert_eq!(result.as_int().unwrap(), 42);
    }

    #[test]
    fn test_bind_loads_native_and_script_libraries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("greetings.rhai");
        fs::write(&path, "fn greet(name) { \"hello \" + name }").unwrap();

        let mut native = Module::new();
        native.set_var("ANSWER", 42 as INT);

        let binder = CapabilityBinder::new(CapabilityRegistry::new())
            .with_library(CapabilityLibrary::native("base", native))
            .with_library(CapabilityLibrary::script("greetings", &path));

        let mut handle = InterpreterHandle::create();
        binder.bind(&mut handle).unwrap();

        let mut scope = Scope::new();
        let greeting = handle
            .execute("greetings::greet(\"ops\")", &mut scope)
            .unwrap();
        assert_eq!(greeting.into_string().unwrap(), "hello ops");

        let answer = handle.execute("base::ANSWER", &mut scope).unwrap();
        assert_eq!(answer.as_int().unwrap(), 42);
    }

    #[test]
    fn test_bind_fails_on_broken_library() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.rhai");
        fs::write(&path, "fn broken( {").unwrap();

        let binder = CapabilityBinder::new(CapabilityRegistry::new())
            .with_library(CapabilityLibrary::script("broken", &path));

        let mut handle = InterpreterHandle::create();
        let result = binder.bind(&mut handle);
        assert!(matches!(
            result,
            Err(QuillError::Activation { ref component, .. }) if component == "library 'broken'"
        ));
    }

    #[test]
    fn test_import_lines_with_empty_registry() {
        let binder = CapabilityBinder::new(CapabilityRegistry::new());
        assert!(binder.import_lines().is_empty());
    }
}
