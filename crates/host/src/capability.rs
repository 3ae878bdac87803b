//! Exposed capabilities and capability libraries.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use quill_core::{QuillError, Result};
use rhai::{Engine, Module, Scope, Shared};

/// A host module that scripts may import.
#[derive(Debug, Clone)]
pub struct Capability {
    /// Namespace the capability is grouped under.
    pub namespace: String,

    /// Name the capability is imported as.
    pub name: String,

    module: Shared<Module>,
}

impl Capability {
    /// Path used by `import` statements: `<namespace>/<name>`.
    pub fn import_path(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    /// The preamble line that brings this capability into scope.
    pub fn import_line(&self) -> String {
        format!("import \"{}\" as {};", self.import_path(), self.name)
    }

    pub fn module(&self) -> Shared<Module> {
        self.module.clone()
    }
}

#[derive(Default)]
struct RegistryState {
    generation: u64,
    namespaces: BTreeMap<String, BTreeMap<String, Capability>>,
}

/// Host-maintained set of exposable capabilities.
///
/// Clones share the same registry, so collaborating modules can keep exposing
/// capabilities after the interpreter is up. Every change bumps the
/// generation.
#[derive(Clone, Default)]
pub struct CapabilityRegistry {
    state: Arc<RwLock<RegistryState>>,
}

impl CapabilityRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exposes `module` as `namespace/name`, replacing any previous entry.
    ///
    /// Returns false (and logs a warning) when the namespace is empty or the
    /// name cannot be used as an import alias.
    pub fn expose(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        mut module: Module,
    ) -> bool {
        let namespace = namespace.into();
        let name = name.into();

        if namespace.is_empty() || namespace.contains('"') {
            log::warn!("Capability '{}' has no usable namespace, not exposed", name);
            return false;
        }

        if !is_identifier(&name) {
            log::warn!(
                "Capability name '{}' in {} is not an identifier, not exposed",
                name,
                namespace
            );
            return false;
        }

        module.build_index();

        let capability = Capability {
            namespace: namespace.clone(),
            name: name.clone(),
            module: Shared::new(module),
        };

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state
            .namespaces
            .entry(namespace)
            .or_default()
            .insert(name, capability);
        state.generation += 1;

        true
    }

    /// Removes a capability. Returns true if it was exposed.
    pub fn withdraw(&self, namespace: &str, name: &str) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        let removed = match state.namespaces.get_mut(namespace) {
            Some(names) => names.remove(name).is_some(),
            None => false,
        };

        if removed {
            if state.namespaces.get(namespace).is_some_and(BTreeMap::is_empty) {
                state.namespaces.remove(namespace);
            }
            state.generation += 1;
        }

        removed
    }

    /// All exposed capabilities, grouped by namespace and sorted by name.
    pub fn exposed(&self) -> Vec<Capability> {
        self.snapshot().1
    }

    /// The current generation together with the capabilities it describes.
    pub fn snapshot(&self) -> (u64, Vec<Capability>) {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let capabilities = state
            .namespaces
            .values()
            .flat_map(|names| names.values().cloned())
            .collect();
        (state.generation, capabilities)
    }

    /// Looks up the module behind an import path.
    pub fn resolve(&self, path: &str) -> Option<Shared<Module>> {
        let (namespace, name) = path.rsplit_once('/')?;
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .namespaces
            .get(namespace)
            .and_then(|names| names.get(name))
            .map(Capability::module)
    }

    /// Counter bumped on every expose or withdraw.
    pub fn generation(&self) -> u64 {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }

    pub fn len(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .namespaces
            .values()
            .map(BTreeMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Where a capability library comes from.
#[derive(Debug, Clone)]
enum LibrarySource {
    /// A module built by the host.
    Native(Shared<Module>),

    /// A rhai source file compiled at activation.
    Script(PathBuf),
}

/// A module loaded into the interpreter once, at activation, and reachable as
/// `name::item` from every script.
#[derive(Debug, Clone)]
pub struct CapabilityLibrary {
    name: String,
    source: LibrarySource,
}

impl CapabilityLibrary {
    /// Creates a library from a host-built module.
    pub fn native(name: impl Into<String>, mut module: Module) -> Self {
        module.build_index();
        Self {
            name: name.into(),
            source: LibrarySource::Native(Shared::new(module)),
        }
    }

    /// Creates a library compiled from a script file.
    pub fn script(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source: LibrarySource::Script(path.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Produces the module, compiling script sources with `engine`.
    pub(crate) fn load(&self, engine: &Engine) -> Result<Shared<Module>> {
        match &self.source {
            LibrarySource::Native(module) => Ok(module.clone()),
            LibrarySource::Script(path) => {
                let component = format!("library '{}'", self.name);

                let ast = engine
                    .compile_file(path.clone())
                    .map_err(|e| QuillError::activation(&component, e))?;

                let module = Module::eval_ast_as_new(Scope::new(), &ast, engine)
                    .map_err(|e| QuillError::activation(&component, e))?;

                Ok(Shared::new(module))
            }
        }
    }
}
