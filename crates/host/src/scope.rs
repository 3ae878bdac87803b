//! Per-execution scope construction.

use rhai::Scope;

use crate::interface::InterfaceHandle;
use crate::store::PersistentStore;

/// Variable holding the host interface.
pub const INTERFACE_VAR: &str = "interface";

/// Variable holding the persistent store.
pub const STORE_VAR: &str = "store";

/// Builds a fresh scope for every execution.
///
/// Locals never leak from one execution to the next; only the store does.
#[derive(Debug, Clone)]
pub struct ScopeBuilder {
    interface: InterfaceHandle,
    store: PersistentStore,
}

impl ScopeBuilder {
    pub fn new(interface: InterfaceHandle, store: PersistentStore) -> Self {
        Self { interface, store }
    }

    pub fn store(&self) -> &PersistentStore {
        &self.store
    }

    /// A new scope holding exactly `interface` and `store`.
    pub fn new_scope(&self) -> Scope<'static> {
        let mut scope = Scope::new();
        scope.push(INTERFACE_VAR, self.interface.clone());
        scope.push(STORE_VAR, self.store.clone());
        scope
    }
}
