//! The root host interface object injected into every scope.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use rhai::Engine;

/// The host application's root interface, as seen by scripts.
pub trait HostInterface: Send + Sync {
    /// Name of the host (or plugin) the feature runs inside.
    fn name(&self) -> String;

    /// Version string of the host.
    fn version(&self) -> String;

    /// The feature's configuration directory.
    fn config_directory(&self) -> PathBuf;
}

/// Cloneable handle to a [`HostInterface`], registered as the rhai type
/// `Interface`.
#[derive(Clone)]
pub struct InterfaceHandle {
    inner: Arc<dyn HostInterface>,
}

impl InterfaceHandle {
    pub fn new(interface: impl HostInterface + 'static) -> Self {
        Self {
            inner: Arc::new(interface),
        }
    }

    pub fn name(&self) -> String {
        self.inner.name()
    }

    pub fn version(&self) -> String {
        self.inner.version()
    }

    pub fn config_directory(&self) -> PathBuf {
        self.inner.config_directory()
    }
}

impl fmt::Debug for InterfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterfaceHandle")
            .field("name", &self.inner.name())
            .finish()
    }
}

pub(crate) fn register_interface_api(engine: &mut Engine) {
    engine
        .register_type_with_name::<InterfaceHandle>("Interface")
        .register_get("name", |i: &mut InterfaceHandle| i.name())
        .register_get("version", |i: &mut InterfaceHandle| i.version())
        .register_get("config_directory", |i: &mut InterfaceHandle| {
            i.config_directory().display().to_string()
        })
        .register_fn("to_string", |i: &mut InterfaceHandle| {
            format!("Interface({} {})", i.name(), i.version())
        });
}
