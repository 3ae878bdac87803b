//! Quill Host - owns the rhai interpreter and everything scripts can see.
//!
//! The [`InterpreterHandle`] wraps one engine per activation. The
//! [`CapabilityBinder`] loads capability libraries into it and builds the
//! import preamble from the [`CapabilityRegistry`]. The [`ScopeBuilder`] seeds
//! each execution with the host interface and the shared [`PersistentStore`].

mod binder;
mod capability;
mod guest_error;
mod handle;
mod interface;
mod scope;
mod store;

pub use binder::{BEGIN_CUSTOM_MARKER, CapabilityBinder, Preamble};
pub use capability::{Capability, CapabilityLibrary, CapabilityRegistry};
pub use guest_error::classify;
pub use handle::InterpreterHandle;
pub use interface::{HostInterface, InterfaceHandle};
pub use scope::{INTERFACE_VAR, STORE_VAR, ScopeBuilder};
pub use store::PersistentStore;

pub use rhai::{Dynamic, INT, Module, Scope};
