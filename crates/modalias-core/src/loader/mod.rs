//! Host loader boundary and resolver interception.
//!
//! The host loader owns a single resolution hook (`request → file path`) and
//! a cache of loaded modules keyed by resolved path. [`LoaderInterceptor`]
//! swaps that hook for an alias-aware wrapper and puts the original back on
//! uninstall. [`MemoryLoader`] is a lexical host used by the CLI and tests.

mod interceptor;
mod memory;

pub use interceptor::LoaderInterceptor;
pub use memory::{LoadContext, LoadedModule, LoaderError, MemoryLoader};

use std::path::PathBuf;
use std::rc::Rc;

/// A host resolution hook: `(request, context, is_main) → resolved path`.
///
/// Hooks are shared function values. Identity (`Rc::ptr_eq`) is what lets an
/// uninstall prove it restored exactly the hook it captured.
pub type ResolveHook<C, E> = Rc<dyn Fn(&str, &C, bool) -> Result<PathBuf, E>>;

/// A module loader whose resolution hook can be read and replaced.
pub trait HostLoader {
    /// Per-call resolution context (importing module, search paths, ...).
    type Context: 'static;
    /// Error produced by the host's own resolution.
    type Error: 'static;

    /// The currently active resolution hook.
    fn resolve_hook(&self) -> ResolveHook<Self::Context, Self::Error>;

    /// Replace the active resolution hook.
    fn set_resolve_hook(&mut self, hook: ResolveHook<Self::Context, Self::Error>);

    /// Drop one entry from the module cache. Returns true if it was present.
    fn remove_cached_module(&mut self, id: &str) -> bool;
}
