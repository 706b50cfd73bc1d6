//! In-memory host loader.
//!
//! Resolves requests lexically (no disk access) and keeps loaded modules in
//! a map keyed by resolved path, mirroring how a runtime's module cache
//! behaves: a second load of the same path returns the cached instance.

use super::{HostLoader, ResolveHook};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

/// Resolution context for [`MemoryLoader`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadContext {
    /// Directory of the importing module. Relative requests resolve against
    /// it; `None` means the loader root.
    pub parent: Option<PathBuf>,
}

impl LoadContext {
    #[must_use]
    pub fn from_parent(dir: impl Into<PathBuf>) -> Self {
        Self {
            parent: Some(dir.into()),
        }
    }
}

/// Errors from the default [`MemoryLoader`] resolution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoaderError {
    #[error("Cannot find module '{request}'")]
    NotFound { request: String },
}

/// A loaded module instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedModule {
    /// Resolved path; also the cache key.
    pub id: PathBuf,
    /// Request that first produced this instance.
    pub request: String,
    /// Monotonic instance number. A reload after invalidation gets a new one.
    pub instance: u64,
}

/// Lexical host loader with a module cache.
///
/// - Relative requests (`./`, `../`) join onto the context's parent dir (or root).
/// - Absolute requests are normalized and kept.
/// - Bare requests map to `<root>/node_modules/<request>`.
pub struct MemoryLoader {
    root: PathBuf,
    hook: ResolveHook<LoadContext, LoaderError>,
    cache: HashMap<PathBuf, LoadedModule>,
    next_instance: u64,
}

impl MemoryLoader {
    /// Create a loader rooted at `root` with the default lexical hook.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            hook: default_hook(root.clone()),
            root,
            cache: HashMap::new(),
            next_instance: 0,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve through whichever hook is currently installed.
    pub fn resolve(
        &self,
        request: &str,
        ctx: &LoadContext,
        is_main: bool,
    ) -> Result<PathBuf, LoaderError> {
        let hook = Rc::clone(&self.hook);
        hook(request, ctx, is_main)
    }

    /// Resolve `request` and return the cached module for the resolved path,
    /// creating a new instance on a cache miss.
    pub fn load(&mut self, request: &str, ctx: &LoadContext) -> Result<&LoadedModule, LoaderError> {
        let id = self.resolve(request, ctx, self.cache.is_empty())?;
        let next_instance = &mut self.next_instance;
        Ok(self.cache.entry(id.clone()).or_insert_with(|| {
            *next_instance += 1;
            LoadedModule {
                id,
                request: request.to_string(),
                instance: *next_instance,
            }
        }))
    }

    #[must_use]
    pub fn is_cached(&self, id: &Path) -> bool {
        self.cache.contains_key(id)
    }

    #[must_use]
    pub fn cached(&self, id: &Path) -> Option<&LoadedModule> {
        self.cache.get(id)
    }

    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

impl HostLoader for MemoryLoader {
    type Context = LoadContext;
    type Error = LoaderError;

    fn resolve_hook(&self) -> ResolveHook<LoadContext, LoaderError> {
        Rc::clone(&self.hook)
    }

    fn set_resolve_hook(&mut self, hook: ResolveHook<LoadContext, LoaderError>) {
        self.hook = hook;
    }

    fn remove_cached_module(&mut self, id: &str) -> bool {
        self.cache.remove(Path::new(id)).is_some()
    }
}

impl std::fmt::Debug for MemoryLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryLoader")
            .field("root", &self.root)
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

fn default_hook(root: PathBuf) -> ResolveHook<LoadContext, LoaderError> {
    Rc::new(move |request: &str, ctx: &LoadContext, _is_main: bool| {
        if request.is_empty() {
            return Err(LoaderError::NotFound {
                request: request.to_string(),
            });
        }

        let resolved = if modalias_util::path::is_relative(request) {
            let base = ctx.parent.as_deref().unwrap_or(&root);
            base.join(request)
        } else if Path::new(request).is_absolute() || request.starts_with('/') {
            PathBuf::from(request)
        } else {
            root.join("node_modules").join(request)
        };

        Ok(normalize_path(&resolved))
    })
}

/// Normalize a path by removing `.` and resolving `..` components.
fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                result.pop();
            }
            other => result.push(other),
        }
    }
    result
}
