//! Start/stop/reset surface over the alias engine.

use crate::alias::{load_alias_file, AliasMap, AliasMatch, AliasResolver};
use crate::error::Error;
use crate::loader::{HostLoader, LoaderInterceptor};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Owns an alias table and the interceptor that installs it into a host.
///
/// State misuse (starting twice, stopping when not started) is logged and
/// reported through the boolean results; it never fails the host.
pub struct AliasRegister<H: HostLoader> {
    resolver: Rc<RefCell<AliasResolver>>,
    interceptor: LoaderInterceptor<H>,
}

impl<H: HostLoader> AliasRegister<H> {
    /// Create a register with an empty alias table.
    #[must_use]
    pub fn new() -> Self {
        Self::from_resolver(AliasResolver::new())
    }

    /// Create a register pre-populated with `aliases`.
    pub fn with_aliases<I, K, V>(aliases: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Ok(Self::from_resolver(AliasResolver::with_aliases(aliases)?))
    }

    /// Create a register from an alias config file (tsconfig, jsconfig or
    /// plain alias JSON).
    pub fn from_config_file(path: &Path) -> Result<Self, Error> {
        let aliases = load_alias_file(path)?;
        debug!(path = %path.display(), count = aliases.len(), "loaded alias config");
        Self::with_aliases(aliases)
    }

    fn from_resolver(resolver: AliasResolver) -> Self {
        let resolver = Rc::new(RefCell::new(resolver));
        Self {
            interceptor: LoaderInterceptor::new(Rc::clone(&resolver)),
            resolver,
        }
    }

    /// Register `aliases` (if any) and install into `host`.
    ///
    /// Returns `Ok(true)` if the interceptor was installed by this call and
    /// `Ok(false)` if it was already installed, in which case it is re-enabled.
    /// Invalid aliases fail before anything is installed.
    pub fn start(&mut self, host: &mut H, aliases: Option<AliasMap>) -> Result<bool, Error> {
        if let Some(aliases) = aliases {
            self.resolver.borrow_mut().register_all(aliases)?;
        }

        match self.interceptor.install(host) {
            Ok(()) => {
                info!(aliases = self.resolver.borrow().table().len(), "alias resolution started");
                Ok(true)
            }
            Err(err) => {
                warn!(%err, "start ignored");
                let _ = self.interceptor.enable();
                Ok(false)
            }
        }
    }

    /// Uninstall from `host`, restoring its original hook. Aliases are kept.
    ///
    /// Returns false (and logs) if nothing was installed.
    pub fn stop(&mut self, host: &mut H) -> bool {
        match self.interceptor.uninstall(host) {
            Ok(()) => {
                info!("alias resolution stopped");
                true
            }
            Err(err) => {
                warn!(%err, "stop ignored");
                false
            }
        }
    }

    /// Stop and clear every alias.
    ///
    /// Returns whether the interceptor was installed.
    pub fn reset(&mut self, host: &mut H) -> bool {
        let was_installed = self.interceptor.uninstall(host).is_ok();
        self.resolver.borrow_mut().clear();
        debug!(was_installed, "alias resolution reset");
        was_installed
    }

    /// Keep the interceptor installed but stop rewriting.
    pub fn pause(&mut self) -> bool {
        self.toggle(false)
    }

    /// Resume rewriting after [`pause`](Self::pause).
    pub fn resume(&mut self) -> bool {
        self.toggle(true)
    }

    fn toggle(&mut self, enabled: bool) -> bool {
        let result = if enabled {
            self.interceptor.enable()
        } else {
            self.interceptor.disable()
        };
        if let Err(err) = result {
            warn!(%err, enabled, "toggle ignored");
            return false;
        }
        true
    }

    pub fn register(&mut self, key: impl Into<String>, target: impl Into<String>) -> Result<(), Error> {
        self.resolver.borrow_mut().register(key, target)
    }

    pub fn unregister(&mut self, key: &str) -> bool {
        self.resolver.borrow_mut().unregister(key)
    }

    /// Drop a stale module from the host cache so aliases registered since it
    /// was loaded apply to its next load.
    pub fn refresh(&self, host: &mut H, module_id: &str) -> bool {
        self.interceptor.invalidate_cached_module(host, module_id)
    }

    /// Snapshot of the registered aliases in match-priority order.
    #[must_use]
    pub fn aliases(&self) -> AliasMap {
        self.resolver.borrow().aliases()
    }

    /// Rewrite a request without going through the host.
    #[must_use]
    pub fn resolve(&self, request: &str) -> String {
        self.resolver.borrow().resolve(request).into_owned()
    }

    #[must_use]
    pub fn lookup(&self, request: &str) -> Option<AliasMatch> {
        self.resolver.borrow().lookup(request)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.interceptor.is_enabled()
    }

    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.interceptor.is_installed()
    }
}

impl<H: HostLoader> Default for AliasRegister<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: HostLoader> std::fmt::Debug for AliasRegister<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AliasRegister")
            .field("interceptor", &self.interceptor)
            .finish()
    }
}
