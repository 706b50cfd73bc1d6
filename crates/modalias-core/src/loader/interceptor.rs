//! Resolver interception.
//!
//! ```text
//! Uninstalled --install--> Installed(enabled) <--enable/disable--> Installed(disabled)
//!      ^                                |                                 |
//!      +-------------uninstall----------+---------------------------------+
//! ```

use super::{HostLoader, ResolveHook};
use crate::alias::AliasResolver;
use crate::error::StateError;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// Installs an [`AliasResolver`] in front of a host loader's resolution hook.
///
/// The interceptor is an explicit value held by the caller; there is no
/// process-wide slot. The host's hook is captured once by
/// [`install`](Self::install) and handed back by [`uninstall`](Self::uninstall).
pub struct LoaderInterceptor<H: HostLoader> {
    resolver: Rc<RefCell<AliasResolver>>,
    enabled: Rc<Cell<bool>>,
    original: Option<ResolveHook<H::Context, H::Error>>,
    wrapper: Option<ResolveHook<H::Context, H::Error>>,
}

impl<H: HostLoader> LoaderInterceptor<H> {
    /// Create an uninstalled interceptor over a shared resolver.
    ///
    /// Changes made to the resolver after install are seen by the next
    /// intercepted call.
    #[must_use]
    pub fn new(resolver: Rc<RefCell<AliasResolver>>) -> Self {
        Self {
            resolver,
            enabled: Rc::new(Cell::new(false)),
            original: None,
            wrapper: None,
        }
    }

    #[must_use]
    pub fn resolver(&self) -> Rc<RefCell<AliasResolver>> {
        Rc::clone(&self.resolver)
    }

    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.original.is_some()
    }

    /// True when installed and rewriting requests.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.is_installed() && self.enabled.get()
    }

    /// The hook captured at install time, if installed.
    #[must_use]
    pub fn original_hook(&self) -> Option<ResolveHook<H::Context, H::Error>> {
        self.original.clone()
    }

    /// Replace the host's resolution hook with the alias-aware wrapper.
    ///
    /// The wrapper rewrites the request (when enabled) and always delegates to
    /// the captured hook with the original context and `is_main` flag. The
    /// delegate's result, including any error, is returned as-is.
    pub fn install(&mut self, host: &mut H) -> Result<(), StateError> {
        if self.is_installed() {
            return Err(StateError::AlreadyInstalled);
        }

        let original = host.resolve_hook();
        let delegate = Rc::clone(&original);
        let resolver = Rc::clone(&self.resolver);
        let enabled = Rc::clone(&self.enabled);

        let wrapper: ResolveHook<H::Context, H::Error> =
            Rc::new(move |request: &str, ctx: &H::Context, is_main: bool| {
                if !enabled.get() {
                    return delegate(request, ctx, is_main);
                }

                // The table borrow ends here, before delegating, so a nested
                // resolution started by the delegate can consult it again.
                let rewritten = resolver.borrow().resolve(request);
                if rewritten != request {
                    trace!(request, rewritten = %rewritten, "alias rewrite");
                }
                delegate(&*rewritten, ctx, is_main)
            });

        host.set_resolve_hook(Rc::clone(&wrapper));
        self.enabled.set(true);
        self.original = Some(original);
        self.wrapper = Some(wrapper);
        debug!("alias resolver installed");
        Ok(())
    }

    /// Put the captured hook back and forget it.
    pub fn uninstall(&mut self, host: &mut H) -> Result<(), StateError> {
        let Some(original) = self.original.take() else {
            return Err(StateError::NotInstalled);
        };

        if let Some(wrapper) = self.wrapper.take() {
            if !Rc::ptr_eq(&host.resolve_hook(), &wrapper) {
                warn!("resolve hook was replaced after install; restoring the captured hook anyway");
            }
        }

        host.set_resolve_hook(original);
        self.enabled.set(false);
        debug!("alias resolver uninstalled");
        Ok(())
    }

    /// Resume rewriting. Takes effect from the next intercepted call.
    pub fn enable(&mut self) -> Result<(), StateError> {
        self.set_enabled(true)
    }

    /// Pass every request straight to the captured hook.
    /// Takes effect from the next intercepted call.
    pub fn disable(&mut self) -> Result<(), StateError> {
        self.set_enabled(false)
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), StateError> {
        if !self.is_installed() {
            return Err(StateError::NotInstalled);
        }
        self.enabled.set(enabled);
        debug!(enabled, "alias resolver toggled");
        Ok(())
    }

    /// Evict `module_id` from the host module cache so the next load goes
    /// through resolution again. Returns true if an entry was removed.
    ///
    /// Works in any state; an unknown id leaves the cache untouched.
    pub fn invalidate_cached_module(&self, host: &mut H, module_id: &str) -> bool {
        let removed = host.remove_cached_module(module_id);
        debug!(module_id, removed, "module cache invalidation");
        removed
    }
}

impl<H: HostLoader> fmt::Debug for LoaderInterceptor<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderInterceptor")
            .field("installed", &self.is_installed())
            .field("enabled", &self.enabled.get())
            .field("aliases", &self.resolver.borrow().table().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Minimal host: echoes the request as a path and records every call.
    struct EchoHost {
        hook: ResolveHook<(), String>,
        cache: Vec<String>,
        calls: Rc<RefCell<Vec<(String, bool)>>>,
    }

    impl EchoHost {
        fn new() -> Self {
            let calls: Rc<RefCell<Vec<(String, bool)>>> = Rc::default();
            let log = Rc::clone(&calls);
            let hook: ResolveHook<(), String> = Rc::new(move |request: &str, _: &(), is_main: bool| {
                log.borrow_mut().push((request.to_string(), is_main));
                if request == "missing" {
                    return Err(format!("Cannot find module '{request}'"));
                }
                Ok(PathBuf::from(request))
            });
            Self {
                hook,
                cache: vec!["/a.js".to_string(), "/b.js".to_string()],
                calls,
            }
        }

        fn resolve(&self, request: &str) -> Result<PathBuf, String> {
            let hook = Rc::clone(&self.hook);
            hook(request, &(), false)
        }
    }

    impl HostLoader for EchoHost {
        type Context = ();
        type Error = String;

        fn resolve_hook(&self) -> ResolveHook<(), String> {
            Rc::clone(&self.hook)
        }

        fn set_resolve_hook(&mut self, hook: ResolveHook<(), String>) {
            self.hook = hook;
        }

        fn remove_cached_module(&mut self, id: &str) -> bool {
            let before = self.cache.len();
            self.cache.retain(|k| k != id);
            self.cache.len() != before
        }
    }

    fn interceptor(aliases: &[(&str, &str)]) -> LoaderInterceptor<EchoHost> {
        let resolver = AliasResolver::with_aliases(aliases.iter().copied()).unwrap();
        LoaderInterceptor::new(Rc::new(RefCell::new(resolver)))
    }

    #[test]
    fn test_install_rewrites_requests() {
        let mut host = EchoHost::new();
        let mut icpt = interceptor(&[("@app/*", "./src")]);

        icpt.install(&mut host).unwrap();
        assert!(icpt.is_installed());
        assert!(icpt.is_enabled());

        assert_eq!(host.resolve("@app/core").unwrap(), PathBuf::from("./src/core"));
        assert_eq!(host.resolve("lodash").unwrap(), PathBuf::from("lodash"));
    }

    #[test]
    fn test_context_and_is_main_forwarded() {
        let mut host = EchoHost::new();
        let mut icpt = interceptor(&[("@app", "./src")]);
        icpt.install(&mut host).unwrap();

        let hook = host.resolve_hook();
        hook("@app/main", &(), true).unwrap();

        let calls = host.calls.borrow();
        assert_eq!(calls.last(), Some(&("./src/main".to_string(), true)));
    }

    #[test]
    fn test_install_twice_reports_state_error() {
        let mut host = EchoHost::new();
        let mut icpt = interceptor(&[]);

        icpt.install(&mut host).unwrap();
        let wrapper = host.resolve_hook();
        assert_eq!(icpt.install(&mut host), Err(StateError::AlreadyInstalled));

        // The second attempt did not stack another wrapper.
        assert!(Rc::ptr_eq(&host.resolve_hook(), &wrapper));
    }

    #[test]
    fn test_uninstall_restores_identical_hook() {
        let mut host = EchoHost::new();
        let before = host.resolve_hook();
        let mut icpt = interceptor(&[("@app", "./src")]);

        icpt.install(&mut host).unwrap();
        assert!(!Rc::ptr_eq(&host.resolve_hook(), &before));

        icpt.uninstall(&mut host).unwrap();
        assert!(Rc::ptr_eq(&host.resolve_hook(), &before));
        assert!(!icpt.is_installed());
        assert!(icpt.original_hook().is_none());
        assert_eq!(host.resolve("@app/x").unwrap(), PathBuf::from("@app/x"));
    }

    #[test]
    fn test_uninstall_when_not_installed() {
        let mut host = EchoHost::new();
        let before = host.resolve_hook();
        let mut icpt = interceptor(&[]);

        assert_eq!(icpt.uninstall(&mut host), Err(StateError::NotInstalled));
        assert!(Rc::ptr_eq(&host.resolve_hook(), &before));
    }

    #[test]
    fn test_reinstall_after_uninstall() {
        let mut host = EchoHost::new();
        let mut icpt = interceptor(&[("@app", "./src")]);

        icpt.install(&mut host).unwrap();
        icpt.uninstall(&mut host).unwrap();
        icpt.install(&mut host).unwrap();

        assert_eq!(host.resolve("@app/x").unwrap(), PathBuf::from("./src/x"));
    }

    #[test]
    fn test_disable_passes_through_untouched() {
        let mut host = EchoHost::new();
        let mut icpt = interceptor(&[("@app", "./src")]);
        icpt.install(&mut host).unwrap();

        icpt.disable().unwrap();
        assert!(icpt.is_installed());
        assert!(!icpt.is_enabled());
        assert_eq!(host.resolve("@app/x").unwrap(), PathBuf::from("@app/x"));

        icpt.enable().unwrap();
        assert_eq!(host.resolve("@app/x").unwrap(), PathBuf::from("./src/x"));
    }

    #[test]
    fn test_toggle_requires_install() {
        let mut icpt = interceptor(&[]);
        assert_eq!(icpt.enable(), Err(StateError::NotInstalled));
        assert_eq!(icpt.disable(), Err(StateError::NotInstalled));
    }

    #[test]
    fn test_host_errors_propagate_unchanged() {
        let mut host = EchoHost::new();
        let mut icpt = interceptor(&[("@gone", "missing")]);
        icpt.install(&mut host).unwrap();

        assert_eq!(
            host.resolve("@gone").unwrap_err(),
            "Cannot find module 'missing'"
        );
        assert_eq!(
            host.resolve("missing").unwrap_err(),
            "Cannot find module 'missing'"
        );
    }

    #[test]
    fn test_registration_after_install_is_visible() {
        let mut host = EchoHost::new();
        let mut icpt = interceptor(&[]);
        icpt.install(&mut host).unwrap();

        assert_eq!(host.resolve("@late/x").unwrap(), PathBuf::from("@late/x"));
        icpt.resolver().borrow_mut().register("@late", "./late").unwrap();
        assert_eq!(host.resolve("@late/x").unwrap(), PathBuf::from("./late/x"));
    }

    #[test]
    fn test_toggle_during_call_applies_to_next_call() {
        // A delegate that disables interception mid-call: the current call
        // keeps its rewrite, the next one passes through.
        let resolver = Rc::new(RefCell::new(
            AliasResolver::with_aliases([("@app", "./src")]).unwrap(),
        ));
        let icpt = Rc::new(RefCell::new(LoaderInterceptor::<EchoHost>::new(Rc::clone(
            &resolver,
        ))));

        let mut host = EchoHost::new();
        let toggler = Rc::clone(&icpt);
        host.hook = Rc::new(move |request: &str, _: &(), _: bool| {
            let _ = toggler.borrow_mut().disable();
            Ok(PathBuf::from(request))
        });

        icpt.borrow_mut().install(&mut host).unwrap();

        assert_eq!(host.resolve("@app/x").unwrap(), PathBuf::from("./src/x"));
        assert_eq!(host.resolve("@app/x").unwrap(), PathBuf::from("@app/x"));
    }

    #[test]
    fn test_nested_resolution_through_wrapper() {
        // The host's default hook resolves a dependency through whatever hook
        // is currently installed, re-entering the wrapper.
        let slot: Rc<RefCell<Option<ResolveHook<(), String>>>> = Rc::default();
        let inner_slot = Rc::clone(&slot);

        let mut host = EchoHost::new();
        host.hook = Rc::new(move |request: &str, ctx: &(), is_main: bool| {
            if request == "./src/entry" {
                let current = inner_slot.borrow().clone().expect("hook installed");
                let dep = current("@lib/dep", ctx, is_main)?;
                return Ok(PathBuf::from(format!("{request}+{}", dep.display())));
            }
            Ok(PathBuf::from(request))
        });

        let mut icpt = interceptor(&[("@app", "./src"), ("@lib", "./lib")]);
        icpt.install(&mut host).unwrap();
        *slot.borrow_mut() = Some(host.resolve_hook());

        assert_eq!(
            host.resolve("@app/entry").unwrap(),
            PathBuf::from("./src/entry+./lib/dep")
        );
    }

    #[test]
    fn test_invalidate_cached_module() {
        let mut host = EchoHost::new();
        let icpt = interceptor(&[]);

        assert!(!icpt.invalidate_cached_module(&mut host, "/never.js"));
        assert_eq!(host.cache, vec!["/a.js".to_string(), "/b.js".to_string()]);

        assert!(icpt.invalidate_cached_module(&mut host, "/a.js"));
        assert_eq!(host.cache, vec!["/b.js".to_string()]);

        assert!(!icpt.invalidate_cached_module(&mut host, "/a.js"));
    }
}
