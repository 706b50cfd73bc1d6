#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

//! Module alias resolution engine.
//!
//! Register symbolic prefixes (`@app/*` → `./src`) and have every request
//! that passes through a host module loader rewritten before the loader's
//! default resolution runs.

pub mod alias;
pub mod config;
pub mod error;
pub mod loader;
pub mod register;
pub mod version;

pub use alias::{
    find_alias_config, has_alias, load_alias_file, rewrite, AliasMap, AliasMatch, AliasResolver,
    AliasTable, WILDCARD,
};
pub use config::Config;
pub use error::{Error, StateError};
pub use loader::{
    HostLoader, LoadContext, LoadedModule, LoaderError, LoaderInterceptor, MemoryLoader,
    ResolveHook,
};
pub use register::AliasRegister;
pub use version::VERSION;
