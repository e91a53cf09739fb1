//! Module Store Infrastructure
//!
//! Core types for the script module registry:
//! - `NameHash` - 64-bit identity of a module, derived from its name
//! - `ScriptModule` - A registered module record (name, source, host value)
//! - `ModuleStore` - Hash-keyed registry with chunked growth
//! - `ModuleManifest` / `LoadOptions` - TOML manifest of modules to register

mod hash;
mod manifest;
mod module;
mod store;

pub use hash::{hash_bytes, hash_name, NameHash};
pub use manifest::{LoadOptions, ModuleManifest};
pub use module::{HostData, ScriptModule};
pub use store::{
    new_shared_store, ModuleStore, SharedModuleStore, GROWTH_CHUNK, TABLE_BUCKETS,
};
