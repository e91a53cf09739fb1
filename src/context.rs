//! Script Context
//!
//! `ScriptContext` is the host-facing handle that ties the module store to
//! Lua states: register modules, attach the searcher to a state, resolve
//! modules from the host side and hot-reload them.

use mlua::{Function, Lua, Value};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::ScriptResult;
use crate::modules::{
    hash_name, HostData, LoadOptions, ModuleManifest, ModuleStore, NameHash, SharedModuleStore,
};
use crate::script::load::{load_script, script_failure};
use crate::script::reload::{refresh_loaded, reload_returning};
use crate::script::searcher::{create_searcher, install_searcher};

/// Host-facing handle over a shared module store.
#[derive(Clone)]
pub struct ScriptContext {
    store: SharedModuleStore,
    options: LoadOptions,
}

impl ScriptContext {
    /// Create a context with an empty store.
    pub fn new(options: LoadOptions) -> Self {
        let store = ModuleStore::with_capacity(options.initial_capacity);
        Self {
            store: Arc::new(RwLock::new(store)),
            options,
        }
    }

    /// Create a context and register every module listed in a manifest.
    pub fn from_manifest(manifest: &ModuleManifest) -> ScriptResult<Self> {
        let context = Self::new(manifest.options.clone());
        for (name, source) in manifest.read_sources()? {
            context.add_module(&name, &source, None);
        }
        info!(modules = manifest.module_count(), "manifest modules registered");
        Ok(context)
    }

    /// Get the shared store.
    pub fn store(&self) -> &SharedModuleStore {
        &self.store
    }

    /// Get the loader options.
    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Register a module, updating it in place if the name is already known.
    pub fn add_module(&self, name: &str, source: &[u8], user_data: Option<HostData>) -> NameHash {
        self.store.write().register(name, source, user_data)
    }

    /// Check if a module with this name is registered.
    pub fn is_module_loaded(&self, name: &str) -> bool {
        self.store.read().is_loaded_name(name)
    }

    /// Check if a module with this name hash is registered.
    pub fn is_module_hash_loaded(&self, hash: NameHash) -> bool {
        self.store.read().is_loaded(hash)
    }

    /// Get a module's host value.
    pub fn module_user_data(&self, hash: NameHash) -> Option<HostData> {
        self.store.read().user_data(hash).cloned()
    }

    /// Get the number of registered modules.
    pub fn module_count(&self) -> usize {
        self.store.read().module_count()
    }

    /// Wire the store into a Lua state.
    ///
    /// Returns whether the searcher was installed. A state without the
    /// `package` library, or `install_searcher = false`, is not an error.
    pub fn attach(&self, lua: &Lua) -> ScriptResult<bool> {
        if !self.options.install_searcher {
            debug!("searcher installation disabled");
            return Ok(false);
        }
        let searcher = create_searcher(lua, Arc::clone(&self.store))
            .map_err(|err| script_failure(&err))?;
        install_searcher(lua, searcher).map_err(|err| script_failure(&err))
    }

    /// Compile a registered module without running it.
    ///
    /// `Ok(None)` when no module has this name.
    pub fn load_module(&self, lua: &Lua, name: &str) -> ScriptResult<Option<Function>> {
        let found = {
            let store = self.store.read();
            store
                .get(hash_name(name))
                .map(|module| (module.name().to_owned(), module.source_handle()))
        };
        match found {
            Some((resolved, source)) => load_script(lua, &source, &resolved).map(Some),
            None => Ok(None),
        }
    }

    /// Resolve a module from the host side: compile it and call it with its
    /// name, as `require` would, bypassing `package.loaded`.
    ///
    /// Returns the chunk's first value, or `Ok(None)` when no module has
    /// this name.
    pub fn resolve(&self, lua: &Lua, name: &str) -> ScriptResult<Option<Value>> {
        let Some(chunk) = self.load_module(lua, name)? else {
            return Ok(None);
        };
        let value = chunk
            .call::<Value>(name)
            .map_err(|err| script_failure(&err))?;
        Ok(Some(value))
    }

    /// Replace a module's source and re-run it in `lua`.
    ///
    /// With `refresh_loaded_on_reload`, a non-nil first return value also
    /// replaces `package.loaded[name]`, so later `require` calls see it.
    pub fn reload_module(&self, lua: &Lua, source: &[u8], hash: NameHash) -> ScriptResult<()> {
        let (name, results) = reload_returning(lua, &self.store, source, hash)?;
        if self.options.refresh_loaded_on_reload {
            let first = results.into_iter().next().unwrap_or(Value::Nil);
            refresh_loaded(lua, &name, first)?;
        }
        Ok(())
    }

    /// Reload a module by name.
    pub fn reload_module_by_name(&self, lua: &Lua, name: &str, source: &[u8]) -> ScriptResult<()> {
        self.reload_module(lua, source, hash_name(name))
    }
}

impl Default for ScriptContext {
    fn default() -> Self {
        Self::new(LoadOptions::default())
    }
}

impl std::fmt::Debug for ScriptContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptContext")
            .field("store", &*self.store.read())
            .field("options", &self.options)
            .finish()
    }
}
