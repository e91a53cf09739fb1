//! Module Store
//!
//! Registry of script modules keyed by name hash. The store:
//! - Owns every `ScriptModule` record
//! - Keeps at most one record per name hash (re-registration updates in place)
//! - Grows in fixed chunks of [`GROWTH_CHUNK`] slots when a new record
//!   arrives while full
//!
//! The store does no locking of its own. Hosts that share it with the
//! interpreter's searcher hook use [`SharedModuleStore`].

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use super::hash::{hash_name, NameHash};
use super::module::{HostData, ScriptModule};

/// Number of slots added each time the store grows.
pub const GROWTH_CHUNK: usize = 128;

/// Bucket count the store's table is sized for on growth.
pub const TABLE_BUCKETS: usize = 127;

/// Registry of script modules.
pub struct ModuleStore {
    /// Name hash -> module record.
    modules: HashMap<u64, ScriptModule>,

    /// Logical slot capacity. Grows by `GROWTH_CHUNK`.
    capacity: usize,

    /// Number of growth events so far.
    growth_count: usize,
}

impl ModuleStore {
    /// Create an empty store with zero capacity.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty store with the given slot capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            modules: HashMap::with_capacity(capacity),
            capacity,
            growth_count: 0,
        }
    }

    /// Register a module, or update the existing record with the same name hash.
    ///
    /// On update the original logical name is kept; source and host value
    /// are replaced. Returns the hash the module is stored under.
    pub fn register(
        &mut self,
        name: &str,
        source: &[u8],
        user_data: Option<HostData>,
    ) -> NameHash {
        let hash = hash_name(name);

        if let Some(existing) = self.modules.get_mut(&hash.value()) {
            debug!(module = name, hash = %hash, "updating registered module");
            existing.replace_source(source);
            existing.set_user_data(user_data);
            return hash;
        }

        if self.is_full() {
            self.grow();
        }

        trace!(module = name, hash = %hash, len = source.len(), "registering module");
        self.modules
            .insert(hash.value(), ScriptModule::new(name, source, user_data));
        hash
    }

    fn grow(&mut self) {
        let new_capacity = self.capacity + GROWTH_CHUNK;
        self.modules
            .reserve(new_capacity.saturating_sub(self.modules.len()));
        self.capacity = new_capacity;
        self.growth_count += 1;
        debug!(capacity = new_capacity, buckets = TABLE_BUCKETS, "module store grown");
    }

    /// Check whether the store has no free slots.
    pub fn is_full(&self) -> bool {
        self.modules.len() >= self.capacity
    }

    /// Get the current slot capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the number of growth events so far.
    pub fn growth_count(&self) -> usize {
        self.growth_count
    }

    /// Get a module by name hash.
    pub fn get(&self, hash: NameHash) -> Option<&ScriptModule> {
        self.modules.get(&hash.value())
    }

    /// Get a mutable reference to a module by name hash.
    pub fn get_mut(&mut self, hash: NameHash) -> Option<&mut ScriptModule> {
        self.modules.get_mut(&hash.value())
    }

    /// Get a module by logical name.
    pub fn get_by_name(&self, name: &str) -> Option<&ScriptModule> {
        self.get(hash_name(name))
    }

    /// Get the host value of a module.
    ///
    /// `None` if the module is absent or was registered without a host value.
    pub fn user_data(&self, hash: NameHash) -> Option<&HostData> {
        self.get(hash)?.user_data()
    }

    /// Check if a module with this name hash is registered.
    pub fn is_loaded(&self, hash: NameHash) -> bool {
        self.modules.contains_key(&hash.value())
    }

    /// Check if a module with this logical name is registered.
    pub fn is_loaded_name(&self, name: &str) -> bool {
        self.is_loaded(hash_name(name))
    }

    /// Replace a module's source. `None` if the module is not registered.
    ///
    /// Returns the module's logical name so the caller can compile the new
    /// source under it.
    pub fn replace_source(&mut self, hash: NameHash, source: &[u8]) -> Option<String> {
        let module = self.modules.get_mut(&hash.value())?;
        module.replace_source(source);
        Some(module.name().to_owned())
    }

    /// Get the number of registered modules.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Iterate over all registered modules, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ScriptModule> {
        self.modules.values()
    }

    /// Names of all registered modules, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.modules.values().map(ScriptModule::name).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ModuleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ModuleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleStore")
            .field("module_count", &self.modules.len())
            .field("capacity", &self.capacity)
            .field("growth_count", &self.growth_count)
            .finish()
    }
}

/// Module store shared between the host and the searcher hook.
pub type SharedModuleStore = Arc<RwLock<ModuleStore>>;

/// Create a new shared module store.
pub fn new_shared_store() -> SharedModuleStore {
    Arc::new(RwLock::new(ModuleStore::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_new() {
        let store = ModuleStore::new();
        assert_eq!(store.module_count(), 0);
        assert_eq!(store.capacity(), 0);
        assert!(store.is_full());
    }

    #[test]
    fn test_register_module() {
        let mut store = ModuleStore::new();
        let hash = store.register("mathutils", b"return {}", None);

        assert_eq!(hash, hash_name("mathutils"));
        assert_eq!(store.module_count(), 1);
        assert!(store.is_loaded(hash));
        assert!(store.is_loaded_name("mathutils"));
        assert!(!store.is_loaded_name("other"));

        let module = store.get(hash).unwrap();
        assert_eq!(module.name(), "mathutils");
        assert_eq!(module.source(), b"return {}");
    }

    #[test]
    fn test_register_same_name_updates_in_place() {
        let mut store = ModuleStore::new();
        let first = store.register("a", b"return 1", Some(Arc::new(1u8)));
        let second = store.register("a", b"return 2", Some(Arc::new(2u8)));

        assert_eq!(first, second);
        assert_eq!(store.module_count(), 1);

        let module = store.get(first).unwrap();
        assert_eq!(module.source(), b"return 2");
        assert_eq!(module.user_data_as::<u8>(), Some(&2));
    }

    #[test]
    fn test_first_registration_grows_from_zero() {
        let mut store = ModuleStore::new();
        store.register("a", b"", None);

        assert_eq!(store.capacity(), GROWTH_CHUNK);
        assert_eq!(store.growth_count(), 1);
    }

    #[test]
    fn test_growth_preserves_records() {
        let mut store = ModuleStore::new();
        let count = GROWTH_CHUNK * 2 + 5;

        for i in 0..count {
            let source = format!("return {}", i);
            store.register(&format!("mod{}", i), source.as_bytes(), None);
        }

        assert_eq!(store.module_count(), count);
        assert_eq!(store.capacity(), GROWTH_CHUNK * 3);
        assert_eq!(store.growth_count(), 3);

        for i in 0..count {
            let module = store.get_by_name(&format!("mod{}", i)).unwrap();
            assert_eq!(module.source(), format!("return {}", i).as_bytes());
        }
    }

    #[test]
    fn test_update_does_not_grow_full_store() {
        let mut store = ModuleStore::with_capacity(1);
        store.register("a", b"1", None);
        assert!(store.is_full());

        store.register("a", b"2", None);
        assert_eq!(store.capacity(), 1);
        assert_eq!(store.growth_count(), 0);
    }

    #[test]
    fn test_user_data_absent_module() {
        let mut store = ModuleStore::new();
        store.register("plain", b"", None);

        assert!(store.user_data(hash_name("missing")).is_none());
        assert!(store.user_data(hash_name("plain")).is_none());
    }

    #[test]
    fn test_user_data_passthrough() {
        let mut store = ModuleStore::new();
        let data: HostData = Arc::new(String::from("component"));
        let hash = store.register("m", b"", Some(Arc::clone(&data)));

        let stored = store.user_data(hash).unwrap();
        assert!(Arc::ptr_eq(stored, &data));
    }

    #[test]
    fn test_replace_source() {
        let mut store = ModuleStore::new();
        let hash = store.register("m", b"return 1", None);

        assert_eq!(store.replace_source(hash, b"return 2").as_deref(), Some("m"));
        assert_eq!(store.get(hash).unwrap().source(), b"return 2");

        assert!(store.replace_source(hash_name("missing"), b"x").is_none());
        assert_eq!(store.module_count(), 1);
    }

    #[test]
    fn test_names_sorted() {
        let mut store = ModuleStore::new();
        store.register("b", b"", None);
        store.register("a", b"", None);
        store.register("c", b"", None);

        assert_eq!(store.names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_shared_store() {
        let store = new_shared_store();
        store.write().register("m", b"return 1", None);
        assert_eq!(store.read().module_count(), 1);
    }
}
