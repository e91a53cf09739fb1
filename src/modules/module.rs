//! Script Module Record
//!
//! A `ScriptModule` is one registered module: its logical name, the name
//! hash it is stored under, an owned copy of its source bytes and an opaque
//! host value carried alongside it.

use std::any::Any;
use std::sync::Arc;

use super::hash::{hash_name, NameHash};

/// Opaque host value attached to a module.
///
/// The registry never inspects it; hosts downcast it back with
/// [`ScriptModule::user_data_as`].
pub type HostData = Arc<dyn Any + Send + Sync>;

/// A registered script module.
#[derive(Clone)]
pub struct ScriptModule {
    /// Logical name given at registration. Never changes.
    name: String,

    /// Hash of `name`, the store key.
    name_hash: NameHash,

    /// Module source. Replaced wholesale on reload; never partially mutated.
    source: Arc<[u8]>,

    /// Host-supplied value, passed through unchanged.
    user_data: Option<HostData>,
}

impl ScriptModule {
    /// Create a module record, copying `name` and `source` into owned storage.
    pub fn new(name: &str, source: &[u8], user_data: Option<HostData>) -> Self {
        Self {
            name: name.to_owned(),
            name_hash: hash_name(name),
            source: Arc::from(source),
            user_data,
        }
    }

    /// Get the module's logical name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the hash the module is stored under.
    pub fn name_hash(&self) -> NameHash {
        self.name_hash
    }

    /// Get the module's source bytes.
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    /// Get a shared handle to the current source buffer.
    ///
    /// The handle stays valid after a reload swaps the module's source; it
    /// simply keeps the old buffer alive until dropped.
    pub fn source_handle(&self) -> Arc<[u8]> {
        Arc::clone(&self.source)
    }

    /// Get the source length in bytes.
    pub fn source_len(&self) -> usize {
        self.source.len()
    }

    /// Get the host value, if one was supplied.
    pub fn user_data(&self) -> Option<&HostData> {
        self.user_data.as_ref()
    }

    /// Downcast the host value to a concrete type.
    pub fn user_data_as<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.user_data.as_ref()?.downcast_ref::<T>()
    }

    /// Replace the source with an owned copy of `source`.
    pub(crate) fn replace_source(&mut self, source: &[u8]) {
        self.source = Arc::from(source);
    }

    /// Replace the host value.
    pub(crate) fn set_user_data(&mut self, user_data: Option<HostData>) {
        self.user_data = user_data;
    }
}

impl std::fmt::Debug for ScriptModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptModule")
            .field("name", &self.name)
            .field("name_hash", &self.name_hash.to_string())
            .field("source_len", &self.source.len())
            .field("has_user_data", &self.user_data.is_some())
            .finish()
    }
}
