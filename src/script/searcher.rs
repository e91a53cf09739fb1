//! Module Searcher Hook
//!
//! A function installed at the end of `package.searchers` (`package.loaders`
//! on Lua 5.1) so that `require` falls back to the module store once every
//! searcher the host already registered has declined.
//!
//! The store is captured by the hook when it is created; nothing is looked
//! up through the interpreter's globals.
//!
//! Searcher protocol:
//! - Module absent: return one string describing the miss. `require` keeps
//!   walking the searcher list and reports the accumulated messages.
//! - Module present: return the compiled chunk as the module loader.
//! - Compile failure: raise, since the module exists but cannot be loaded.

use mlua::{Function, Lua, Table, Value};
use tracing::{debug, trace};

use super::load::load_script;
use crate::modules::{hash_bytes, NameHash, SharedModuleStore};

/// Create the searcher function bound to `store`.
pub fn create_searcher(lua: &Lua, store: SharedModuleStore) -> mlua::Result<Function> {
    lua.create_function(move |lua, name: mlua::String| {
        // Names are raw Lua strings; UTF-8 names hash the same as `hash_name`.
        let hash = NameHash(hash_bytes(&name.as_bytes()));
        let name = name.to_string_lossy();

        // Snapshot the record so the store is not locked while compiling.
        let found = {
            let store = store.read();
            store
                .get(hash)
                .map(|module| (module.name().to_owned(), module.source_handle()))
        };

        let Some((resolved, source)) = found else {
            trace!(module = %name, "module not in store");
            let message = lua.create_string(format!("no registered module '{}'", name))?;
            return Ok(Value::String(message));
        };

        match load_script(lua, &source, &resolved) {
            Ok(chunk) => Ok(Value::Function(chunk)),
            Err(err) => Err(mlua::Error::RuntimeError(format!(
                "error loading module '{}' from registered module '{}':\n\t{}",
                name, resolved, err
            ))),
        }
    })
}

/// Get the interpreter's searcher list.
///
/// `None` when the interpreter has no `package` library (a bare state).
pub fn searcher_list(lua: &Lua) -> mlua::Result<Option<Table>> {
    let package = match lua.globals().get::<Value>("package")? {
        Value::Table(package) => package,
        _ => return Ok(None),
    };

    for field in ["searchers", "loaders"] {
        if let Value::Table(list) = package.get::<Value>(field)? {
            return Ok(Some(list));
        }
    }
    Ok(None)
}

/// Highest integer key in a searcher list, or 0 for an empty list.
pub fn max_searcher_key(list: &Table) -> mlua::Result<i64> {
    let mut max_key = 0;
    for pair in list.pairs::<Value, Value>() {
        let (key, _) = pair?;
        if let Value::Integer(key) = key {
            max_key = max_key.max(key);
        }
    }
    Ok(max_key)
}

/// Append `searcher` after every searcher already installed.
///
/// Returns `Ok(false)` and leaves the state untouched when the interpreter
/// has no module support.
pub fn install_searcher(lua: &Lua, searcher: Function) -> mlua::Result<bool> {
    let Some(list) = searcher_list(lua)? else {
        debug!("no package library, module searcher not installed");
        return Ok(false);
    };

    let slot = max_searcher_key(&list)? + 1;
    list.raw_set(slot, searcher)?;
    debug!(slot, "module searcher installed");
    Ok(true)
}
