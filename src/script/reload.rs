//! Hot Reload
//!
//! Replaces a registered module's source and immediately runs the new
//! source against a live interpreter state. The chunk is called with the
//! module name as its only argument, matching what `require` passes.

use mlua::{Lua, MultiValue, Value};
use tracing::{debug, trace};

use super::load::{load_script, script_failure};
use crate::error::{ScriptError, ScriptResult};
use crate::modules::{NameHash, SharedModuleStore};

/// Replace the source of the module stored under `hash` and re-run it.
///
/// Reload never registers: an unknown hash fails with
/// [`ScriptError::ModuleNotLoaded`] and the store is not touched. The new
/// source is stored even if it then fails to compile or run, so the next
/// `require` sees the same source the host pushed.
///
/// On success the module's logical name and the chunk's return values are
/// handed back to the caller.
pub fn reload_returning(
    lua: &Lua,
    store: &SharedModuleStore,
    source: &[u8],
    hash: NameHash,
) -> ScriptResult<(String, MultiValue)> {
    let name = store
        .write()
        .replace_source(hash, source)
        .ok_or(ScriptError::ModuleNotLoaded(hash))?;
    trace!(module = %name, len = source.len(), "module source replaced");

    let chunk = load_script(lua, source, &name)?;
    let results = chunk
        .call::<MultiValue>(name.as_str())
        .map_err(|err| script_failure(&err))?;

    debug!(module = %name, returned = results.len(), "module reloaded");
    Ok((name, results))
}

/// Reload a module, discarding whatever the chunk returns.
pub fn reload(
    lua: &Lua,
    store: &SharedModuleStore,
    source: &[u8],
    hash: NameHash,
) -> ScriptResult<()> {
    reload_returning(lua, store, source, hash).map(drop)
}

/// Point `package.loaded[name]` at a reloaded module's value.
///
/// Nil values and bare states (no `package` table) leave things as they are.
/// Returns whether the entry was replaced.
pub fn refresh_loaded(lua: &Lua, name: &str, value: Value) -> ScriptResult<bool> {
    if value.is_nil() {
        return Ok(false);
    }

    let loaded = match lua.globals().get::<Value>("package") {
        Ok(Value::Table(package)) => package.get::<Value>("loaded"),
        Ok(_) => return Ok(false),
        Err(err) => return Err(script_failure(&err)),
    };

    match loaded {
        Ok(Value::Table(loaded)) => {
            loaded.set(name, value).map_err(|err| script_failure(&err))?;
            trace!(module = name, "package.loaded refreshed");
            Ok(true)
        }
        Ok(_) => Ok(false),
        Err(err) => Err(script_failure(&err)),
    }
}
