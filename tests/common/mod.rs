//! Shared helpers for luamod integration tests
//!
//! - Locating Lua fixtures
//! - Building a Lua state with a context attached
//! - Calling into module tables returned by `require`

use luamod::{LoadOptions, ScriptContext};
use mlua::{Lua, Table, Value};
use std::path::PathBuf;

pub const MATHUTILS_ADD: &[u8] = b"return {add=function(a,b) return a+b end}";
pub const MATHUTILS_MUL: &[u8] = b"return {add=function(a,b) return a*b end}";

/// Get the path to the test fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Fresh Lua state with a default context attached
pub fn attached_context() -> (Lua, ScriptContext) {
    attached_context_with(LoadOptions::default())
}

/// Fresh Lua state with a context built from `options` attached
pub fn attached_context_with(options: LoadOptions) -> (Lua, ScriptContext) {
    let lua = Lua::new();
    let context = ScriptContext::new(options);
    assert!(context.attach(&lua).expect("attach"));
    (lua, context)
}

/// Call `module.add(a, b)` on a module table
pub fn call_add(module: &Value, a: i64, b: i64) -> i64 {
    let table: &Table = match module {
        Value::Table(table) => table,
        other => panic!("expected module table, got {other:?}"),
    };
    let add: mlua::Function = table.get("add").expect("add field");
    add.call((a, b)).expect("add call")
}

/// `require(name).add(a, b)` evaluated by script code
pub fn require_add(lua: &Lua, name: &str, a: i64, b: i64) -> i64 {
    lua.load(format!("return require('{}').add({}, {})", name, a, b))
        .eval()
        .expect("require and call")
}
