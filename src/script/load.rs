//! Compile/Load
//!
//! Compiles a source buffer into a callable chunk without running it.

use mlua::{Function, Lua};
use tracing::{error, trace};

use super::reader::ChunkReader;
use crate::error::{ScriptError, ScriptResult};

/// Compile `source` under `chunk_name`.
///
/// On success the caller owns exactly one new chunk. On failure the
/// interpreter's message is logged and returned; nothing is left behind.
pub fn load_script(lua: &Lua, source: &[u8], chunk_name: &str) -> ScriptResult<Function> {
    let chunk = ChunkReader::new(source).drain();
    trace!(chunk = chunk_name, len = chunk.len(), "compiling chunk");

    lua.load(chunk.as_ref())
        .set_name(chunk_name)
        .into_function()
        .map_err(|err| script_failure(&err))
}

/// Log an interpreter failure and turn it into a [`ScriptError`].
pub(crate) fn script_failure(err: &mlua::Error) -> ScriptError {
    let message = error_message(err);
    error!("Error running script: {}", message);
    ScriptError::Lua(message)
}

/// Extract the interpreter's message from an error.
pub(crate) fn error_message(err: &mlua::Error) -> String {
    match err {
        mlua::Error::SyntaxError { message, .. } => message.clone(),
        mlua::Error::RuntimeError(message) => message.clone(),
        mlua::Error::CallbackError { cause, .. } => error_message(cause),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_valid_script() {
        let lua = Lua::new();
        let chunk = load_script(&lua, b"return 40 + 2", "answer").expect("compiles");

        let value: i64 = chunk.call(()).expect("runs");
        assert_eq!(value, 42);
    }

    #[test]
    fn test_load_does_not_execute() {
        let lua = Lua::new();
        load_script(&lua, b"ran = true", "side_effect").expect("compiles");

        let ran: Option<bool> = lua.globals().get("ran").expect("global read");
        assert_eq!(ran, None);
    }

    #[test]
    fn test_load_syntax_error() {
        let lua = Lua::new();
        let err = load_script(&lua, b"return +", "broken").unwrap_err();

        match err {
            ScriptError::Lua(message) => assert!(message.contains("broken")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_empty_source() {
        let lua = Lua::new();
        let chunk = load_script(&lua, b"", "empty").expect("compiles");

        let value: mlua::Value = chunk.call(()).expect("runs");
        assert!(value.is_nil());
    }

    #[test]
    fn test_chunk_name_in_traceback() {
        let lua = Lua::new();
        let chunk = load_script(&lua, b"error('bad')", "my.module").expect("compiles");

        let err = chunk.call::<()>(()).unwrap_err();
        assert!(error_message(&err).contains("my.module"));
    }
}
