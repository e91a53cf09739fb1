//! Error types for module registration, loading and reloading.

use std::path::PathBuf;

use crate::modules::NameHash;

/// Result type for script module operations.
pub type ScriptResult<T> = Result<T, ScriptError>;

/// Errors returned by script module operations.
///
/// Interpreter failures are logged where they happen, so the text carried in
/// [`ScriptError::Lua`] has already been reported once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// Reload requested for a module that was never registered.
    ModuleNotLoaded(NameHash),
    /// The interpreter rejected the source or the loaded chunk raised.
    Lua(String),
    /// A module or manifest file could not be read.
    Io(PathBuf, String),
    /// A manifest could not be parsed.
    Manifest(PathBuf, String),
}

impl ScriptError {
    /// Check whether this is an interpreter failure.
    pub fn is_lua(&self) -> bool {
        matches!(self, ScriptError::Lua(_))
    }
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptError::ModuleNotLoaded(hash) => {
                write!(f, "Module not loaded: {}", hash)
            }
            ScriptError::Lua(msg) => write!(f, "Lua error: {}", msg),
            ScriptError::Io(path, err) => {
                write!(f, "Failed to read '{}': {}", path.display(), err)
            }
            ScriptError::Manifest(path, err) => {
                write!(f, "Failed to parse manifest '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for ScriptError {}

impl From<mlua::Error> for ScriptError {
    fn from(err: mlua::Error) -> Self {
        ScriptError::Lua(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScriptError::ModuleNotLoaded(NameHash(0x10));
        assert_eq!(err.to_string(), "Module not loaded: 0000000000000010");

        let err = ScriptError::Lua("attempt to call a nil value".to_string());
        assert!(err.to_string().contains("attempt to call a nil value"));
        assert!(err.is_lua());

        let err = ScriptError::Io(PathBuf::from("/scripts/a.lua"), "No such file".to_string());
        assert!(err.to_string().contains("/scripts/a.lua"));
        assert!(err.to_string().contains("No such file"));
        assert!(!err.is_lua());
    }

    #[test]
    fn test_from_mlua_error() {
        let err: ScriptError = mlua::Error::RuntimeError("boom".to_string()).into();
        assert!(matches!(err, ScriptError::Lua(ref msg) if msg.contains("boom")));
    }
}
