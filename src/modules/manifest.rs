//! Module Manifest
//!
//! A manifest lists the script modules a host registers up front, plus the
//! options used when wiring the registry into an interpreter.
//!
//! ## Format (`luamod.toml`)
//!
//! ```toml
//! [options]
//! install_searcher = true
//! refresh_loaded_on_reload = true
//! initial_capacity = 0
//!
//! [modules]
//! mathutils = "scripts/mathutils.lua"
//! "game.player" = "scripts/game/player.lua"
//! ```
//!
//! Relative module paths resolve against the manifest's directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ScriptError, ScriptResult};

/// Options for wiring the module store into an interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Install the searcher hook when a context is attached to a Lua state.
    pub install_searcher: bool,

    /// After a successful reload, replace `package.loaded[name]` with the
    /// chunk's first return value (when it is not nil).
    pub refresh_loaded_on_reload: bool,

    /// Initial slot capacity of the module store.
    pub initial_capacity: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            install_searcher: true,
            refresh_loaded_on_reload: true,
            initial_capacity: 0,
        }
    }
}

impl LoadOptions {
    /// Options matching the bare registry behaviour: reload never touches
    /// `package.loaded`.
    pub fn strict() -> Self {
        Self {
            refresh_loaded_on_reload: false,
            ..Self::default()
        }
    }
}

/// Parsed `luamod.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleManifest {
    /// Loader options.
    #[serde(default)]
    pub options: LoadOptions,

    /// Module name -> source file path.
    #[serde(default)]
    pub modules: BTreeMap<String, PathBuf>,

    /// Directory relative module paths resolve against.
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl ModuleManifest {
    /// Parse a manifest from TOML content.
    pub fn parse_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load a manifest from a file.
    pub fn load(path: &Path) -> ScriptResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ScriptError::Io(path.to_path_buf(), e.to_string()))?;
        let mut manifest = Self::parse_toml(&content)
            .map_err(|e| ScriptError::Manifest(path.to_path_buf(), e.to_string()))?;
        manifest.base_dir = path.parent().map(Path::to_path_buf);
        Ok(manifest)
    }

    /// Resolve a module's source path against the manifest directory.
    pub fn resolve_path(&self, module_path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if module_path.is_relative() => base.join(module_path),
            _ => module_path.to_path_buf(),
        }
    }

    /// Read every listed module's source, in name order.
    pub fn read_sources(&self) -> ScriptResult<Vec<(String, Vec<u8>)>> {
        self.modules
            .iter()
            .map(|(name, path)| {
                let full = self.resolve_path(path);
                let source = std::fs::read(&full)
                    .map_err(|e| ScriptError::Io(full.clone(), e.to_string()))?;
                Ok((name.clone(), source))
            })
            .collect()
    }

    /// Get the number of listed modules.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}
