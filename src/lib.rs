//! luamod - Dynamic Lua Module Registry
//!
//! This library lets a host hand named Lua sources to an embedded interpreter
//! at runtime. Script code loads them with plain `require`, and the host can
//! hot-reload any of them into a live state.
//!
//! # Architecture
//!
//! 1. **Module Store** (`modules` module)
//!    - Owns module records keyed by a 64-bit hash of the module name
//!    - Re-registering a name updates the record in place
//!    - Grows in chunks of 128 slots
//!    - Optional TOML manifest listing modules to register
//!
//! 2. **Interpreter Bridge** (`script` module)
//!    - Compiles stored sources into chunks
//!    - Searcher appended after the host's own `package.searchers`
//!    - Reload: swap source, recompile, re-run with the module name
//!
//! 3. **Context** (`context` module)
//!    - Host-facing handle tying the store to one or more Lua states
//!
//! # Example
//!
//! ```rust
//! use luamod::{LoadOptions, ScriptContext};
//! use mlua::Lua;
//!
//! let lua = Lua::new();
//! let context = ScriptContext::new(LoadOptions::default());
//! let hash = context.add_module(
//!     "mathutils",
//!     b"return {add=function(a,b) return a+b end}",
//!     None,
//! );
//! context.attach(&lua).unwrap();
//!
//! let sum: i64 = lua.load("return require('mathutils').add(2, 3)").eval().unwrap();
//! assert_eq!(sum, 5);
//!
//! context
//!     .reload_module(&lua, b"return {add=function(a,b) return a*b end}", hash)
//!     .unwrap();
//! let product: i64 = lua.load("return require('mathutils').add(2, 3)").eval().unwrap();
//! assert_eq!(product, 6);
//! ```
//!
//! # Errors
//!
//! - `ModuleNotLoaded`: reload of a name that was never registered
//! - `Lua`: compile or runtime failure, logged through `tracing` when it happens
//! - Inside `require`, a module that exists but fails to compile raises a Lua error

pub mod context;
pub mod error;
pub mod modules;
pub mod script;

pub use context::ScriptContext;
pub use error::{ScriptError, ScriptResult};
pub use modules::{
    hash_name, HostData, LoadOptions, ModuleManifest, ModuleStore, NameHash, ScriptModule,
    SharedModuleStore,
};
pub use script::{load_script, ChunkReader};
