//! Interpreter Bridge
//!
//! Everything that touches a Lua state:
//! - `ChunkReader` - One-shot pull reader over a source buffer
//! - `load_script` - Compile a buffer into a chunk without running it
//! - `create_searcher` / `install_searcher` - `require` fallback into the module store
//! - `reload` - Replace a module's source and re-run it

pub mod load;
pub mod reader;
pub mod reload;
pub mod searcher;

pub use load::load_script;
pub use reader::ChunkReader;
pub use reload::{refresh_loaded, reload, reload_returning};
pub use searcher::{create_searcher, install_searcher, max_searcher_key, searcher_list};
