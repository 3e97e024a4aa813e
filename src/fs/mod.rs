//! Filesystem operation layer.
//!
//! Four engines sit behind the HTTP routes:
//!
//! - [`listing`]: one directory's children as sorted [`Entry`](crate::types::Entry) snapshots
//! - [`mutation`]: create, rename, delete, copy and move with collision handling
//! - [`search`]: bounded recursive walk plus fuzzy ranking via [`fuzzy`]
//! - [`content_search`]: gitignore-aware line search through file contents
//!
//! [`shell`] adds the desktop integrations (default app, trash, home dir).
//!
//! All operations are synchronous and hold no shared state. Callers on an
//! async runtime should run them on a blocking thread. Concurrent operations
//! on the same path are not coordinated here.

pub mod content_search;
pub mod error;
pub mod fuzzy;
pub mod listing;
pub mod mutation;
pub mod search;
pub mod shell;

pub use content_search::{content_search, ContentSearchOptions, ContentSearchOutcome};
pub use error::{FsError, FsResult};
pub use listing::{list_directory, read_entry};
pub use mutation::{copy, create_directory, create_directory_at, delete, move_entry, rename};
pub use search::{is_traversable, search, search_with, SearchOptions, SearchOutcome};
pub use shell::{home_directory, move_to_trash, open_path};
