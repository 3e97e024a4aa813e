//! Scenario and API tests for the explorer backend.
//!
//! Unit tests live next to the code they cover; the modules here exercise
//! whole operations against scratch trees built with `tempfile`.
//!
//! ## Test Modules
//!
//! - **listing_tests**: directory listing order and entry snapshots
//! - **mutation_tests**: create, rename, delete, copy and move
//! - **search_tests**: pruning, caps and ranking of the fuzzy search
//! - **content_search_tests**: line matches, flags, ignore rules and the match cap
//! - **api_tests**: the router end to end, including status mapping
//! - **error_tests**: `AppError` responses and the `FsError` mapping
//! - **config_tests**: defaults and validation
//!
//! Individual modules can be run with:
//! ```bash
//! cargo test search_tests
//! ```

pub mod mutation_tests;
