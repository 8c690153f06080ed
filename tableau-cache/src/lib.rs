//! # Tableau Cache
//!
//! Loads asset payloads on demand and keeps a bounded number of them
//! resident.
//!
//! ## Guarantees
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  load(id)                                   │
//! ├─────────────────────────────────────────────┤
//! │  resident    → returned immediately         │
//! │  in flight   → joins the one pending fetch  │
//! │  absent      → one fetch via AssetFetcher   │
//! ├─────────────────────────────────────────────┤
//! │  eviction: oldest inserted first            │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod error;
pub mod fetch;

pub use cache::{Asset, AssetCache, AssetOrigin, CacheConfig, CacheStats, DEFAULT_CAPACITY};
pub use error::{CacheError, CacheResult, FetchError};
pub use fetch::{AssetFetcher, FsFetcher, PlaceholderFetcher};
