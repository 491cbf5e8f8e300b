//! GiftLink core: gift records, identifier resolution, and document store access.
//!
//! # Modules
//!
//! - [`types`]: The loosely-typed gift record and its identifier styles
//! - [`lookup`]: Three-tier identifier resolution (string id, numeric id, native id)
//! - [`store`]: The [`GiftStore`](store::GiftStore) collaborator trait and its errors
//! - [`memory`]: In-process store for development and tests
//! - [`mongo`]: MongoDB store (feature-gated)
//! - [`filter`]: Search filter state and the `/api/search` wire query
//! - [`config`]: `giftlink.toml` loading with environment overrides

pub mod config;
pub mod filter;
pub mod lookup;
pub mod memory;
#[cfg(feature = "mongo")]
pub mod mongo;
pub mod store;
pub mod types;

pub use config::{load_giftlink_config, GiftlinkConfig};
pub use filter::{AgeCeiling, Category, Condition, GiftQuery, SearchFilters};
pub use lookup::{resolve_gift, Lookup};
pub use memory::MemoryStore;
#[cfg(feature = "mongo")]
pub use mongo::MongoStore;
pub use store::{GiftStore, StoreError};
pub use types::{Gift, GiftId, GiftSummary};
