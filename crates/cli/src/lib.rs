//! GiftLink search view.
//!
//! [`client`] talks to the listing service; [`view`] holds the filter state,
//! the current result set, and renders it as cards.

pub mod client;
pub mod view;

pub use client::{ClientError, GiftSource, HttpGiftSource, DEFAULT_BACKEND_URL};
pub use view::{detail_path, FetchOutcome, GiftCard, SearchPage, SearchView, SelectError, EMPTY_MESSAGE};
