//! Search view: filter state, result set, and card rendering.
//!
//! Every fetch takes a [`Ticket`] from the shared [`ResultSlot`]. A response only
//! replaces the result set if its ticket is still the latest one issued, so a slow
//! early request can never overwrite the results of a later one.

use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use giftlink_core::{AgeCeiling, Category, Condition, Gift, GiftId, SearchFilters};
use thiserror::Error;
use tracing::{debug, warn};

use crate::client::{ClientError, GiftSource};

/// Shown in place of cards when the result set is empty.
pub const EMPTY_MESSAGE: &str = "No products found. Please revise your filters.";
/// Description characters shown on a card before the ellipsis.
pub const BLURB_CHARS: usize = 100;

/// Client-side route prefix of the detail view.
pub const PRODUCT_ROUTE: &str = "/app/product/";

/// Client-side route of the detail view for a gift.
pub fn detail_path(id: &GiftId) -> String {
    format!("{PRODUCT_ROUTE}{id}")
}

// ---------------------------------------------------------------------------
// Result slot (last request wins)
// ---------------------------------------------------------------------------

/// Sequence number carried by one fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// The current result set plus the ticket counter guarding it.
#[derive(Default)]
pub struct ResultSlot {
    issued: AtomicU64,
    inner: Mutex<SlotInner>,
}

#[derive(Default)]
struct SlotInner {
    applied: u64,
    gifts: Vec<Gift>,
}

impl ResultSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch. Invalidates every ticket issued before.
    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    /// Replace the result set if `ticket` is still the latest. Returns whether it was applied.
    pub fn publish(&self, ticket: Ticket, gifts: Vec<Gift>) -> bool {
        let mut inner = self.inner.lock();
        if !self.is_latest(ticket) || ticket.0 <= inner.applied {
            return false;
        }
        inner.applied = ticket.0;
        inner.gifts = gifts;
        true
    }

    pub fn gifts(&self) -> Vec<Gift> {
        self.inner.lock().gifts.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().gifts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// One result card.
#[derive(Clone, Debug, PartialEq)]
pub struct GiftCard {
    pub id: Option<GiftId>,
    pub name: String,
    pub image: Option<String>,
    pub blurb: String,
}

impl GiftCard {
    pub fn from_gift(gift: &Gift) -> Self {
        let summary = gift.summary();
        GiftCard {
            id: summary.id,
            name: summary.name.unwrap_or_default(),
            image: summary.image.filter(|i| !i.is_empty()),
            blurb: blurb(summary.description.as_deref()),
        }
    }

    /// Where "View More" leads, if the gift has any identifier.
    pub fn detail_path(&self) -> Option<String> {
        self.id.as_ref().map(detail_path)
    }
}

/// First [`BLURB_CHARS`] characters of the description followed by `...`; empty without one.
pub fn blurb(description: Option<&str>) -> String {
    match description {
        Some(d) if !d.is_empty() => {
            let head: String = d.chars().take(BLURB_CHARS).collect();
            format!("{head}...")
        }
        _ => String::new(),
    }
}

/// What the view displays: cards, or exactly one informational placeholder.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchPage {
    Results(Vec<GiftCard>),
    Empty { message: &'static str },
}

impl SearchPage {
    pub fn from_gifts(gifts: &[Gift]) -> Self {
        if gifts.is_empty() {
            SearchPage::Empty { message: EMPTY_MESSAGE }
        } else {
            SearchPage::Results(gifts.iter().map(GiftCard::from_gift).collect())
        }
    }

    pub fn cards(&self) -> &[GiftCard] {
        match self {
            SearchPage::Results(cards) => cards,
            SearchPage::Empty { .. } => &[],
        }
    }
}

impl fmt::Display for SearchPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchPage::Empty { message } => writeln!(f, "{message}"),
            SearchPage::Results(cards) => {
                for (i, card) in cards.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    writeln!(f, "[{}] {}", i + 1, card.name)?;
                    if let Some(ref image) = card.image {
                        writeln!(f, "    image: {image}")?;
                    }
                    if !card.blurb.is_empty() {
                        writeln!(f, "    {}", card.blurb)?;
                    }
                    if let Some(path) = card.detail_path() {
                        writeln!(f, "    -> {path}")?;
                    }
                }
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Search view
// ---------------------------------------------------------------------------

/// Why a card could not be opened. Indexes are 0-based.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectError {
    #[error("No card #{} ({count} shown)", .index + 1)]
    NoSuchCard { index: usize, count: usize },

    #[error("Card #{} has no id to open", .index + 1)]
    NoIdentifier { index: usize },
}

/// How a fetch ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch was issued while this one was in flight; its response was dropped.
    Superseded,
    /// The request failed; the previous result set is kept.
    Failed,
}

pub struct SearchView {
    source: Arc<dyn GiftSource>,
    filters: SearchFilters,
    /// Slider position; only sent once the age filter is enabled.
    age_slider: AgeCeiling,
    slot: Arc<ResultSlot>,
}

impl SearchView {
    pub fn new(source: Arc<dyn GiftSource>) -> Self {
        Self {
            source,
            filters: SearchFilters::default(),
            age_slider: AgeCeiling::DEFAULT,
            slot: Arc::new(ResultSlot::new()),
        }
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.filters.name = if name.is_empty() { None } else { Some(name) };
    }

    /// Move the age slider. This also enables the age filter.
    pub fn set_max_age(&mut self, years: AgeCeiling) {
        self.age_slider = years;
        self.filters.max_age = Some(years);
    }

    pub fn clear_max_age(&mut self) {
        self.filters.max_age = None;
    }

    pub fn age_slider(&self) -> AgeCeiling {
        self.age_slider
    }

    /// `None` selects all categories.
    pub fn set_category(&mut self, category: Option<Category>) {
        self.filters.category = category;
    }

    /// `None` selects all conditions.
    pub fn set_condition(&mut self, condition: Option<Condition>) {
        self.filters.condition = condition;
    }

    /// Initial display: fetch the unfiltered list.
    pub async fn load(&self) -> FetchOutcome {
        let ticket = self.slot.issue();
        let result = self.source.list_all().await;
        self.apply(ticket, result, "Fetch error")
    }

    /// Explicit search with the current filters.
    pub async fn search(&self) -> FetchOutcome {
        self.search_with(&self.filters).await
    }

    /// Search with explicit filters, leaving the view's own filter state alone.
    pub async fn search_with(&self, filters: &SearchFilters) -> FetchOutcome {
        let ticket = self.slot.issue();
        let query = filters.to_query();
        let result = self.source.search(&query).await;
        self.apply(ticket, result, "Failed to fetch search results")
    }

    fn apply(
        &self,
        ticket: Ticket,
        result: Result<Vec<Gift>, ClientError>,
        context: &str,
    ) -> FetchOutcome {
        match result {
            Ok(gifts) => {
                let count = gifts.len();
                if self.slot.publish(ticket, gifts) {
                    debug!(count = count, "Result set replaced");
                    FetchOutcome::Applied
                } else {
                    debug!(ticket = ?ticket, "Dropping stale response");
                    FetchOutcome::Superseded
                }
            }
            Err(e) => {
                warn!(error = %e, "{context}");
                FetchOutcome::Failed
            }
        }
    }

    pub fn results(&self) -> Vec<Gift> {
        self.slot.gifts()
    }

    pub fn render(&self) -> SearchPage {
        SearchPage::from_gifts(&self.slot.gifts())
    }

    /// Detail route for the card at `index` (0-based), if it exists and has an identifier.
    pub fn select(&self, index: usize) -> Option<String> {
        self.select_card(index).ok()
    }

    /// Like [`select`](Self::select), but says whether the card is missing or has no id.
    pub fn select_card(&self, index: usize) -> Result<String, SelectError> {
        let page = self.render();
        let cards = page.cards();
        let card = cards.get(index).ok_or(SelectError::NoSuchCard { index, count: cards.len() })?;
        card.detail_path().ok_or(SelectError::NoIdentifier { index })
    }

    /// Fetch the record behind a detail route id.
    pub async fn open_detail(&self, id: &str) -> Result<Option<Gift>, ClientError> {
        self.source.get(id).await
    }
}
