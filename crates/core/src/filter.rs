//! Search filters.
//!
//! [`SearchFilters`] is the typed state behind the search form; [`GiftQuery`] is what
//! goes over the wire to `GET /api/search` and what the store evaluates. Only set
//! fields contribute to the outgoing query.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::types::{Gift, FIELD_AGE_YEARS, FIELD_CATEGORY, FIELD_CONDITION, FIELD_NAME};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("Age must be between {min} and {max} years, got {0}", min = AgeCeiling::MIN, max = AgeCeiling::MAX)]
    AgeOutOfRange(u8),

    #[error("Unknown category '{0}' (expected one of: {list})", list = Category::labels())]
    UnknownCategory(String),

    #[error("Unknown condition '{0}' (expected one of: {list})", list = Condition::labels())]
    UnknownCondition(String),
}

// ---------------------------------------------------------------------------
// Enumerated filter values
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Living,
    Bedroom,
    Bathroom,
    Kitchen,
    Office,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Living,
        Category::Bedroom,
        Category::Bathroom,
        Category::Kitchen,
        Category::Office,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Living => "Living",
            Category::Bedroom => "Bedroom",
            Category::Bathroom => "Bathroom",
            Category::Kitchen => "Kitchen",
            Category::Office => "Office",
        }
    }

    fn labels() -> String {
        Self::ALL.iter().map(|c| c.label()).collect::<Vec<_>>().join(", ")
    }
}

impl FromStr for Category {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FilterError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Condition {
    New,
    LikeNew,
    Older,
}

impl Condition {
    pub const ALL: [Condition; 3] = [Condition::New, Condition::LikeNew, Condition::Older];

    pub fn label(self) -> &'static str {
        match self {
            Condition::New => "New",
            Condition::LikeNew => "Like New",
            Condition::Older => "Older",
        }
    }

    fn labels() -> String {
        Self::ALL.iter().map(|c| c.label()).collect::<Vec<_>>().join(", ")
    }
}

impl FromStr for Condition {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept "like-new" / "like_new" from the command line.
        let normalized = s.trim().replace(['-', '_'], " ");
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| FilterError::UnknownCondition(s.to_string()))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Maximum item age in years, bounded to the slider range 1..=10.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct AgeCeiling(u8);

impl AgeCeiling {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;
    /// Slider position before the user touches it.
    pub const DEFAULT: AgeCeiling = AgeCeiling(6);

    pub fn new(years: u8) -> Result<Self, FilterError> {
        if (Self::MIN..=Self::MAX).contains(&years) {
            Ok(Self(years))
        } else {
            Err(FilterError::AgeOutOfRange(years))
        }
    }

    pub fn years(self) -> u8 {
        self.0
    }
}

impl Default for AgeCeiling {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ---------------------------------------------------------------------------
// Filter state and wire query
// ---------------------------------------------------------------------------

/// Filter form state. `None` means "all" / not set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchFilters {
    pub name: Option<String>,
    pub max_age: Option<AgeCeiling>,
    pub category: Option<Category>,
    pub condition: Option<Condition>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.to_query().is_empty()
    }

    /// The wire query carrying only the set fields. A blank name counts as unset.
    pub fn to_query(&self) -> GiftQuery {
        GiftQuery {
            name: self.name.as_ref().map(|n| n.trim()).filter(|n| !n.is_empty()).map(str::to_string),
            age_years: self.max_age.map(|a| u32::from(a.years())),
            category: self.category.map(|c| c.label().to_string()),
            condition: self.condition.map(|c| c.label().to_string()),
        }
    }
}

/// Query parameters of `GET /api/search`. Field order is the order parameters are sent in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_years: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl GiftQuery {
    pub fn is_empty(&self) -> bool {
        self.name_term().is_none()
            && self.age_years.is_none()
            && self.category_term().is_none()
            && self.condition_term().is_none()
    }

    pub fn name_term(&self) -> Option<&str> {
        non_blank(&self.name)
    }

    pub fn category_term(&self) -> Option<&str> {
        non_blank(&self.category)
    }

    pub fn condition_term(&self) -> Option<&str> {
        non_blank(&self.condition)
    }

    /// Case-insensitive pattern matching the name term literally.
    pub fn name_pattern(&self) -> Option<String> {
        self.name_term().map(regex::escape)
    }

    /// `(key, value)` pairs for the set fields, in wire order.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(name) = self.name_term() {
            pairs.push(("name", name.to_string()));
        }
        if let Some(age) = self.age_years {
            pairs.push(("age_years", age.to_string()));
        }
        if let Some(category) = self.category_term() {
            pairs.push(("category", category.to_string()));
        }
        if let Some(condition) = self.condition_term() {
            pairs.push(("condition", condition.to_string()));
        }
        pairs
    }

    /// Prepare an in-process matcher. The name term is matched as a literal,
    /// case-insensitive substring, so no pattern has to be compiled.
    pub fn matcher(&self) -> GiftMatcher<'_> {
        GiftMatcher { query: self, name: self.name_term().map(str::to_lowercase) }
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// A [`GiftQuery`] ready to test documents in memory.
pub struct GiftMatcher<'a> {
    query: &'a GiftQuery,
    /// Lowercased name term.
    name: Option<String>,
}

impl GiftMatcher<'_> {
    pub fn matches(&self, gift: &Gift) -> bool {
        if let Some(ref needle) = self.name {
            match gift.get(FIELD_NAME).and_then(|v| v.as_str()) {
                Some(name) if name.to_lowercase().contains(needle.as_str()) => {}
                _ => return false,
            }
        }
        if let Some(category) = self.query.category_term() {
            if gift.get(FIELD_CATEGORY).and_then(|v| v.as_str()) != Some(category) {
                return false;
            }
        }
        if let Some(condition) = self.query.condition_term() {
            if gift.get(FIELD_CONDITION).and_then(|v| v.as_str()) != Some(condition) {
                return false;
            }
        }
        if let Some(max) = self.query.age_years {
            match gift.get(FIELD_AGE_YEARS).and_then(|v| v.as_f64()) {
                Some(age) if age <= f64::from(max) => {}
                _ => return false,
            }
        }
        true
    }
}
