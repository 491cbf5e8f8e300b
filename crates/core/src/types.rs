use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// ---------------------------------------------------------------------------
// Field names
// ---------------------------------------------------------------------------

/// Application-assigned identifier (string or number).
pub const FIELD_ID: &str = "id";
/// Store-assigned native identifier.
pub const FIELD_NATIVE_ID: &str = "_id";
pub const FIELD_NAME: &str = "name";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_CATEGORY: &str = "category";
pub const FIELD_CONDITION: &str = "condition";
pub const FIELD_AGE_YEARS: &str = "age_years";
pub const FIELD_IMAGE: &str = "image";

// ---------------------------------------------------------------------------
// Gift record
// ---------------------------------------------------------------------------

/// A gift document as stored: a dynamically keyed JSON object.
///
/// No schema is enforced. Known fields can be read through [`Gift::summary`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gift(pub Map<String, Value>);

impl Gift {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }

    /// The key used to navigate to this gift: `id` when present, else `_id`.
    pub fn key(&self) -> Option<GiftId> {
        self.get(FIELD_ID)
            .and_then(GiftId::from_value)
            .or_else(|| self.get(FIELD_NATIVE_ID).and_then(GiftId::from_value))
    }

    /// Typed projection of the known fields. Fields with an unexpected type read as `None`.
    pub fn summary(&self) -> GiftSummary {
        GiftSummary {
            id: self.key(),
            name: self.str_field(FIELD_NAME),
            description: self.str_field(FIELD_DESCRIPTION),
            category: self.str_field(FIELD_CATEGORY),
            condition: self.str_field(FIELD_CONDITION),
            age_years: self.get(FIELD_AGE_YEARS).and_then(Value::as_f64),
            image: self.str_field(FIELD_IMAGE),
        }
    }

    fn str_field(&self, field: &str) -> Option<String> {
        self.get(field).and_then(Value::as_str).map(str::to_string)
    }
}

impl From<Map<String, Value>> for Gift {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// The known fields of a gift, each optional.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GiftSummary {
    pub id: Option<GiftId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub age_years: Option<f64>,
    pub image: Option<String>,
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// One of the identifier styles found in the gifts collection.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GiftId {
    /// Legacy string business id, e.g. `"875"`.
    Text(String),
    /// Numeric id, e.g. `875`.
    Number(i64),
    /// Store-generated object id.
    Native(ObjectId),
}

impl GiftId {
    /// Read an identifier from a JSON value.
    ///
    /// 24-hex strings under `_id` are produced by the store, but a string under `id`
    /// stays [`GiftId::Text`] regardless of shape, so this only checks the value kind.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(GiftId::Text(s.clone())),
            Value::Number(n) => n.as_i64().map(GiftId::Number),
            Value::Object(obj) => obj
                .get("$oid")
                .and_then(Value::as_str)
                .and_then(|hex| ObjectId::parse_str(hex).ok())
                .map(GiftId::Native),
            _ => None,
        }
    }
}

impl fmt::Display for GiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GiftId::Text(s) => f.write_str(s),
            GiftId::Number(n) => write!(f, "{n}"),
            GiftId::Native(oid) => f.write_str(&oid.to_hex()),
        }
    }
}

/// Assign a fresh native identifier, rendered the way responses carry it (24-char hex).
pub fn new_native_id() -> Value {
    Value::String(ObjectId::new().to_hex())
}
