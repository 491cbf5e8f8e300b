use std::path::{Path, PathBuf};

use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// giftlink.toml
// ---------------------------------------------------------------------------

pub const CONFIG_FILE_NAME: &str = "giftlink.toml";

/// Known keys in `giftlink.toml` for config validation.
const KNOWN_CONFIG_KEYS: &[&str] =
    &["mongo_uri", "database", "collection", "port", "allowed_origins"];

/// Runtime configuration for the listing service. Loaded from `giftlink.toml` or defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct GiftlinkConfig {
    pub mongo_uri: String,
    pub database: String,
    pub collection: String,
    pub port: u16,
    /// Allowed CORS origins. Empty = permissive.
    pub allowed_origins: Vec<String>,
}

impl Default for GiftlinkConfig {
    fn default() -> Self {
        Self {
            mongo_uri: "mongodb://localhost:27017".to_string(),
            database: "giftdb".to_string(),
            collection: crate::store::GIFTS_COLLECTION.to_string(),
            port: 3060,
            allowed_origins: Vec::new(),
        }
    }
}

impl GiftlinkConfig {
    /// Apply `MONGO_URL`, `GIFTLINK_DATABASE` and `PORT` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup. Unparsable values are ignored with a warning.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(uri) = var("MONGO_URL").filter(|v| !v.is_empty()) {
            debug!("Using MONGO_URL from environment");
            self.mongo_uri = uri;
        }
        if let Some(db) = var("GIFTLINK_DATABASE").filter(|v| !v.is_empty()) {
            self.database = db;
        }
        if let Some(port) = var("PORT") {
            match port.parse() {
                Ok(p) => self.port = p,
                Err(e) => warn!(value = port.as_str(), error = %e, "Ignoring invalid PORT"),
            }
        }
    }
}

/// Simple Levenshtein edit distance for typo suggestions.
fn edit_distance(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn closest_known_key(key: &str) -> Option<&'static str> {
    KNOWN_CONFIG_KEYS
        .iter()
        .copied()
        .min_by_key(|k| edit_distance(key, k))
        .filter(|k| edit_distance(key, k) <= 3)
}

/// Load configuration from a `giftlink.toml` file.
///
/// Returns defaults merged with any overrides from the file. A missing file yields
/// defaults silently; an unreadable or unparsable one yields defaults with a warning.
/// Unknown keys trigger a warning with a typo suggestion.
pub fn load_giftlink_config(path: &Path) -> GiftlinkConfig {
    let mut config = GiftlinkConfig::default();
    if !path.exists() {
        return config;
    }

    debug!(path = %path.display(), "Loading giftlink.toml");
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not read config file");
            return config;
        }
    };
    let table = match content.parse::<toml::Table>() {
        Ok(t) => t,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to parse giftlink.toml");
            return config;
        }
    };

    // Validate keys: warn on unknown
    for key in table.keys() {
        if KNOWN_CONFIG_KEYS.contains(&key.as_str()) {
            continue;
        }
        match closest_known_key(key) {
            Some(suggestion) => warn!(
                key = key.as_str(),
                suggestion = suggestion,
                "Unknown key in giftlink.toml, did you mean '{suggestion}'?"
            ),
            None => warn!(
                key = key.as_str(),
                "Unknown key in giftlink.toml (known keys: {})",
                KNOWN_CONFIG_KEYS.join(", ")
            ),
        }
    }

    if let Some(uri) = table.get("mongo_uri").and_then(|v| v.as_str()) {
        config.mongo_uri = uri.to_string();
    }
    if let Some(db) = table.get("database").and_then(|v| v.as_str()) {
        config.database = db.to_string();
    }
    if let Some(coll) = table.get("collection").and_then(|v| v.as_str()) {
        config.collection = coll.to_string();
    }
    if let Some(port) = table.get("port").and_then(|v| v.as_integer()) {
        match u16::try_from(port) {
            Ok(p) => config.port = p,
            Err(_) => warn!(port = port, "Port out of range in giftlink.toml, using default"),
        }
    }
    if let Some(origins) = table.get("allowed_origins").and_then(|v| v.as_array()) {
        config.allowed_origins =
            origins.iter().filter_map(|v| v.as_str().map(|s| s.to_string())).collect();
    }

    config
}

/// Resolve which config file to read: an explicit path, then `./giftlink.toml`,
/// then `<config_dir>/giftlink.toml`. Falls back to the local path even if missing.
pub fn resolve_config_path(explicit: Option<&Path>, config_dir: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    config_dir
        .map(|d| d.join(CONFIG_FILE_NAME))
        .filter(|p| p.exists())
        .unwrap_or(local)
}
