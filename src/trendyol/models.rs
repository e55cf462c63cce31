//! Data models for scraped Trendyol products and their detail attributes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The fixed set of detail-page attributes scraped for every product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrKey {
    Dpi,
    RgbLighting,
    MouseType,
    ButtonCount,
}

impl AttrKey {
    /// All keys, in the order they appear in stored documents.
    pub const ALL: [AttrKey; 4] =
        [AttrKey::Dpi, AttrKey::RgbLighting, AttrKey::MouseType, AttrKey::ButtonCount];

    /// Stored-document key name.
    pub fn as_str(self) -> &'static str {
        match self {
            AttrKey::Dpi => "dpi",
            AttrKey::RgbLighting => "rgb_lighting",
            AttrKey::MouseType => "mouse_type",
            AttrKey::ButtonCount => "button_count",
        }
    }

    /// Human-readable label as it appears on the Trendyol detail page.
    pub fn label(self) -> &'static str {
        match self {
            AttrKey::Dpi => "Mouse Hassasiyeti (Dpi)",
            AttrKey::RgbLighting => "RGB Aydınlatma",
            AttrKey::MouseType => "Mouse Tipi",
            AttrKey::ButtonCount => "Buton Sayısı",
        }
    }
}

impl std::fmt::Display for AttrKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of extracting one attribute value.
///
/// Distinguishes the three causes the original flow folded into a single
/// `null`: the node was found, the page was parsed but lacked the node, or
/// the detail page could not be fetched at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "value")]
pub enum Extracted {
    /// Node found; trimmed text.
    Present(String),
    /// Page fetched and parsed, node missing.
    Absent,
    /// Detail page fetch failed; nothing was parsed.
    Unavailable,
}

impl Extracted {
    /// The extracted text, if any.
    pub fn value(&self) -> Option<&str> {
        match self {
            Extracted::Present(v) => Some(v),
            _ => None,
        }
    }
}

/// Detail attributes for one product. All four keys are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    values: BTreeMap<AttrKey, Extracted>,
}

impl Attributes {
    fn filled(value: Extracted) -> Self {
        Self { values: AttrKey::ALL.iter().map(|k| (*k, value.clone())).collect() }
    }

    /// All keys `Absent`: the card had no detail link, so no page was fetched.
    pub fn all_absent() -> Self {
        Self::filled(Extracted::Absent)
    }

    /// All keys `Unavailable`: the detail fetch failed.
    pub fn all_unavailable() -> Self {
        Self::filled(Extracted::Unavailable)
    }

    /// Builds attributes from a per-key extraction function.
    pub fn from_fn(mut extract: impl FnMut(AttrKey) -> Extracted) -> Self {
        Self { values: AttrKey::ALL.iter().map(|k| (*k, extract(*k))).collect() }
    }

    pub fn get(&self, key: AttrKey) -> &Extracted {
        // Construction guarantees every key is present.
        &self.values[&key]
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttrKey, &Extracted)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    /// Flattens to the stored-document shape: `{key: string | null}`.
    pub fn to_stored_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .iter()
            .map(|(k, v)| {
                let value = match v.value() {
                    Some(text) => serde_json::Value::String(text.to_string()),
                    None => serde_json::Value::Null,
                };
                (k.as_str().to_string(), value)
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

/// One scraped product, constructed once per scrape and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Joined card sub-labels; `None` when the whole name node was absent.
    pub name: Option<String>,
    /// Discounted price; at most one value, empty when the price node was missing.
    pub prices: Vec<f64>,
    /// Raw rating-count text from the card, e.g. `"(1.234)"`.
    pub rating_count: Option<String>,
    /// Detail-page attributes, all four keys always present.
    pub attributes: Attributes,
}
