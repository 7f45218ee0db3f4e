//! Catalog served by the backend at `/api/catalog`.
//!
//! The overlay only consumes `abilities[].{id, sfx_url, volume}` to warm its
//! sound cache; the remaining fields are kept so the type mirrors what the
//! server actually sends.

use serde::Deserialize;

use crate::lenient;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub abilities: Vec<CatalogAbility>,
    #[serde(default)]
    pub quests: Vec<CatalogQuest>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CatalogAbility {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub price_cents: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub sfx_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub icon_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cooldown_ms: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub volume: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CatalogQuest {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub price_cents: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub icon_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub target: Option<f64>,
}
