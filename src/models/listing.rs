//! Provider `/models` listing entries

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::pricing::{TokenPricing, token_pricing};

use super::detect_model;
use super::types::ModelMetadata;

/// One entry of the provider's model listing
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderModel {
    pub id: String,
    #[serde(default)]
    pub context_window: Option<u64>,
    #[serde(default)]
    pub owned_by: Option<String>,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub active: Option<bool>,
    /// The entry as received, for fields the detector reads directly
    #[serde(skip)]
    pub raw: Value,
}

/// Parse a listing, either the provider envelope `{"data": [...]}` or a
/// bare array. Entries without an `id` are skipped.
pub fn parse_listing(text: &str) -> Result<Vec<ProviderModel>, serde_json::Error> {
    let value: Value = serde_json::from_str(text)?;
    let entries = match value {
        Value::Object(mut envelope) => match envelope.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        Value::Array(items) => items,
        _ => Vec::new(),
    };

    let mut models = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<ProviderModel>(entry.clone()) {
            Ok(mut model) => {
                model.raw = entry;
                models.push(model);
            }
            Err(err) => debug!("Skipping listing entry #{index}: {err}"),
        }
    }
    Ok(models)
}

/// A detected model ready to be upserted into the model store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRecord {
    pub id: String,
    pub display_name: String,
    pub context_window: u64,
    pub created: Option<i64>,
    pub active: bool,
    pub pricing: TokenPricing,
    pub metadata: ModelMetadata,
}

impl ModelRecord {
    pub fn from_provider(model: &ProviderModel) -> Self {
        let context_window = model.context_window.unwrap_or(0);
        let detected = detect_model(
            &model.id,
            context_window,
            model.owned_by.as_deref().unwrap_or_default(),
            Some(&model.raw),
        );

        Self {
            id: model.id.clone(),
            display_name: detected.display_name,
            context_window,
            created: model.created,
            // Listings that omit the flag only contain usable models
            active: model.active.unwrap_or(true),
            pricing: token_pricing(&model.id),
            metadata: detected.metadata,
        }
    }
}
