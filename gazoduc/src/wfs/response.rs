//! Décodage de la réponse GetFeature
//!
//! Le corps attendu est une FeatureCollection JSON dont les `properties`
//! portent les enregistrements. Une feature sans code exploitable est
//! écartée avec un warning, le reste du lot est conservé.

use serde::Deserialize;
use tracing::warn;

use super::WfsError;
use crate::topology::PipeRecord;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: serde_json::Map<String, serde_json::Value>,
}

/// Lot d'enregistrements décodés, avec le compte des features écartées
#[derive(Debug)]
pub struct FeatureBatch {
    pub records: Vec<PipeRecord>,
    pub skipped: usize,
}

/// Décode un corps de réponse en enregistrements
pub fn decode_features(
    body: &[u8],
    code_field: &str,
    connect_field: &str,
) -> Result<FeatureBatch, WfsError> {
    let collection: FeatureCollection =
        serde_json::from_slice(body).map_err(|e| WfsError::decode(e.to_string()))?;

    let mut records = Vec::with_capacity(collection.features.len());
    let mut skipped = 0;
    for feature in collection.features {
        match PipeRecord::from_properties(feature.properties, code_field, connect_field) {
            Some(record) => records.push(record),
            None => {
                warn!(field = code_field, "Feature without string code skipped");
                skipped += 1;
            }
        }
    }

    Ok(FeatureBatch { records, skipped })
}
