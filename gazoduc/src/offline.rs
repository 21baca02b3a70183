//! Mode hors-ligne : intersection locale d'une FeatureCollection
//!
//! Remplace le service WFS quand aucun point d'accès n'est joignable. Les
//! features d'un dump GeoJSON sont filtrées par intersection 2D avec
//! l'emprise du polygone relevé, puis leurs propriétés alimentent la
//! reconstruction de topologie comme une réponse de service.

use std::path::Path;

use anyhow::{Context, Result};
use geo::Intersects;
use geojson::GeoJson;
use tracing::{info, warn};

use arpent::VertexRing;

use crate::topology::PipeRecord;
use crate::wfs::response::FeatureBatch;

/// Filtre la collection par intersection avec l'anneau relevé
///
/// Une feature sans géométrie, à géométrie inconvertible ou sans code
/// exploitable est écartée avec un warning.
pub fn intersecting_records(
    path: &Path,
    ring: &VertexRing,
    code_field: &str,
    connect_field: &str,
) -> Result<FeatureBatch> {
    let content = std::fs::read_to_string(path).context(format!(
        "Failed to read feature collection: {}",
        path.display()
    ))?;
    let geojson: GeoJson = content.parse().context("Failed to parse GeoJSON")?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        anyhow::bail!("Expected a FeatureCollection in {}", path.display());
    };

    let footprint = ring.footprint();
    let total = collection.features.len();
    let mut records = Vec::new();
    let mut skipped = 0;

    for feature in collection.features {
        let Some(geometry) = feature.geometry else {
            warn!("Feature without geometry skipped");
            skipped += 1;
            continue;
        };
        let geometry = match geo::Geometry::<f64>::try_from(geometry) {
            Ok(geometry) => geometry,
            Err(e) => {
                warn!(reason = %e, "Feature with unsupported geometry skipped");
                skipped += 1;
                continue;
            }
        };
        if !footprint.intersects(&geometry) {
            continue;
        }

        let properties = feature.properties.unwrap_or_default();
        match PipeRecord::from_properties(properties, code_field, connect_field) {
            Some(record) => records.push(record),
            None => {
                warn!(field = code_field, "Feature without string code skipped");
                skipped += 1;
            }
        }
    }

    info!(
        total,
        retained = records.len(),
        skipped,
        "Offline intersection filter applied"
    );
    Ok(FeatureBatch { records, skipped })
}
