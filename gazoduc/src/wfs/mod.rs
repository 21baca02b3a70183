//! Requêtage du service de features WFS
//!
//! Construction du filtre d'intersection à partir de l'anneau relevé,
//! client HTTP et décodage de la réponse GetFeature.

pub mod client;
pub mod filter;
pub mod response;

pub use client::{FeatureService, ReqwestService};
pub use filter::{get_feature_url, intersects_filter, ring_literal};
pub use response::{decode_features, FeatureBatch};

use thiserror::Error;

/// Erreurs du requêtage WFS
#[derive(Debug, Clone, Error)]
pub enum WfsError {
    /// Échec réseau ou statut HTTP non 2xx
    #[error("HTTP error: {0}")]
    Http(String),

    /// Corps de réponse illisible
    #[error("Failed to decode service response: {reason}")]
    Decode { reason: String },
}

impl WfsError {
    /// Crée une erreur de décodage
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }
}
