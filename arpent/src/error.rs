//! Types d'erreurs pour le crate arpent

use thiserror::Error;

/// Erreurs pouvant survenir lors d'un levé
#[derive(Debug, Error)]
pub enum ArpentError {
    /// Erreur d'I/O lors de la lecture d'une grille de terrain
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Grille de terrain invalide
    #[error("Invalid terrain grid {file}: {reason}")]
    InvalidGrid { file: String, reason: String },

    /// Anneau dégénéré au moment de la finalisation
    #[error("Degenerate ring: {vertices} committed vertices, at least 3 required")]
    DegenerateRing { vertices: usize },

    /// Session de levé déjà finalisée
    #[error("Survey session already finalized")]
    SessionClosed,
}

impl ArpentError {
    /// Crée une erreur de grille invalide avec contexte
    pub fn invalid_grid(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidGrid {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Crée une erreur d'anneau dégénéré
    pub fn degenerate_ring(vertices: usize) -> Self {
        Self::DegenerateRing { vertices }
    }
}
