//! Configuration du service de features

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration du service WFS interrogé
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// URL de base du service, sans query string
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Couche interrogée (typeName WFS)
    #[serde(default = "default_layer")]
    pub layer: String,

    /// Colonne géométrie du prédicat d'intersection
    #[serde(default = "default_geometry_column")]
    pub geometry_column: String,

    /// Nombre maximal d'enregistrements retournés
    #[serde(default = "default_max_features")]
    pub max_features: u32,

    /// Timeout HTTP en secondes
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Champ portant le code unique de chaque enregistrement
    #[serde(default = "default_code_field")]
    pub code_field: String,

    /// Champ de connectivité, codes séparés par des virgules
    #[serde(default = "default_connect_field")]
    pub connect_field: String,
}

fn default_base_url() -> String {
    "http://localhost:9999/geoserver/pgsql-guanxian/ows".to_string()
}

fn default_layer() -> String {
    "pgsql-guanxian:ranqi".to_string()
}

fn default_geometry_column() -> String {
    "Shape".to_string()
}

fn default_max_features() -> u32 {
    1000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_code_field() -> String {
    "code".to_string()
}

fn default_connect_field() -> String {
    "connectCode".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            layer: default_layer(),
            geometry_column: default_geometry_column(),
            max_features: default_max_features(),
            timeout_secs: default_timeout_secs(),
            code_field: default_code_field(),
            connect_field: default_connect_field(),
        }
    }
}

impl ServiceConfig {
    /// Charge une configuration depuis un fichier JSON
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Applique les variables d'environnement par-dessus la configuration
    ///
    /// Ordre de résolution : défauts, fichier, environnement, puis drapeaux
    /// CLI appliqués par l'appelant.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("GAZODUC_WFS_URL") {
            self.base_url = url;
        }
        if let Ok(layer) = std::env::var("GAZODUC_WFS_LAYER") {
            self.layer = layer;
        }
        if let Ok(column) = std::env::var("GAZODUC_GEOMETRY_COLUMN") {
            self.geometry_column = column;
        }
        if let Some(n) = std::env::var("GAZODUC_MAX_FEATURES")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.max_features = n;
        }
        if let Some(secs) = std::env::var("GAZODUC_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.timeout_secs = secs;
        }
        if let Ok(field) = std::env::var("GAZODUC_CODE_FIELD") {
            self.code_field = field;
        }
        if let Ok(field) = std::env::var("GAZODUC_CONNECT_FIELD") {
            self.connect_field = field;
        }
    }
}
