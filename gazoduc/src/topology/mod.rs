//! Reconstruction de la topologie de connectivité
//!
//! Les enregistrements retournés par le service portent un code unique et
//! un champ `connectCode` listant les codes voisins, séparés par des
//! virgules. La reconstruction produit une forêt à un seul niveau : chaque
//! voisin direct est imbriqué comme enfant, cloné avec un `subList` vide.

pub mod document;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Enregistrement brut du service de features
///
/// Les champs autres que le code et la connectivité sont opaques et
/// conservés tels quels à travers le clonage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeRecord {
    /// Code unique de l'enregistrement
    pub code: String,

    /// Codes voisins séparés par des virgules, vide si isolé
    #[serde(rename = "connectCode", default)]
    pub connect_code: String,

    /// Champs restants, conservés verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PipeRecord {
    pub fn new(code: &str, connect_code: &str) -> Self {
        Self {
            code: code.to_string(),
            connect_code: connect_code.to_string(),
            extra: serde_json::Map::new(),
        }
    }

    /// Extrait un enregistrement d'un dictionnaire de propriétés
    ///
    /// Le code doit être une chaîne, sinon `None`. Une connectivité absente
    /// ou non textuelle se lit comme la chaîne vide.
    pub fn from_properties(
        mut properties: serde_json::Map<String, serde_json::Value>,
        code_field: &str,
        connect_field: &str,
    ) -> Option<Self> {
        let Some(serde_json::Value::String(code)) = properties.remove(code_field) else {
            return None;
        };
        let connect_code = match properties.remove(connect_field) {
            Some(serde_json::Value::String(value)) => value,
            _ => String::new(),
        };
        Some(Self {
            code,
            connect_code,
            extra: properties,
        })
    }
}

/// Enregistrement avec ses voisins directs imbriqués
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipeNode {
    #[serde(flatten)]
    pub record: PipeRecord,

    /// Voisins directs, clones indépendants à `subList` vide
    #[serde(rename = "subList")]
    pub sub_list: Vec<PipeNode>,
}

impl PipeNode {
    fn leaf(record: PipeRecord) -> Self {
        Self {
            record,
            sub_list: Vec::new(),
        }
    }
}

/// Construit la forêt de connectivité à partir de la liste plate
///
/// Un seul niveau d'imbrication : les enfants sont des clones feuilles,
/// seuls les enregistrements de premier niveau reçoivent un `subList`
/// peuplé. Un fragment sans correspondance ne produit aucun enfant. Les
/// fragments ne sont pas nettoyés : `"A, B"` référence `"A"` et `" B"`.
pub fn build(records: Vec<PipeRecord>) -> Vec<PipeNode> {
    let mut forest: Vec<PipeNode> = records.into_iter().map(PipeNode::leaf).collect();

    for index in 0..forest.len() {
        if forest[index].record.connect_code.is_empty() {
            continue;
        }
        let fragments: Vec<String> = forest[index]
            .record
            .connect_code
            .split(',')
            .map(str::to_string)
            .collect();

        let mut children = Vec::new();
        for fragment in &fragments {
            for candidate in &forest {
                if candidate.record.code == *fragment {
                    children.push(PipeNode::leaf(candidate.record.clone()));
                }
            }
        }
        forest[index].sub_list = children;
    }

    debug!(records = forest.len(), "Topology forest built");
    forest
}
