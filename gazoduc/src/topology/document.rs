//! Enveloppe et persistance du document de topologie
//!
//! La forêt reconstruite est enveloppée dans un document de réponse puis
//! proposée à l'enregistrement. L'utilisateur confirme ou refuse, le
//! fichier produit porte toujours l'extension `.csb`.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::topology::PipeNode;

/// Document persisté : forêt de topologie dans son enveloppe de réponse
#[derive(Debug, Serialize)]
pub struct PipeDocument {
    pub code: i32,
    pub success: bool,
    pub data: Vec<PipeNode>,
    pub msg: String,
}

impl PipeDocument {
    pub fn new(data: Vec<PipeNode>) -> Self {
        Self {
            code: 200,
            success: true,
            data,
            msg: "operation successful".to_string(),
        }
    }
}

/// Choix de confirmation avant enregistrement
pub trait SavePrompt {
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Confirmation interactive sur la console
pub struct ConsolePrompt;

impl SavePrompt for ConsolePrompt {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        print!("{} [y/N] ", prompt);
        std::io::stdout().flush()?;

        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        let answer = answer.trim();
        Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }
}

/// Confirmation automatique, pour `--yes` et les traitements par lots
pub struct AlwaysSave;

impl SavePrompt for AlwaysSave {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Propose puis enregistre le document au chemin donné
///
/// L'extension `.csb` est ajoutée au nom de fichier si elle manque.
/// Retourne le chemin écrit, ou `None` si l'utilisateur a refusé.
pub fn save_document(
    document: &PipeDocument,
    path: &Path,
    prompt: &mut dyn SavePrompt,
) -> Result<Option<PathBuf>> {
    let target = with_csb_extension(path);

    let question = format!("Save topology document to {}?", target.display());
    if !prompt.confirm(&question)? {
        info!("Save declined");
        return Ok(None);
    }

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let json = serde_json::to_string_pretty(document)?;
    std::fs::write(&target, json)
        .context(format!("Failed to write document: {}", target.display()))?;

    info!(
        path = %target.display(),
        records = document.data.len(),
        "Topology document saved"
    );
    Ok(Some(target))
}

fn with_csb_extension(path: &Path) -> PathBuf {
    if path.extension().and_then(|e| e.to_str()) == Some("csb") {
        return path.to_path_buf();
    }
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".csb");
    path.with_file_name(name)
}
