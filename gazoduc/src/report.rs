//! Rapport de relevé
//!
//! Collecte les compteurs de la chaîne de traitement et les affiche en
//! fin de commande.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use arpent::Measurement;

use crate::topology::PipeNode;
use crate::wfs::response::FeatureBatch;

/// Rapport complet d'un relevé
#[derive(Debug, Clone, Default, Serialize)]
pub struct SurveyReport {
    /// Nombre de sommets de l'anneau finalisé
    pub vertices: usize,
    /// Surface mesurée en km²
    pub area_km2: f64,
    /// Enregistrements retenus
    pub records_fetched: usize,
    /// Features écartées (sans code, sans géométrie)
    pub records_skipped: usize,
    /// Enregistrements de premier niveau dans la forêt
    pub branches: usize,
    /// Enfants imbriqués, tous parents confondus
    pub children: usize,
    /// Chemin écrit, `None` si l'enregistrement a été refusé
    pub output: Option<PathBuf>,
    /// Durée du traitement
    pub duration_secs: f64,
}

impl SurveyReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enregistre la mesure finalisée
    pub fn record_measurement(&mut self, measurement: &Measurement) {
        self.vertices = measurement.ring.len();
        self.area_km2 = measurement.area_km2;
    }

    /// Enregistre le lot de features décodé
    pub fn record_batch(&mut self, batch: &FeatureBatch) {
        self.records_fetched = batch.records.len();
        self.records_skipped = batch.skipped;
    }

    /// Enregistre la forme de la forêt reconstruite
    pub fn record_forest(&mut self, forest: &[PipeNode]) {
        self.branches = forest.len();
        self.children = forest.iter().map(|node| node.sub_list.len()).sum();
    }

    /// Enregistre le résultat de la persistance
    pub fn record_output(&mut self, output: Option<PathBuf>) {
        self.output = output;
    }

    /// Définit la durée du traitement
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("SURVEY REPORT");
        println!("{}", "=".repeat(60));

        println!("\nDuration: {:.2}s", self.duration_secs);

        println!("\n--- MEASUREMENT ---");
        println!("Vertices: {}", self.vertices);
        println!("Area: {:.4} km2", self.area_km2);

        println!("\n--- RECORDS ---");
        println!(
            "Fetched: {} ({} skipped)",
            self.records_fetched, self.records_skipped
        );
        println!(
            "Topology: {} branches, {} children",
            self.branches, self.children
        );

        println!("\n--- OUTPUT ---");
        match &self.output {
            Some(path) => println!("Saved to: {}", path.display()),
            None => println!("Save declined, no file written"),
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Affichage compact pour les logs
    pub fn summary(&self) -> String {
        format!(
            "{} vertices, {:.4} km2, {} records, {} branches",
            self.vertices, self.area_km2, self.records_fetched, self.branches
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{build, PipeRecord};
    use arpent::{GroundPosition, VertexRing};

    #[test]
    fn test_record_measurement() {
        let ring = VertexRing::from_positions(vec![
            GroundPosition::new(0.0, 0.0, 0.0),
            GroundPosition::new(0.0, 1.0, 0.0),
            GroundPosition::new(1.0, 1.0, 0.0),
        ]);
        let measurement = Measurement::new(12.3456, ring);

        let mut report = SurveyReport::new();
        report.record_measurement(&measurement);

        assert_eq!(report.vertices, 3);
        assert_eq!(report.area_km2, 12.3456);
    }

    #[test]
    fn test_record_batch() {
        let batch = FeatureBatch {
            records: vec![PipeRecord::new("A", ""), PipeRecord::new("B", "")],
            skipped: 1,
        };

        let mut report = SurveyReport::new();
        report.record_batch(&batch);

        assert_eq!(report.records_fetched, 2);
        assert_eq!(report.records_skipped, 1);
    }

    #[test]
    fn test_record_forest_counts_children() {
        let forest = build(vec![
            PipeRecord::new("A", "B,C"),
            PipeRecord::new("B", "A"),
            PipeRecord::new("C", ""),
        ]);

        let mut report = SurveyReport::new();
        report.record_forest(&forest);

        assert_eq!(report.branches, 3);
        assert_eq!(report.children, 3);
    }

    #[test]
    fn test_summary_format() {
        let mut report = SurveyReport::new();
        report.vertices = 4;
        report.area_km2 = 0.5;
        report.records_fetched = 7;
        report.branches = 7;

        let summary = report.summary();
        assert!(summary.contains("4 vertices"));
        assert!(summary.contains("0.5000 km2"));
        assert!(summary.contains("7 branches"));
    }
}
