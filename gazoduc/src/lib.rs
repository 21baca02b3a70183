//! # gazoduc
//!
//! Relevé de polygones sur un réseau de canalisations de gaz : mesure
//! géodésique, requête WFS par intersection et reconstruction de la
//! topologie de connectivité.
//!
//! ## Features
//!
//! - Rejeu de traces de pointeur dans la machine à états `arpent`
//! - Filtre CQL INTERSECTS construit depuis l'anneau relevé
//! - Forêt de connectivité à un niveau depuis le champ `connectCode`
//! - Mode hors-ligne sur une FeatureCollection GeoJSON locale
//!
//! ## Usage CLI
//!
//! ```bash
//! # Relevé contre un service WFS
//! gazoduc survey --trace trace.json --output chantier
//!
//! # Relevé hors-ligne sur un dump local
//! gazoduc offline --trace trace.json --features reseau.geojson --output chantier
//! ```

pub mod config;
pub mod offline;
pub mod report;
pub mod topology;
pub mod trace;
pub mod wfs;

pub use config::ServiceConfig;
pub use report::SurveyReport;
pub use topology::document::{save_document, AlwaysSave, ConsolePrompt, PipeDocument, SavePrompt};
pub use topology::{PipeNode, PipeRecord};
pub use wfs::{FeatureService, ReqwestService, WfsError};
