//! # arpent
//!
//! Boîte à outils de relevé de polygones sur terrain : géodésie, machine à
//! états de numérisation et grilles d'altitude.
//!
//! ## Features
//!
//! - Surface géodésique par triangulation en éventail, hauteurs comprises
//! - Machine à états pointeur explicite avec session à emprunt exclusif
//! - Grilles ESRI ASCII avec interpolation bilinéaire, parsing `fast-float`
//! - Types `geo` pour l'interopérabilité avec l'écosystème Rust géospatial
//!
//! ## Usage
//!
//! ```rust,ignore
//! use arpent::{Digitizer, FlatTerrain, PlanarViewport, ScreenPoint, TraceRenderer};
//!
//! let viewport = PlanarViewport::new(0.0, 1.0, 1.0, 800.0, 600.0, FlatTerrain::default());
//! let mut digitizer = Digitizer::new(viewport, TraceRenderer);
//!
//! let mut session = digitizer.begin_session();
//! session.on_primary_click(ScreenPoint::new(0.0, 1.0));
//! session.on_primary_click(ScreenPoint::new(0.0, 0.0));
//! session.on_primary_click(ScreenPoint::new(1.0, 0.0));
//! let measurement = session.on_secondary_click()?;
//!
//! println!("{}", measurement.label());
//! ```

pub mod digitizer;
pub mod error;
pub mod geodesy;
pub mod picker;
pub mod terrain;
pub mod types;

pub use digitizer::{Digitizer, SessionState, SurveyRenderer, SurveySession, TraceRenderer};
pub use error::ArpentError;
pub use picker::{GroundPicker, PlanarViewport};
pub use terrain::{FlatTerrain, GridTerrain, TerrainModel};
pub use types::{GroundPosition, Measurement, ScreenPoint, VertexRing};
