//! Résolution écran vers sol
//!
//! Le numériseur ne manipule jamais directement les coordonnées écran : il
//! délègue à un [`GroundPicker`] la conversion d'un point de l'écran en
//! position géographique au sol.

use crate::terrain::TerrainModel;
use crate::types::{GroundPosition, ScreenPoint};

/// Convertit un point écran en position au sol
///
/// Retourne `None` quand le point ne correspond à aucune position (hors de
/// la vue, pas de terrain sous le curseur). Les appelants ignorent alors
/// l'évènement.
pub trait GroundPicker {
    fn pick(&self, point: ScreenPoint) -> Option<GroundPosition>;
}

/// Vue planaire : projection linéaire écran vers lon/lat
///
/// L'origine écran est en haut à gauche, l'axe y pointe vers le bas. La
/// hauteur est résolue par le modèle de terrain sous-jacent.
#[derive(Debug, Clone)]
pub struct PlanarViewport<T> {
    origin_lon: f64,
    top_lat: f64,
    degrees_per_pixel: f64,
    width: f64,
    height: f64,
    terrain: T,
}

impl<T: TerrainModel> PlanarViewport<T> {
    pub fn new(
        origin_lon: f64,
        top_lat: f64,
        degrees_per_pixel: f64,
        width: f64,
        height: f64,
        terrain: T,
    ) -> Self {
        Self {
            origin_lon,
            top_lat,
            degrees_per_pixel,
            width,
            height,
            terrain,
        }
    }
}

impl<T: TerrainModel> GroundPicker for PlanarViewport<T> {
    fn pick(&self, point: ScreenPoint) -> Option<GroundPosition> {
        if point.x < 0.0 || point.x > self.width || point.y < 0.0 || point.y > self.height {
            return None;
        }
        let lon = self.origin_lon + point.x * self.degrees_per_pixel;
        let lat = self.top_lat - point.y * self.degrees_per_pixel;
        let height = self.terrain.height_at(lon, lat)?;
        Some(GroundPosition::new(lon, lat, height))
    }
}
