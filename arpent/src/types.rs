//! Types de base du levé topographique

use geo::{Coord, LineString, Polygon};

/// Position au sol sur ou au-dessus de l'ellipsoïde de référence
///
/// Immutable une fois capturée ; produite par une opération de visée
/// terrain ([`crate::picker::GroundPicker`]).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroundPosition {
    /// Longitude en degrés
    pub lon: f64,
    /// Latitude en degrés
    pub lat: f64,
    /// Hauteur au-dessus de l'ellipsoïde en mètres
    pub height: f64,
}

impl GroundPosition {
    pub fn new(lon: f64, lat: f64, height: f64) -> Self {
        Self { lon, lat, height }
    }
}

/// Point en coordonnées écran (pixels)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Anneau de sommets : séquence ordonnée de positions au sol
///
/// L'ordre d'insertion définit l'enroulement du polygone. L'anneau reste
/// ouvert pendant la numérisation ; la fermeture explicite (premier sommet
/// répété en fin) n'intervient qu'à l'encodage de la requête. Invariant :
/// au moins 3 sommets avant tout calcul d'aire ou de requête.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexRing {
    pub positions: Vec<GroundPosition>,
}

impl VertexRing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_positions(positions: Vec<GroundPosition>) -> Self {
        Self { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Vrai si le premier sommet est explicitement répété en dernière position
    pub fn is_closed(&self) -> bool {
        self.positions.len() >= 2 && self.positions.first() == self.positions.last()
    }

    /// Empreinte 2D (lon/lat) fermée, pour les prédicats du crate `geo`
    pub fn footprint(&self) -> Polygon<f64> {
        let coords: Vec<Coord<f64>> = self
            .positions
            .iter()
            .map(|p| Coord { x: p.lon, y: p.lat })
            .collect();
        Polygon::new(LineString::from(coords), vec![])
    }
}

/// Résultat d'une mesure : aire et anneau mesuré
///
/// Produit une seule fois par session de numérisation, en lecture seule
/// ensuite.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Aire en km², arrondie à 4 décimales
    pub area_km2: f64,
    /// Anneau (ouvert) sur lequel l'aire a été calculée
    pub ring: VertexRing,
}

impl Measurement {
    pub fn new(area_km2: f64, ring: VertexRing) -> Self {
        Self { area_km2, ring }
    }

    /// Étiquette d'aire affichée en fin de mesure
    pub fn label(&self) -> String {
        format!("{:.4} km2", self.area_km2)
    }
}
