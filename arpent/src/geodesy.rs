//! Géodésie WGS84 : cap, angle au sommet, distance et aire
//!
//! Toutes les fonctions travaillent sur des [`GroundPosition`] en degrés
//! et retournent des mètres ou des degrés.

use tracing::debug;

use crate::types::{GroundPosition, VertexRing};

/// Ellipsoïde WGS84
pub struct WGS84;

impl WGS84 {
    /// Demi-grand axe (rayon équatorial) en mètres
    pub const A: f64 = 6378137.0;

    /// Aplatissement
    pub const F: f64 = 1.0 / 298.257223563;

    /// Demi-petit axe (rayon polaire) en mètres
    pub const B: f64 = Self::A * (1.0 - Self::F);
}

/// Rayon moyen terrestre en mètres (sphère de repli)
const MEAN_RADIUS: f64 = 6_371_008.8;

const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;
const RAD_TO_DEG: f64 = 180.0 / std::f64::consts::PI;

/// Cap initial de `from` vers `to`, en degrés normalisés dans [0, 360)
///
/// `bearing(p, p)` est défini (pas de division par zéro) et retourne une
/// valeur normalisée.
pub fn bearing(from: &GroundPosition, to: &GroundPosition) -> f64 {
    let lat1 = from.lat * DEG_TO_RAD;
    let lon1 = from.lon * DEG_TO_RAD;
    let lat2 = to.lat * DEG_TO_RAD;
    let lon2 = to.lon * DEG_TO_RAD;

    let mut angle = -f64::atan2(
        (lon1 - lon2).sin() * lat2.cos(),
        lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * (lon1 - lon2).cos(),
    );
    if angle < 0.0 {
        angle += std::f64::consts::PI * 2.0;
    }
    angle * RAD_TO_DEG
}

/// Angle au sommet `p2` entre les rayons vers `p1` et `p3`, en degrés
///
/// Calculé comme `bearing(p2, p1) - bearing(p2, p3)`, ramené dans [0, 360)
/// par ajout de 360 si négatif. L'angle retourné n'est pas signé : il ne
/// correspond à l'angle intérieur que pour un enroulement cohérent du
/// polygone.
pub fn included_angle(p1: &GroundPosition, p2: &GroundPosition, p3: &GroundPosition) -> f64 {
    let mut angle = bearing(p2, p1) - bearing(p2, p3);
    if angle < 0.0 {
        angle += 360.0;
    }
    angle
}

/// Distance entre deux positions, en mètres
///
/// Distance géodésique au sol entre les projections des deux points,
/// combinée à leur différence de hauteur par Pythagore pour approcher la
/// distance en pente sur le relief.
pub fn surface_distance(p1: &GroundPosition, p2: &GroundPosition) -> f64 {
    let horizontal = geodesic_inverse(p1, p2);
    let dh = p2.height - p1.height;
    (horizontal * horizontal + dh * dh).sqrt()
}

/// Aire du polygone en km², arrondie à 4 décimales
///
/// Décomposition en triangles par triplets d'indices consécutifs
/// `(i, i+1, i+2)` : chaque triplet contribue
/// `d(i,i+1) × d(i+1,i+2) × |sin(angle en i+1)|`. Le facteur ½ de la
/// formule classique du triangle est volontairement absent, conservé tel
/// quel pour rester aligné avec les mesures produites jusqu'ici. Le
/// résultat dépend d'un tracé à enroulement cohérent, [`included_angle`]
/// n'étant pas signé.
///
/// Aucune validation d'entrée : l'appelant doit rejeter les anneaux de
/// moins de 3 sommets avant l'appel.
pub fn polygon_area(ring: &VertexRing) -> f64 {
    let points = &ring.positions;
    let n = points.len();

    let mut res = 0.0;
    for i in 0..n.saturating_sub(2) {
        let angle = included_angle(&points[i], &points[i + 1], &points[i + 2]) * DEG_TO_RAD;
        let d1 = surface_distance(&points[i], &points[i + 1]);
        let d2 = surface_distance(&points[i + 1], &points[i + 2]);
        res += d1 * d2 * angle.sin().abs();
    }

    round4(res / 1_000_000.0)
}

/// Arrondi à 4 décimales
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Distance géodésique au sol entre deux points (hauteurs ignorées)
///
/// Itération inverse de Vincenty sur WGS84 ; bascule sur la formule
/// sphérique quand l'itération ne converge pas (paires quasi antipodales).
fn geodesic_inverse(p1: &GroundPosition, p2: &GroundPosition) -> f64 {
    let lat1 = p1.lat * DEG_TO_RAD;
    let lat2 = p2.lat * DEG_TO_RAD;
    let dlon = (p2.lon - p1.lon) * DEG_TO_RAD;

    let u1 = ((1.0 - WGS84::F) * lat1.tan()).atan();
    let u2 = ((1.0 - WGS84::F) * lat2.tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = dlon;
    let mut converged = false;
    let mut sin_sigma = 0.0;
    let mut cos_sigma = 0.0;
    let mut sigma = 0.0;
    let mut cos_sq_alpha = 0.0;
    let mut cos_2sigma_m = 0.0;

    for _ in 0..100 {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            // points coïncidents
            return 0.0;
        }
        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        sigma = sin_sigma.atan2(cos_sigma);

        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        cos_2sigma_m = if cos_sq_alpha.abs() < 1e-12 {
            // géodésique équatoriale
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        };

        let c = WGS84::F / 16.0 * cos_sq_alpha * (4.0 + WGS84::F * (4.0 - 3.0 * cos_sq_alpha));
        let lambda_prev = lambda;
        lambda = dlon
            + (1.0 - c)
                * WGS84::F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m
                            + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        if (lambda - lambda_prev).abs() < 1e-12 {
            converged = true;
            break;
        }
    }

    if !converged {
        debug!(
            lon1 = p1.lon,
            lat1 = p1.lat,
            lon2 = p2.lon,
            lat2 = p2.lat,
            "Geodesic iteration did not converge, falling back to spherical distance"
        );
        return spherical_distance(p1, p2);
    }

    let u_sq = cos_sq_alpha * (WGS84::A * WGS84::A - WGS84::B * WGS84::B) / (WGS84::B * WGS84::B);
    let a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
    let delta_sigma = b
        * sin_sigma
        * (cos_2sigma_m
            + b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                    - b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                        * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));

    WGS84::B * a * (sigma - delta_sigma)
}

/// Distance grand-cercle (haversine) sur la sphère moyenne
fn spherical_distance(p1: &GroundPosition, p2: &GroundPosition) -> f64 {
    let lat1 = p1.lat * DEG_TO_RAD;
    let lat2 = p2.lat * DEG_TO_RAD;
    let dlat = lat2 - lat1;
    let dlon = (p2.lon - p1.lon) * DEG_TO_RAD;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * MEAN_RADIUS * h.sqrt().asin()
}
