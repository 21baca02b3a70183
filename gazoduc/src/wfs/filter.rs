//! Encodage de l'anneau en filtre d'intersection CQL
//!
//! L'anneau finalisé reste ouvert en sortie de numérisation. L'encodage le
//! referme en répétant le premier sommet, préserve l'ordre d'insertion
//! (le sens de parcours dessiné) et ne dédoublonne jamais les sommets
//! adjacents égaux.

use arpent::VertexRing;

use crate::config::ServiceConfig;

/// Littéral d'anneau : paires `lng lat` jointes par des virgules
///
/// Referme l'anneau sauf s'il l'est déjà explicitement, l'encodage d'un
/// anneau déjà fermé est donc idempotent.
pub fn ring_literal(ring: &VertexRing) -> String {
    let mut pairs: Vec<String> = ring
        .positions
        .iter()
        .map(|p| format!("{} {}", p.lon, p.lat))
        .collect();

    if !ring.is_closed() {
        if let Some(first) = pairs.first().cloned() {
            pairs.push(first);
        }
    }
    pairs.join(",")
}

/// Prédicat d'intersection CQL contre la colonne géométrie
pub fn intersects_filter(geometry_column: &str, ring: &VertexRing) -> String {
    format!(
        "INTERSECTS({},POLYGON(({})))",
        geometry_column,
        ring_literal(ring)
    )
}

/// URL GetFeature complète pour le service configuré
pub fn get_feature_url(config: &ServiceConfig, ring: &VertexRing) -> String {
    format!(
        "{}?service=WFS&version=1.0.0&request=GetFeature&typeName={}&maxFeatures={}&outputFormat=application/json&cql_filter={}",
        config.base_url,
        config.layer,
        config.max_features,
        intersects_filter(&config.geometry_column, ring)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use arpent::GroundPosition;

    fn flat(lon: f64, lat: f64) -> GroundPosition {
        GroundPosition::new(lon, lat, 0.0)
    }

    fn unit_square() -> VertexRing {
        VertexRing::from_positions(vec![
            flat(0.0, 0.0),
            flat(0.0, 1.0),
            flat(1.0, 1.0),
            flat(1.0, 0.0),
        ])
    }

    #[test]
    fn test_ring_literal_closes_open_ring() {
        assert_eq!(ring_literal(&unit_square()), "0 0,0 1,1 1,1 0,0 0");
    }

    #[test]
    fn test_ring_literal_idempotent_on_closed_ring() {
        let mut closed = unit_square();
        closed.positions.push(flat(0.0, 0.0));

        assert_eq!(ring_literal(&closed), ring_literal(&unit_square()));
    }

    #[test]
    fn test_ring_literal_keeps_adjacent_duplicates() {
        let ring = VertexRing::from_positions(vec![
            flat(1.0, 1.0),
            flat(1.0, 1.0),
            flat(2.0, 2.0),
        ]);
        assert_eq!(ring_literal(&ring), "1 1,1 1,2 2,1 1");
    }

    #[test]
    fn test_ring_literal_preserves_winding() {
        let ring = VertexRing::from_positions(vec![
            flat(1.0, 0.0),
            flat(1.0, 1.0),
            flat(0.0, 1.0),
            flat(0.0, 0.0),
        ]);
        assert_eq!(ring_literal(&ring), "1 0,1 1,0 1,0 0,1 0");
    }

    #[test]
    fn test_ring_literal_fractional_coordinates() {
        let ring = VertexRing::from_positions(vec![
            flat(2.5, 48.25),
            flat(2.75, 48.25),
            flat(2.75, 48.5),
        ]);
        assert_eq!(ring_literal(&ring), "2.5 48.25,2.75 48.25,2.75 48.5,2.5 48.25");
    }

    #[test]
    fn test_intersects_filter_shape() {
        assert_eq!(
            intersects_filter("Shape", &unit_square()),
            "INTERSECTS(Shape,POLYGON((0 0,0 1,1 1,1 0,0 0)))"
        );
    }

    #[test]
    fn test_get_feature_url_full() {
        let config = ServiceConfig::default();
        let url = get_feature_url(&config, &unit_square());

        assert_eq!(
            url,
            "http://localhost:9999/geoserver/pgsql-guanxian/ows?service=WFS&version=1.0.0\
             &request=GetFeature&typeName=pgsql-guanxian:ranqi&maxFeatures=1000\
             &outputFormat=application/json\
             &cql_filter=INTERSECTS(Shape,POLYGON((0 0,0 1,1 1,1 0,0 0)))"
        );
    }
}
