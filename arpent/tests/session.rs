//! Tests d'intégration de la session de relevé complète

use arpent::{
    Digitizer, FlatTerrain, GridTerrain, GroundPosition, PlanarViewport, ScreenPoint,
    TraceRenderer,
};

#[test]
fn test_full_session_produces_open_measurement() {
    // vue unitaire : l'écran (x, y) devient le sol (x, 1 - y)
    let viewport = PlanarViewport::new(0.0, 1.0, 1.0, 800.0, 600.0, FlatTerrain::default());
    let mut digitizer = Digitizer::new(viewport, TraceRenderer);
    let mut session = digitizer.begin_session();

    session.on_move(ScreenPoint::new(0.0, 1.0));
    session.on_primary_click(ScreenPoint::new(0.0, 1.0));
    session.on_move(ScreenPoint::new(0.0, 0.0));
    session.on_primary_click(ScreenPoint::new(0.0, 0.0));
    session.on_primary_click(ScreenPoint::new(1.0, 0.0));
    session.on_primary_click(ScreenPoint::new(1.0, 1.0));

    let measurement = session.on_secondary_click().unwrap();

    // Vérifications
    assert_eq!(
        measurement.ring.len(),
        4,
        "Ring should keep the four clicked vertices"
    );
    assert_eq!(
        measurement.ring.positions[0],
        GroundPosition::new(0.0, 0.0, 0.0)
    );
    assert_eq!(
        measurement.ring.positions[3],
        GroundPosition::new(1.0, 0.0, 0.0)
    );
    assert!(
        !measurement.ring.is_closed(),
        "Digitized ring stays open until query encoding"
    );
    assert!(measurement.area_km2 > 0.0, "Square degree should have area");
    assert!(measurement.label().ends_with(" km2"));

    println!("Area: {}", measurement.label());
}

#[test]
fn test_session_resolves_heights_from_grid() {
    let grid = GridTerrain::from_ascii(
        "ncols 2\nnrows 2\nxllcorner 0.0\nyllcorner 0.0\ncellsize 1.0\n50 50\n50 50\n",
        "flat50.asc",
    )
    .unwrap();
    let viewport = PlanarViewport::new(0.5, 1.5, 1.0, 10.0, 10.0, grid);
    let mut digitizer = Digitizer::new(viewport, TraceRenderer);
    let mut session = digitizer.begin_session();

    session.on_primary_click(ScreenPoint::new(0.0, 0.0));
    session.on_primary_click(ScreenPoint::new(1.0, 0.0));
    session.on_primary_click(ScreenPoint::new(1.0, 1.0));

    let measurement = session.on_secondary_click().unwrap();

    assert_eq!(measurement.ring.len(), 3);
    for position in &measurement.ring.positions {
        assert_eq!(position.height, 50.0, "Grid should resolve every height");
    }
}
