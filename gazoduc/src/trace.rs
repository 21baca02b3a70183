//! Rejeu d'une trace de pointeur
//!
//! Une trace est un tableau JSON d'évènements pointeur enregistrés,
//! rejoués dans la machine à états exactement comme des évènements vifs.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use arpent::{GroundPicker, Measurement, ScreenPoint, SurveyRenderer, SurveySession};

/// Évènement pointeur enregistré
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum TraceEvent {
    Move { x: f64, y: f64 },
    Click { x: f64, y: f64 },
    Finish,
}

/// Charge une trace depuis un fichier JSON
pub fn load(path: &Path) -> Result<Vec<TraceEvent>> {
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read trace file: {}", path.display()))?;
    let events: Vec<TraceEvent> =
        serde_json::from_str(&content).context("Failed to parse trace JSON")?;

    debug!(events = events.len(), "Trace loaded");
    Ok(events)
}

/// Rejoue la trace dans la session et retourne la mesure
///
/// Les évènements qui suivent la clôture sont ignorés, comme le ferait le
/// gestionnaire détaché. Une trace sans évènement de clôture est une
/// erreur.
pub fn replay<P, R>(
    events: &[TraceEvent],
    session: &mut SurveySession<'_, P, R>,
) -> Result<Measurement>
where
    P: GroundPicker,
    R: SurveyRenderer,
{
    let mut measurement = None;
    for event in events {
        match event {
            TraceEvent::Move { x, y } => session.on_move(ScreenPoint::new(*x, *y)),
            TraceEvent::Click { x, y } => session.on_primary_click(ScreenPoint::new(*x, *y)),
            TraceEvent::Finish => {
                if measurement.is_none() {
                    measurement = Some(session.on_secondary_click()?);
                }
            }
        }
    }
    measurement.context("Trace contains no finish event")
}

#[cfg(test)]
mod tests {
    use super::*;
    use arpent::{Digitizer, FlatTerrain, PlanarViewport, TraceRenderer};

    fn square_events() -> Vec<TraceEvent> {
        vec![
            TraceEvent::Move { x: 0.0, y: 1.0 },
            TraceEvent::Click { x: 0.0, y: 1.0 },
            TraceEvent::Click { x: 0.0, y: 0.0 },
            TraceEvent::Click { x: 1.0, y: 0.0 },
            TraceEvent::Click { x: 1.0, y: 1.0 },
            TraceEvent::Finish,
        ]
    }

    #[test]
    fn test_parse_trace_events() {
        let json = r#"[
            { "event": "move", "x": 1.5, "y": 2.5 },
            { "event": "click", "x": 1.5, "y": 2.5 },
            { "event": "finish" }
        ]"#;
        let events: Vec<TraceEvent> = serde_json::from_str(json).unwrap();

        assert_eq!(events.len(), 3);
        assert_eq!(events[0], TraceEvent::Move { x: 1.5, y: 2.5 });
        assert_eq!(events[2], TraceEvent::Finish);
    }

    #[test]
    fn test_unknown_event_rejected() {
        let json = r#"[ { "event": "drag", "x": 0.0, "y": 0.0 } ]"#;
        let result: Result<Vec<TraceEvent>, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_replay_full_session() {
        let viewport = PlanarViewport::new(0.0, 1.0, 1.0, 800.0, 600.0, FlatTerrain::default());
        let mut digitizer = Digitizer::new(viewport, TraceRenderer);
        let mut session = digitizer.begin_session();

        let measurement = replay(&square_events(), &mut session).unwrap();
        assert_eq!(measurement.ring.len(), 4);
    }

    #[test]
    fn test_replay_requires_finish() {
        let viewport = PlanarViewport::new(0.0, 1.0, 1.0, 800.0, 600.0, FlatTerrain::default());
        let mut digitizer = Digitizer::new(viewport, TraceRenderer);
        let mut session = digitizer.begin_session();

        let events = vec![TraceEvent::Click { x: 0.0, y: 0.0 }];
        assert!(replay(&events, &mut session).is_err());
    }

    #[test]
    fn test_replay_ignores_events_after_finish() {
        let viewport = PlanarViewport::new(0.0, 1.0, 1.0, 800.0, 600.0, FlatTerrain::default());
        let mut digitizer = Digitizer::new(viewport, TraceRenderer);
        let mut session = digitizer.begin_session();

        let mut events = square_events();
        events.push(TraceEvent::Click { x: 5.0, y: 5.0 });
        events.push(TraceEvent::Finish);

        let measurement = replay(&events, &mut session).unwrap();
        assert_eq!(measurement.ring.len(), 4);
    }
}
