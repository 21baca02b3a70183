//! Machine à états de numérisation du polygone
//!
//! Une session de relevé transforme les évènements pointeur en anneau de
//! sommets géodésiques. Le clic principal valide un sommet, le déplacement
//! met à jour un aperçu élastique, le clic secondaire clôt la session et
//! calcule la surface.
//!
//! La session détient un emprunt exclusif du [`Digitizer`] : tant qu'elle
//! vit, aucune autre session ne peut consommer les évènements pointeur.
//! L'emprunt est rendu à la destruction de la session, quel que soit le
//! chemin de sortie.

use tracing::{debug, info};

use crate::error::ArpentError;
use crate::geodesy;
use crate::picker::GroundPicker;
use crate::types::{GroundPosition, Measurement, ScreenPoint, VertexRing};

/// Collaborateur de rendu du relevé en cours
///
/// Purement présentationnel : l'élastique de prévisualisation, les
/// marqueurs de sommets et l'étiquette de surface finale. Aucune donnée ne
/// revient vers la machine à états.
pub trait SurveyRenderer {
    /// Contour élastique courant (sommets validés plus aperçu)
    fn rubber_band(&mut self, positions: &[GroundPosition]);

    /// Marqueur ponctuel avec étiquette de coordonnées
    fn marker(&mut self, at: GroundPosition, label: &str);

    /// Étiquette de surface posée à la clôture
    fn area_label(&mut self, at: GroundPosition, text: &str);
}

/// Rendu de traçage : émet chaque évènement de rendu en `debug!`
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceRenderer;

impl SurveyRenderer for TraceRenderer {
    fn rubber_band(&mut self, positions: &[GroundPosition]) {
        debug!(vertices = positions.len(), "Rubber band updated");
    }

    fn marker(&mut self, at: GroundPosition, label: &str) {
        debug!(lon = at.lon, lat = at.lat, label = %label, "Marker placed");
    }

    fn area_label(&mut self, at: GroundPosition, text: &str) {
        debug!(lon = at.lon, lat = at.lat, text = %text, "Area label placed");
    }
}

/// États d'une session de relevé
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Aucun sommet validé
    Idle,
    /// Au moins un sommet validé, aperçu actif
    Drawing,
    /// Terminal : les évènements ultérieurs sont ignorés
    Finalized,
}

/// Propriétaire du sélecteur sol et du rendu
///
/// Une seule session à la fois : [`Digitizer::begin_session`] emprunte le
/// numériseur en écriture pour toute la durée de la session.
#[derive(Debug)]
pub struct Digitizer<P, R> {
    picker: P,
    renderer: R,
}

impl<P: GroundPicker, R: SurveyRenderer> Digitizer<P, R> {
    pub fn new(picker: P, renderer: R) -> Self {
        Self { picker, renderer }
    }

    /// Ouvre une nouvelle session de relevé
    pub fn begin_session(&mut self) -> SurveySession<'_, P, R> {
        debug!("Survey session opened");
        SurveySession {
            digitizer: self,
            state: SessionState::Idle,
            committed: Vec::new(),
            vertex_labels: Vec::new(),
            preview: None,
            seeded: false,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

/// Session de relevé en cours
///
/// Possède la liste des sommets validés et la liste parallèle des
/// étiquettes de coordonnées. Détruite à la fin de la session.
#[derive(Debug)]
pub struct SurveySession<'a, P, R> {
    digitizer: &'a mut Digitizer<P, R>,
    state: SessionState,
    committed: Vec<GroundPosition>,
    vertex_labels: Vec<String>,
    preview: Option<GroundPosition>,
    seeded: bool,
}

impl<P: GroundPicker, R: SurveyRenderer> SurveySession<'_, P, R> {
    /// Déplacement du pointeur : met à jour l'aperçu élastique
    ///
    /// Jamais ajouté à la liste validée. Sans intersection sol, aucun
    /// changement d'état.
    pub fn on_move(&mut self, at: ScreenPoint) {
        if self.state == SessionState::Finalized {
            return;
        }
        let Some(position) = self.digitizer.picker.pick(at) else {
            return;
        };
        self.preview = Some(position);
        if !self.committed.is_empty() {
            let mut outline = self.committed.clone();
            outline.push(position);
            self.digitizer.renderer.rubber_band(&outline);
        }
    }

    /// Clic principal : valide un sommet
    ///
    /// Le tout premier clic insère d'abord un doublon du sommet, le contour
    /// de prévisualisation a besoin de deux points. Le doublon est marqué
    /// par un indicateur et retiré à la clôture.
    pub fn on_primary_click(&mut self, at: ScreenPoint) {
        if self.state == SessionState::Finalized {
            return;
        }
        let Some(position) = self.digitizer.picker.pick(at) else {
            debug!(x = at.x, y = at.y, "Click without ground intersection ignored");
            return;
        };
        if self.committed.is_empty() {
            self.committed.push(position);
            self.seeded = true;
        }
        self.committed.push(position);
        self.state = SessionState::Drawing;

        let label = format!("({:.2},{:.2})", position.lon, position.lat);
        self.digitizer.renderer.marker(position, &label);
        self.vertex_labels.push(label);
        debug!(
            lon = position.lon,
            lat = position.lat,
            vertices = self.committed.len(),
            "Vertex committed"
        );
    }

    /// Clic secondaire : clôt la session et calcule la surface
    ///
    /// Retire le doublon de semence, rejette un anneau de moins de trois
    /// sommets, puis produit la mesure. La session reste close quoi qu'il
    /// arrive : toute erreur est terminale pour le relevé en cours.
    pub fn on_secondary_click(&mut self) -> Result<Measurement, ArpentError> {
        if self.state == SessionState::Finalized {
            return Err(ArpentError::SessionClosed);
        }
        self.state = SessionState::Finalized;
        self.preview = None;

        if self.seeded {
            self.committed.remove(0);
            self.seeded = false;
        }
        if self.committed.len() < 3 {
            return Err(ArpentError::degenerate_ring(self.committed.len()));
        }

        let ring = VertexRing::from_positions(std::mem::take(&mut self.committed));
        let area_km2 = geodesy::polygon_area(&ring);
        let measurement = Measurement::new(area_km2, ring);

        if let Some(anchor) = measurement.ring.positions.last().copied() {
            self.digitizer.renderer.area_label(anchor, &measurement.label());
        }
        info!(
            area_km2 = measurement.area_km2,
            vertices = measurement.ring.len(),
            "Survey finalized"
        );
        Ok(measurement)
    }

    /// Rend explicitement l'emprunt du numériseur
    pub fn detach(self) {}

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn committed(&self) -> &[GroundPosition] {
        &self.committed
    }

    pub fn vertex_labels(&self) -> &[String] {
        &self.vertex_labels
    }

    pub fn preview(&self) -> Option<GroundPosition> {
        self.preview
    }
}

impl<P, R> Drop for SurveySession<'_, P, R> {
    fn drop(&mut self) {
        if self.state != SessionState::Finalized {
            debug!(
                vertices = self.committed.len(),
                "Survey session released without measurement"
            );
        }
    }
}
