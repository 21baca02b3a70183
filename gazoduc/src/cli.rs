//! Définition et implémentation des commandes CLI
//!
//! - `survey`: rejoue une trace de pointeur, mesure le polygone, interroge
//!   le service WFS et reconstruit la topologie de connectivité
//! - `offline`: même chaîne sur une FeatureCollection GeoJSON locale

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tracing::{error, info};

use arpent::{
    Digitizer, FlatTerrain, GridTerrain, GroundPicker, Measurement, PlanarViewport, TerrainModel,
    TraceRenderer,
};

use crate::config::ServiceConfig;
use crate::offline;
use crate::report::SurveyReport;
use crate::topology;
use crate::topology::document::{save_document, AlwaysSave, ConsolePrompt, PipeDocument};
use crate::trace;
use crate::wfs;
use crate::wfs::client::{FeatureService, ReqwestService};
use crate::wfs::response::FeatureBatch;

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a pointer trace, measure the polygon and query the WFS service
    Survey {
        /// Path to the pointer trace (JSON event array)
        #[arg(short, long)]
        trace: PathBuf,

        /// ESRI ASCII terrain grid (flat terrain at 0 m when omitted)
        #[arg(long)]
        terrain: Option<PathBuf>,

        /// Output path for the topology document (.csb appended when absent)
        #[arg(short, long, default_value = "topology.csb")]
        output: PathBuf,

        /// Save without asking for confirmation
        #[arg(short, long)]
        yes: bool,

        /// Path to a JSON service configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the service base URL
        #[arg(long)]
        url: Option<String>,

        /// Override the queried layer (typeName)
        #[arg(long)]
        layer: Option<String>,

        /// Override the maximum feature count
        #[arg(long)]
        max_features: Option<u32>,

        /// Override the HTTP timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        #[command(flatten)]
        viewport: ViewportArgs,
    },

    /// Replay a trace and filter a local GeoJSON dump by intersection
    Offline {
        /// Path to the pointer trace (JSON event array)
        #[arg(short, long)]
        trace: PathBuf,

        /// GeoJSON FeatureCollection to filter
        #[arg(short, long)]
        features: PathBuf,

        /// ESRI ASCII terrain grid (flat terrain at 0 m when omitted)
        #[arg(long)]
        terrain: Option<PathBuf>,

        /// Output path for the topology document (.csb appended when absent)
        #[arg(short, long, default_value = "topology.csb")]
        output: PathBuf,

        /// Save without asking for confirmation
        #[arg(short, long)]
        yes: bool,

        /// Path to a JSON service configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        viewport: ViewportArgs,
    },
}

/// Géométrie de la vue écran vers sol
#[derive(Debug, Args)]
pub struct ViewportArgs {
    /// Longitude of the top-left pixel
    #[arg(long, default_value_t = 0.0)]
    pub origin_lon: f64,

    /// Latitude of the top-left pixel
    #[arg(long, default_value_t = 1.0)]
    pub top_lat: f64,

    /// Degrees per pixel
    #[arg(long, default_value_t = 1.0)]
    pub scale: f64,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 1920.0)]
    pub view_width: f64,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 1080.0)]
    pub view_height: f64,
}

/// Exécute la commande survey
#[allow(clippy::too_many_arguments)]
pub async fn cmd_survey(
    trace_path: &Path,
    terrain: Option<&Path>,
    output: &Path,
    yes: bool,
    config_path: Option<&Path>,
    url: Option<String>,
    layer: Option<String>,
    max_features: Option<u32>,
    timeout: Option<u64>,
    viewport: &ViewportArgs,
) -> Result<()> {
    let config = resolve_config(config_path, url, layer, max_features, timeout)?;
    let service = ReqwestService::new(config.timeout_secs)?;

    match terrain {
        Some(grid_path) => {
            let grid = GridTerrain::from_ascii_file(grid_path)?;
            run_survey(
                build_viewport(viewport, grid),
                &service,
                &config,
                trace_path,
                output,
                yes,
            )
            .await
        }
        None => {
            run_survey(
                build_viewport(viewport, FlatTerrain::default()),
                &service,
                &config,
                trace_path,
                output,
                yes,
            )
            .await
        }
    }
}

/// Exécute la commande offline
pub fn cmd_offline(
    trace_path: &Path,
    features: &Path,
    terrain: Option<&Path>,
    output: &Path,
    yes: bool,
    config_path: Option<&Path>,
    viewport: &ViewportArgs,
) -> Result<()> {
    let config = resolve_config(config_path, None, None, None, None)?;

    match terrain {
        Some(grid_path) => {
            let grid = GridTerrain::from_ascii_file(grid_path)?;
            run_offline(
                build_viewport(viewport, grid),
                features,
                &config,
                trace_path,
                output,
                yes,
            )
        }
        None => run_offline(
            build_viewport(viewport, FlatTerrain::default()),
            features,
            &config,
            trace_path,
            output,
            yes,
        ),
    }
}

async fn run_survey<P, S>(
    picker: P,
    service: &S,
    config: &ServiceConfig,
    trace_path: &Path,
    output: &Path,
    yes: bool,
) -> Result<()>
where
    P: GroundPicker,
    S: FeatureService,
{
    let started = Instant::now();
    let mut report = SurveyReport::new();

    let measurement = measure_from_trace(picker, trace_path)?;
    report.record_measurement(&measurement);

    let url = wfs::get_feature_url(config, &measurement.ring);
    info!(url = %url, "Querying feature service");
    let body = match service.get(&url).await {
        Ok(body) => body,
        Err(e) => {
            error!(error = %e, "Feature service query failed");
            return Err(e).context("Feature service query failed");
        }
    };
    let batch = wfs::decode_features(&body, &config.code_field, &config.connect_field)?;

    build_and_save(batch, output, yes, &mut report)?;

    report.set_duration(started.elapsed());
    report.display();
    Ok(())
}

fn run_offline<P: GroundPicker>(
    picker: P,
    features: &Path,
    config: &ServiceConfig,
    trace_path: &Path,
    output: &Path,
    yes: bool,
) -> Result<()> {
    let started = Instant::now();
    let mut report = SurveyReport::new();

    let measurement = measure_from_trace(picker, trace_path)?;
    report.record_measurement(&measurement);

    let batch = offline::intersecting_records(
        features,
        &measurement.ring,
        &config.code_field,
        &config.connect_field,
    )?;

    build_and_save(batch, output, yes, &mut report)?;

    report.set_duration(started.elapsed());
    report.display();
    Ok(())
}

/// Rejoue la trace dans une session fraîche et retourne la mesure
fn measure_from_trace<P: GroundPicker>(picker: P, trace_path: &Path) -> Result<Measurement> {
    let events = trace::load(trace_path)?;
    let mut digitizer = Digitizer::new(picker, TraceRenderer);
    let mut session = digitizer.begin_session();
    let measurement = trace::replay(&events, &mut session)?;
    session.detach();

    info!(
        area_km2 = measurement.area_km2,
        vertices = measurement.ring.len(),
        "Polygon measured"
    );
    Ok(measurement)
}

/// Reconstruit la forêt puis propose l'enregistrement du document
fn build_and_save(
    batch: FeatureBatch,
    output: &Path,
    yes: bool,
    report: &mut SurveyReport,
) -> Result<()> {
    report.record_batch(&batch);

    let forest = topology::build(batch.records);
    report.record_forest(&forest);

    let document = PipeDocument::new(forest);
    let written = if yes {
        save_document(&document, output, &mut AlwaysSave)?
    } else {
        save_document(&document, output, &mut ConsolePrompt)?
    };
    report.record_output(written);
    Ok(())
}

fn build_viewport<T: TerrainModel>(args: &ViewportArgs, terrain: T) -> PlanarViewport<T> {
    PlanarViewport::new(
        args.origin_lon,
        args.top_lat,
        args.scale,
        args.view_width,
        args.view_height,
        terrain,
    )
}

fn resolve_config(
    path: Option<&Path>,
    url: Option<String>,
    layer: Option<String>,
    max_features: Option<u32>,
    timeout: Option<u64>,
) -> Result<ServiceConfig> {
    let mut config = match path {
        Some(path) => ServiceConfig::load(path)?,
        None => ServiceConfig::default(),
    };
    config.apply_env();
    apply_service_overrides(&mut config, url, layer, max_features, timeout);
    Ok(config)
}

fn apply_service_overrides(
    config: &mut ServiceConfig,
    url: Option<String>,
    layer: Option<String>,
    max_features: Option<u32>,
    timeout: Option<u64>,
) {
    if let Some(url) = url {
        config.base_url = url;
    }
    if let Some(layer) = layer {
        config.layer = layer;
    }
    if let Some(max_features) = max_features {
        config.max_features = max_features;
    }
    if let Some(timeout) = timeout {
        config.timeout_secs = timeout;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wfs::client::tests::MockFeatureService;

    const SQUARE_TRACE: &str = r#"[
        { "event": "click", "x": 0.0, "y": 1.0 },
        { "event": "click", "x": 0.0, "y": 0.0 },
        { "event": "click", "x": 1.0, "y": 0.0 },
        { "event": "click", "x": 1.0, "y": 1.0 },
        { "event": "finish" }
    ]"#;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gazoduc-cli-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_apply_service_overrides() {
        let mut config = ServiceConfig::default();
        apply_service_overrides(
            &mut config,
            Some("http://example.org/wfs".to_string()),
            None,
            Some(50),
            None,
        );

        assert_eq!(config.base_url, "http://example.org/wfs");
        assert_eq!(config.max_features, 50);
        // les champs non surchargés gardent leur valeur
        assert_eq!(config.layer, ServiceConfig::default().layer);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_build_viewport_maps_screen() {
        let args = ViewportArgs {
            origin_lon: 0.0,
            top_lat: 1.0,
            scale: 1.0,
            view_width: 800.0,
            view_height: 600.0,
        };
        let viewport = build_viewport(&args, FlatTerrain::default());
        let picked = viewport.pick(arpent::ScreenPoint::new(0.0, 1.0)).unwrap();

        assert_eq!(picked.lon, 0.0);
        assert_eq!(picked.lat, 0.0);
    }

    #[tokio::test]
    async fn test_run_survey_pipeline_with_mock() {
        let trace_path = temp_path("trace.json");
        std::fs::write(&trace_path, SQUARE_TRACE).unwrap();
        let output = temp_path("survey-out");

        let mock = MockFeatureService::with_body(
            r#"{ "features": [
                { "properties": { "code": "A", "connectCode": "B" } },
                { "properties": { "code": "B", "connectCode": "A" } }
            ] }"#,
        );
        let config = ServiceConfig::default();
        let viewport = PlanarViewport::new(0.0, 1.0, 1.0, 800.0, 600.0, FlatTerrain::default());

        run_survey(viewport, &mock, &config, &trace_path, &output, true)
            .await
            .unwrap();

        let urls = mock.requested_urls();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].contains("POLYGON((0 0,0 1,1 1,1 0,0 0))"));

        let written = temp_path("survey-out.csb");
        let content = std::fs::read_to_string(&written).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["data"].as_array().unwrap().len(), 2);
        assert_eq!(json["data"][0]["subList"][0]["code"], "B");

        std::fs::remove_file(&trace_path).unwrap();
        std::fs::remove_file(&written).unwrap();
    }

    #[tokio::test]
    async fn test_run_survey_service_error_saves_nothing() {
        let trace_path = temp_path("failing-trace.json");
        std::fs::write(&trace_path, SQUARE_TRACE).unwrap();
        let output = temp_path("failing-out");

        let mock = MockFeatureService::failing("connection refused");
        let config = ServiceConfig::default();
        let viewport = PlanarViewport::new(0.0, 1.0, 1.0, 800.0, 600.0, FlatTerrain::default());

        let result = run_survey(viewport, &mock, &config, &trace_path, &output, true).await;
        assert!(result.is_err());
        assert!(!temp_path("failing-out.csb").exists());

        std::fs::remove_file(&trace_path).unwrap();
    }
}
