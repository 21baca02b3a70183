//! Point d'entrée CLI pour gazoduc

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// Charger .env au démarrage
fn load_env() {
    // Chercher .env dans le répertoire courant ou parent
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;
mod config;
mod offline;
mod report;
mod topology;
mod trace;
mod wfs;

use cli::Commands;

/// Relever un polygone sur le terrain et reconstruire la topologie du réseau
#[derive(Parser)]
#[command(name = "gazoduc")]
#[command(author, version)]
#[command(about = "Relever un polygone sur le terrain et reconstruire la topologie du réseau")]
#[command(
    long_about = "Rejoue une trace de pointeur dans la machine à états de numérisation, mesure la surface géodésique du polygone, interroge un service WFS (ou un dump GeoJSON local) pour les canalisations intersectées et reconstruit la topologie de connectivité."
)]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Survey {
            trace,
            terrain,
            output,
            yes,
            config,
            url,
            layer,
            max_features,
            timeout,
            viewport,
        } => {
            info!(trace = %trace.display(), output = %output.display(), "Survey");
            cli::cmd_survey(
                &trace,
                terrain.as_deref(),
                &output,
                yes,
                config.as_deref(),
                url,
                layer,
                max_features,
                timeout,
                &viewport,
            )
            .await?;
        }
        Commands::Offline {
            trace,
            features,
            terrain,
            output,
            yes,
            config,
            viewport,
        } => {
            info!(trace = %trace.display(), features = %features.display(), "Offline survey");
            cli::cmd_offline(
                &trace,
                &features,
                terrain.as_deref(),
                &output,
                yes,
                config.as_deref(),
                &viewport,
            )?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
