pub mod types;
pub mod config;
pub mod data;
pub mod map;
pub mod chart;
pub mod extract;
pub mod server;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the demographic map to its HTML document
    Render {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
    /// Render the map, then serve it alongside the age chart
    Serve {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
    /// Extract the companion notebook's cells to a text file
    Extract {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Render { config } => {
            let app_config = config::AppConfig::load_or_default(config)?;

            // 1. Load Data
            let regions = data::load_regions(&app_config)?;

            // 2. Compose the map artifact
            let map_doc = map::build_map(&regions);

            // 3. Persist it
            map_doc.write(&app_config.output.map_html)?;
            println!("Map written to {:?}", app_config.output.map_html);
        }
        Commands::Serve { config } => {
            let app_config = config::AppConfig::load_or_default(config)?;

            let regions = data::load_regions(&app_config)?;
            let brackets = data::load_age_brackets(&app_config)?;

            // Write the map first so the viewer has a document to embed
            map::build_map(&regions).write(&app_config.output.map_html)?;

            let figure = chart::build_figure(&brackets);
            server::start_server(app_config, figure).await?;
        }
        Commands::Extract { config } => {
            let app_config = config::AppConfig::load_or_default(config)?;

            extract::run(&app_config.input.notebook, &app_config.output.text_dump)?;
            // Reported only once the write has actually succeeded
            println!(
                "Le contenu du notebook a été extrait avec succès dans le fichier {:?}.",
                app_config.output.text_dump
            );
        }
    }

    Ok(())
}
