use crate::chart::Figure;
use crate::config::AppConfig;
use anyhow::Result;
use axum::{extract::State, response::Html, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

// Embedded viewport for the map document
pub const VIEWPORT_WIDTH: u32 = 800;
pub const VIEWPORT_HEIGHT: u32 = 600;

pub struct AppState {
    // URL of the map document, served from disk. The viewer references the
    // file; it does not own it.
    pub map_src: String,
    // Chart page rendered up front and held in memory; no intermediate file.
    pub chart_html: String,
}

pub async fn start_server(config: AppConfig, figure: Figure) -> Result<()> {
    let state = Arc::new(AppState {
        map_src: format!("/{}", config.output.map_html.to_string_lossy()),
        chart_html: figure.to_html()?,
    });

    let addr = SocketAddr::from(([127, 0, 0, 1], config.server.port));
    println!("Starting viewer on http://{}", addr);

    let app = Router::new()
        .route("/", get(viewer_handler))
        .route("/chart", get(chart_handler))
        .fallback_service(ServeDir::new("."))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn viewer_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(viewer_page(&state.map_src))
}

async fn chart_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.chart_html.clone())
}

fn viewer_page(map_src: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Visualisation démographique de la RDC</title>\n\
         </head>\n<body>\n\
         <h2>Carte démographique de la RDC</h2>\n\
         <iframe src=\"{}\" width=\"{}\" height=\"{}\"></iframe>\n\
         <p><a href=\"/chart\">Population par tranche d'âge</a></p>\n\
         </body>\n</html>\n",
        map_src, VIEWPORT_WIDTH, VIEWPORT_HEIGHT
    )
}
