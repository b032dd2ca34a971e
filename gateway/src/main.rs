use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cable_atlas::Cable;
use impact_advisor::{AdvisorClient, AdvisorConfig};
use solar_telemetry::{noaa::NoaaClient, SolarWind};

mod feeds;
mod routes;

#[derive(Clone)]
pub struct AppState {
    /// Latest solar-wind snapshot, swapped in by the refresh task
    pub wind: Arc<RwLock<SolarWind>>,
    /// Cable registry, refreshed on a slow cycle
    pub cables: Arc<RwLock<Vec<Cable>>>,
    pub noaa: Arc<NoaaClient>,
    pub http: reqwest::Client,
    /// External AI predictor; None means every advisor request is
    /// answered by the built-in fallback report
    pub advisor: Option<Arc<AdvisorClient>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "solarwatch_gateway=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;
    let noaa = Arc::new(NoaaClient::new());

    // Cable geometry is load-bearing: without it there is nothing to
    // score, so a failed initial fetch aborts startup.
    let cables = feeds::fetch_cables(&http).await?;
    tracing::info!("   Loaded {} submarine cables", cables.len());

    // Solar wind never blocks startup; the feed layer substitutes
    // synthetic quiet-to-moderate conditions on failure.
    let wind = noaa.fetch_or_fallback().await;
    tracing::info!(
        "   Solar wind: {:.0} km/s, Bz {:.1} nT, Kp {:.1}",
        wind.speed,
        wind.bz,
        wind.kp
    );

    let advisor = match (
        std::env::var("ADVISOR_ENDPOINT"),
        std::env::var("ADVISOR_API_KEY"),
    ) {
        (Ok(endpoint), Ok(api_key)) => {
            tracing::info!("   External advisor configured: {}", endpoint);
            Some(Arc::new(AdvisorClient::new(AdvisorConfig::new(
                endpoint, api_key,
            ))))
        }
        _ => {
            tracing::info!("   No external advisor - serving built-in fallback reports");
            None
        }
    };

    let state = AppState {
        wind: Arc::new(RwLock::new(wind)),
        cables: Arc::new(RwLock::new(cables)),
        noaa,
        http,
        advisor,
    };

    feeds::start_background_refresh(state.clone());

    // API routes for the dashboard
    let dashboard_routes = Router::new()
        .route("/solar-wind", get(routes::current_solar_wind))
        .route("/cables", get(routes::list_cables))
        .route("/predictions", get(routes::realtime_predictions))
        .route("/simulate", post(routes::simulate_cme))
        .route("/subsolar", get(routes::current_subsolar_point))
        .route("/advisor", post(routes::advisor_report))
        .with_state(state);

    let api_routes = Router::new()
        .route("/health", get(routes::health))
        .nest("/api/v1", dashboard_routes)
        .layer(CorsLayer::permissive());

    // Static file serving for the globe UI (if dist exists)
    let ui_path = std::path::Path::new("ui/dist");
    let app = if ui_path.exists() {
        tracing::info!("   Serving UI from {}", ui_path.display());
        api_routes.nest_service("/", ServeDir::new(ui_path))
    } else {
        tracing::warn!("   UI not built - API only");
        api_routes
    };

    let port = std::env::var("SOLARWATCH_PORT")
        .or_else(|_| std::env::var("PORT"))
        .unwrap_or_else(|_| "18710".to_string());
    let addr = format!("0.0.0.0:{}", port);

    tracing::info!("☀️  Solarwatch Gateway starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
