use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use geoinvest::config::AppConfig;
use geoinvest::dataset::CountryDataset;
use geoinvest::error::AppError;
use geoinvest::recommend::domain::{
    DevelopmentStatus, Horizon, PriorityRanking, Region, Sector,
};
use geoinvest::recommend::{
    recommendation_router, RecommendationReport, RecommendationRequest, RecommendationService,
};
use geoinvest::telemetry;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "GeoInvest",
    about = "Recommend countries for investment from economic and SDG indicators",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run one recommendation query against the CSV snapshots and print
    /// the ranked table
    Recommend(RecommendArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct RecommendArgs {
    /// Region of interest (europe, asia, oceania, americas, africa)
    #[arg(long, value_parser = parse_region)]
    region: Region,
    /// Development status preference (developed, emerging)
    #[arg(long, value_parser = parse_development)]
    development: DevelopmentStatus,
    /// Investment horizon (long run, short run)
    #[arg(long, value_parser = parse_horizon)]
    horizon: Horizon,
    /// Sector of interest (primary, secondary, tertiary)
    #[arg(long, value_parser = parse_sector)]
    sector: Sector,
    /// Priority rank for the environment area, 1 (highest) to 3
    #[arg(long, default_value_t = 1)]
    environment_rank: u8,
    /// Priority rank for the equity area, 1 (highest) to 3
    #[arg(long, default_value_t = 2)]
    equity_rank: u8,
    /// Priority rank for the fair-labour area, 1 (highest) to 3
    #[arg(long, default_value_t = 3)]
    labour_rank: u8,
    /// Directory holding the CSV snapshots (defaults to the configured one)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Recommend(args) => run_recommend(args),
    }
}

fn parse_region(raw: &str) -> Result<Region, String> {
    Region::from_str(raw).map_err(|err| err.to_string())
}

fn parse_development(raw: &str) -> Result<DevelopmentStatus, String> {
    DevelopmentStatus::from_str(raw).map_err(|err| err.to_string())
}

fn parse_horizon(raw: &str) -> Result<Horizon, String> {
    Horizon::from_str(raw).map_err(|err| err.to_string())
}

fn parse_sector(raw: &str) -> Result<Sector, String> {
    Sector::from_str(raw).map_err(|err| err.to_string())
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let dataset = Arc::new(CountryDataset::load(&config.dataset.data_dir)?);
    info!(
        countries = dataset.len(),
        data_dir = %config.dataset.data_dir.display(),
        "country dataset loaded"
    );
    let service = Arc::new(RecommendationService::new(dataset));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(recommendation_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "investment recommender ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        region,
        development,
        horizon,
        sector,
        environment_rank,
        equity_rank,
        labour_rank,
        data_dir,
    } = args;

    let data_dir = match data_dir {
        Some(dir) => dir,
        None => AppConfig::load()?.dataset.data_dir,
    };

    let dataset = Arc::new(CountryDataset::load(&data_dir)?);
    let service = RecommendationService::new(dataset);

    let request = RecommendationRequest {
        region,
        development,
        horizon,
        sector,
        priority: PriorityRanking {
            environment: environment_rank,
            equity: equity_rank,
            labour: labour_rank,
        },
    };

    let report = service.recommend(&request)?;
    render_report(&request, &report);

    Ok(())
}

fn render_report(request: &RecommendationRequest, report: &RecommendationReport) {
    println!("Here's where we think you should invest:");
    println!(
        "Criteria: {} / {} / {} / {}",
        request.region.label(),
        request.development.label(),
        request.horizon.label(),
        request.sector.label()
    );

    if let Some(disclaimer) = &report.disclaimer {
        println!("\nNote: {disclaimer}");
    }

    println!(
        "\n{:<5} {:<20} {:>9} {:>9} {:>9}",
        "Rank", "Country", "Average", "Economic", "Ethical"
    );
    for row in &report.countries {
        println!(
            "{:<5} {:<20} {:>9.1} {:>9.1} {:>9.1}",
            row.rank, row.country, row.average_score, row.economic_score, row.ethical_score
        );
    }

    if report.countries.is_empty() {
        println!("(no countries to show)");
    }
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
