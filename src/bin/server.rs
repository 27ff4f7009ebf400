use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use plate_nester::labels::{Label, labels};
use plate_nester::types::total_waste_percent;
use plate_nester::{NestError, Plate, PlateRecord, Sheet, StockConfig, Strategy, nest};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

const MAX_PLATES: usize = 1000;

/// Plates arrive unvalidated so a bad plate is a 400 from the handler rather
/// than a 422 from the extractor.
#[derive(Deserialize, Serialize)]
struct NestRequest {
    plates: Vec<PlateRecord>,
    #[serde(default)]
    stock: StockConfig,
    #[serde(default)]
    strategy: Strategy,
}

#[derive(Serialize)]
struct NestResponse {
    strategy: Strategy,
    sheets: Vec<SheetResponse>,
    unplaced: Vec<Plate>,
    extra_sheets_needed: usize,
    waste_percent: f64,
    labels: Vec<Label>,
}

#[derive(Serialize)]
struct SheetResponse {
    #[serde(flatten)]
    sheet: Sheet,
    used_area: u64,
    waste_area: u64,
    waste_percent: f64,
}

fn bad_request(err: NestError) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, err.to_string())
}

async fn nest_plates(
    Json(req): Json<NestRequest>,
) -> Result<Json<NestResponse>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /nest"
    );

    if req.plates.len() > MAX_PLATES {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("at most {MAX_PLATES} plates per request"),
        ));
    }
    req.stock.check_limit().map_err(bad_request)?;

    let plates = req
        .plates
        .into_iter()
        .map(Plate::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(bad_request)?;
    let mut sheets = req.stock.build_sheets().map_err(bad_request)?;
    let report = nest(&plates, &mut sheets, req.strategy).map_err(bad_request)?;

    let response = NestResponse {
        strategy: req.strategy,
        waste_percent: total_waste_percent(&sheets),
        labels: labels(&sheets),
        extra_sheets_needed: report.extra_sheets_needed(),
        unplaced: report.unplaced,
        sheets: sheets
            .into_iter()
            .filter(Sheet::is_used)
            .map(|sheet| SheetResponse {
                used_area: sheet.used_area(),
                waste_area: sheet.waste_area(),
                waste_percent: sheet.waste_percent(),
                sheet,
            })
            .collect(),
    };

    Ok(Json(response))
}

#[tokio::main]
async fn main() {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    // Error reporting is only enabled when a DSN is configured.
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/nest", post(nest_plates))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}
