// src/handlers.rs

use crate::analyzer::{analyze, TickerMetrics};
use crate::contact::{check_form, ContactMessage};
use crate::keepalive;
use crate::models::{ContactForm, ContactResult, PerformanceRequest, PerformanceResponse};
use crate::report::{growth_table, metrics_row, price_table, roi_row};
use crate::AppState;
use actix_web::http::header::{ContentDisposition, ContentType, DispositionParam, DispositionType};
use actix_web::{get, post, web, HttpResponse, Responder};
use quote_service::{AssetClass, PriceSeriesFetcher, TickerMetadata};
use tracing::{debug, info, warn};
use validator::Validate;

pub const SELECT_TICKERS_WARNING: &str = "Please select at least one ticker and a valid date range.";
pub const NO_DATA_MESSAGE: &str = "No price data available for the selected tickers and date range.";
pub const HEARTBEAT_HEADER: &str = "X-Last-Heartbeat";

const ABOUT_PAGE: &str = include_str!("../static/about.html");
const PORTFOLIO_PAGE: &str = include_str!("../static/portfolio.html");

#[get("/")]
pub async fn about_page() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(ABOUT_PAGE)
}

#[get("/portfolio")]
pub async fn portfolio_page() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(PORTFOLIO_PAGE)
}

#[get("/resume")]
pub async fn resume(state: web::Data<AppState>) -> HttpResponse {
    let Some(path) = state.resume_path.clone() else {
        return HttpResponse::NotFound().body("Resume not available");
    };
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resume.pdf".to_string());

    match web::block(move || std::fs::read(path)).await {
        Ok(Ok(bytes)) => HttpResponse::Ok()
            .content_type("application/pdf")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(file_name)],
            })
            .body(bytes),
        Ok(Err(err)) => {
            warn!(%err, "resume file unreadable");
            HttpResponse::NotFound().body("Resume not available")
        }
        Err(err) => {
            warn!(%err, "resume read task failed");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/api/catalog")]
pub async fn catalog(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.catalog.list_catalog())
}

#[post("/api/performance")]
pub async fn performance(
    state: web::Data<AppState>,
    request: web::Json<PerformanceRequest>,
) -> HttpResponse {
    let request = request.into_inner();

    if let Err(err) = request.validate() {
        return HttpResponse::BadRequest().json(PerformanceResponse::empty(
            &request,
            format!("Invalid request: {}", err),
            Vec::new(),
        ));
    }

    let tickers = request.selected_tickers();
    let outcome = match state
        .fetcher
        .fetch(&tickers, request.start_date, request.end_date)
        .await
    {
        Ok(outcome) => outcome,
        Err(err) => {
            info!(%err, "nothing to compute");
            return HttpResponse::Ok().json(PerformanceResponse::empty(
                &request,
                SELECT_TICKERS_WARNING,
                vec![SELECT_TICKERS_WARNING.to_string()],
            ));
        }
    };

    let mut warnings: Vec<String> = outcome
        .missing
        .iter()
        .map(|m| format!("No data found for {} ({}).", m.symbol, m.error))
        .collect();

    if outcome.matrix.is_empty() {
        return HttpResponse::Ok().json(PerformanceResponse::empty(&request, NO_DATA_MESSAGE, warnings));
    }

    let analysis = analyze(&outcome.matrix, request.principal);
    warnings.extend(analysis.skipped.iter().map(|err| format!("Skipped {}.", err)));

    let mut metrics = Vec::with_capacity(analysis.tickers.len());
    for ticker in &analysis.tickers {
        let symbol = &ticker.investment.symbol;
        let metadata = fundamentals(&state.fetcher, symbol).await;
        metrics.push(metrics_row(&TickerMetrics::new(symbol, &ticker.metrics, metadata)));
    }

    let analyzed = analysis.tickers.len();
    HttpResponse::Ok().json(PerformanceResponse {
        success: analyzed > 0,
        message: format!("Analyzed {} of {} ticker(s).", analyzed, tickers.len()),
        warnings,
        view: request.view,
        start_date: request.start_date,
        end_date: request.end_date,
        prices: price_table(&outcome.matrix),
        roi: analysis.tickers.iter().map(|t| roi_row(&t.investment)).collect(),
        growth: growth_table(&analysis),
        metrics,
    })
}

// Best effort: a failed lookup leaves every field absent. Crypto pairs have no
// fundamentals, so no lookup is made.
async fn fundamentals(fetcher: &PriceSeriesFetcher, symbol: &str) -> TickerMetadata {
    if let AssetClass::Crypto { .. } = AssetClass::of(symbol) {
        return TickerMetadata::default();
    }
    match fetcher.metadata(symbol).await {
        Ok(metadata) => metadata,
        Err(err) => {
            debug!(symbol = %symbol, %err, "no fundamentals, rendering N/A");
            TickerMetadata::default()
        }
    }
}

#[post("/api/contact")]
pub async fn contact(state: web::Data<AppState>, form: web::Json<ContactForm>) -> HttpResponse {
    let form = form.into_inner();

    if let Err(err) = check_form(&form) {
        return HttpResponse::BadRequest().json(ContactResult {
            success: false,
            message: err.to_string(),
        });
    }

    let Some(mailer) = state.mailer.as_ref() else {
        warn!("contact form submitted but mail is not configured");
        return HttpResponse::ServiceUnavailable().json(ContactResult {
            success: false,
            message: "The contact form is currently unavailable.".to_string(),
        });
    };

    match mailer.send(&ContactMessage::from_form(&form)).await {
        Ok(()) => HttpResponse::Ok().json(ContactResult {
            success: true,
            message: "Your message has been sent!".to_string(),
        }),
        Err(err) => {
            warn!(%err, "contact mail failed");
            HttpResponse::BadGateway().json(ContactResult {
                success: false,
                message: format!("Error sending email: {}", err),
            })
        }
    }
}

#[get("/health")]
pub async fn health_check() -> impl Responder {
    let mut response = HttpResponse::Ok();
    if let Some(at) = keepalive::last_heartbeat() {
        response.insert_header((HEARTBEAT_HEADER, at.to_rfc3339()));
    }
    response.body("OK")
}
