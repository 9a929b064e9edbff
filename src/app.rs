use std::path::PathBuf;

use actix_web::http::StatusCode;
use actix_web::middleware::Logger;
use actix_web::web;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use serde::Deserialize;

use crate::error::{ReportError, ReportResult};
use crate::report::composer::Report;
use crate::state::AppState;
use crate::ui::form::{Controls, ControlsForm, ControlsQuery};
use crate::ui::plot::{components, Components};

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

pub struct Server;

impl Server {
    pub async fn run(state: AppState, host: &str, port: u16, workers: Option<usize>) -> std::io::Result<()> {
        let state = web::Data::new(state);
        log::info!("serving {} on http://{host}:{port}", state.settings.results.display());
        let mut server = HttpServer::new(move || {
            App::new()
                .wrap(Logger::default())
                .app_data(state.clone())
                .configure(routes)
        });
        if let Some(workers) = workers {
            server = server.workers(workers);
        }
        server.bind((host, port))?.run().await
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/api/entities", web::get().to(api_entities))
        .route("/api/report", web::get().to(api_report));
}

// ---------------------------------------------------------------------------
// Composition on the blocking pool
// ---------------------------------------------------------------------------

/// Entity choices for the form plus the report (or why there is none).
async fn resolve(state: &web::Data<AppState>, controls: Controls) -> (Vec<String>, ReportResult<Report>) {
    let state = state.clone();
    let result = web::block(move || {
        let base = controls.base_path();
        let names = state.resolver.list_entities(&base);
        let report = state
            .composer
            .compose(&base, &controls.name, controls.cutoff, controls.n);
        (names, report)
    })
    .await;

    match result {
        Ok(pair) => pair,
        Err(e) => (Vec::new(), Err(ReportError::from(e))),
    }
}

/// Entity choices alone, for pages that never get to composition.
async fn list_entities(state: &web::Data<AppState>, base: PathBuf) -> ReportResult<Vec<String>> {
    let state = state.clone();
    Ok(web::block(move || state.resolver.list_entities(&base)).await?)
}

fn log_failure(err: &ReportError) {
    if err.status_code().is_server_error() {
        log::error!("{err}");
    } else {
        log::warn!("{err}");
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// `GET /` – selection form plus the composed figure.
async fn index(state: web::Data<AppState>, query: web::Query<ControlsQuery>) -> HttpResponse {
    let (controls, names, outcome) = match Controls::bind(&query, &state.settings) {
        Ok(controls) => {
            let (names, outcome) = resolve(&state, controls.clone()).await;
            (controls, names, outcome)
        }
        Err(e) => {
            let controls = Controls::from_query(&query, &state.settings);
            let names = list_entities(&state, controls.base_path()).await.unwrap_or_default();
            (controls, names, Err(e))
        }
    };
    let form = ControlsForm::new(&controls, names);

    let (status, report, error) = match outcome {
        Ok(report) => (StatusCode::OK, Some(report), None),
        Err(e) => {
            log_failure(&e);
            (e.status_code(), None, Some(e.to_string()))
        }
    };

    let parts = match components(report.as_ref().and_then(|r| r.figure.as_ref())) {
        Ok(parts) => parts,
        Err(e) => {
            log::error!("rendering figure: {e:#}");
            return HttpResponse::InternalServerError().body("failed to serialize figure");
        }
    };

    render(&state, status, &form, report.as_ref(), &parts, error.as_deref())
}

fn render(
    state: &AppState,
    status: StatusCode,
    form: &ControlsForm,
    report: Option<&Report>,
    parts: &Components,
    error: Option<&str>,
) -> HttpResponse {
    match state.pages.index(form, report, parts, error) {
        Ok(html) => HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(html),
        Err(e) => {
            log::error!("rendering page: {e:#}");
            HttpResponse::InternalServerError().body("failed to render page")
        }
    }
}

#[derive(Debug, Deserialize)]
struct EntitiesQuery {
    path: Option<String>,
}

/// `GET /api/entities` – names available under `path`.
async fn api_entities(state: web::Data<AppState>, query: web::Query<EntitiesQuery>) -> HttpResponse {
    let base = query
        .path
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| state.settings.results.clone());

    match list_entities(&state, base).await {
        Ok(names) => HttpResponse::Ok().json(names),
        Err(e) => json_error(&e),
    }
}

/// `GET /api/report` – the report as JSON.
async fn api_report(state: web::Data<AppState>, query: web::Query<ControlsQuery>) -> HttpResponse {
    let controls = match Controls::bind(&query, &state.settings) {
        Ok(controls) => controls,
        Err(e) => return json_error(&e),
    };
    match resolve(&state, controls).await {
        (_, Ok(report)) => HttpResponse::Ok().json(report),
        (_, Err(e)) => json_error(&e),
    }
}

fn json_error(err: &ReportError) -> HttpResponse {
    log_failure(err);
    HttpResponse::build(err.status_code()).json(serde_json::json!({ "error": err.to_string() }))
}
