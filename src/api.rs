//! REST API for the print estimation service.
//!
//! Provides HTTP endpoints for communication with the frontend.
//! Uses Axum as the web framework and supports CORS.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{
    Router,
    http::{StatusCode, Uri, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::OnceLock;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::{Any, CorsLayer};
use utoipa::{OpenApi, ToSchema};

use crate::config::{ApiConfig, EstimatorConfig};
use crate::estimate::calculate_estimate;
use crate::model::{
    CommonJobDetails, CostBreakdown, CutGroup, CutPosition, CuttingPlan, Estimate, EstimateError,
    EstimateRequest, FactorySheets, FactorySize, GangJob, ImpositionRequest, ImpressionCost,
    JobDetails, Machine, Margins, Material, MaterialNeeds, OverageRule, PenaltyOptions,
    PhysicalNeeds, PlannerOptions, PrintNeeds, PrintRun, PrintingPrice, PrintingSheets,
    ProductionPlanRequest, ProductionPlanSummary, RunCost, SheetFeedOrientation,
    SpecialMaterialCharges, ValidationError,
};
use crate::planner::{PlanEvent, find_best_imposition_plan, find_best_imposition_plan_with_progress};
use crate::types::{Size, Technique};

#[derive(Clone)]
struct ApiState {
    estimator_config: EstimatorConfig,
}

static OPENAPI_DOC: OnceLock<utoipa::openapi::OpenApi> = OnceLock::new();

// SRI hashes verified against https://unpkg.com/swagger-ui-dist@5.17.14/ on 2025-10-29.
const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8" />
        <title>pressgang API Docs</title>
        <link
            rel="stylesheet"
            href="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui.css"
            integrity="sha384-wxLW6kwyHktdDGr6Pv1zgm/VGJh99lfUbzSn6HNHBENZlCN7W602k9VkGdxuFvPn"
            crossorigin="anonymous"
        />
    </head>
    <body>
        <div id="swagger-ui"></div>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-bundle.js"
            integrity="sha384-wmyclcVGX/WhUkdkATwhaK1X1JtiNrr2EoYJ+diV3vj4v6OC5yCeSu+yW13SYJep"
            crossorigin="anonymous"
        ></script>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-standalone-preset.js"
            integrity="sha384-2YH8WDRaj7V2OqU/trsmzSagmk/E2SutiCsGkdgoQwC9pNUJV1u/141DHB6jgs8t"
            crossorigin="anonymous"
        ></script>
        <script>
            window.onload = function () {
                const ui = SwaggerUIBundle({
                    url: "/docs/openapi.json",
                    dom_id: "#swagger-ui",
                    presets: [SwaggerUIBundle.presets.apis, SwaggerUIStandalonePreset],
                    layout: "StandaloneLayout",
                });
                window.ui = ui;
            };
        </script>
    </body>
    </html>"##;

fn openapi_doc() -> &'static utoipa::openapi::OpenApi {
    OPENAPI_DOC.get_or_init(ApiDoc::openapi)
}

/// Embedded Web Assets (HTML, CSS, JS)
#[derive(RustEmbed)]
#[folder = "web/"]
struct WebAssets;

/// Job details of an estimate request as received on the wire.
///
/// `material` and `dollar_rate` are optional at this level: a missing
/// material is a reportable input error, a missing rate falls back to
/// the configured default.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobDetailsPayload {
    #[serde(default)]
    #[schema(nullable = true)]
    pub material: Option<Material>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub dollar_rate: Option<f64>,
    pub front_inks: u32,
    pub back_inks: u32,
    #[serde(default)]
    pub same_plates_for_back: bool,
}

/// Production plan of an estimate request as received on the wire.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductionPlanPayload {
    #[serde(default)]
    #[schema(nullable = true)]
    pub machine: Option<Machine>,
    pub sheet_size: Size,
    pub net_sheets_to_print: f64,
    #[serde(default)]
    pub is_symmetrical_turn: bool,
    #[serde(default)]
    pub is_symmetrical_tumble: bool,
}

/// Request structure for the estimate endpoint.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "jobDetails": {
            "material": {
                "id": 1, "name": "Couche 150", "grammage": 150.0,
                "isSpecialMaterial": false,
                "factorySizes": [{ "width": 720.0, "length": 1020.0, "usdPerTon": 1200.0 }]
            },
            "dollarRate": 40.5,
            "frontInks": 4,
            "backInks": 0,
            "samePlatesForBack": false
        },
        "productionPlan": {
            "machine": {
                "id": 1, "name": "Speedmaster 72", "printingBodies": 4,
                "sheetFeedOrientation": "long_edge",
                "margins": { "clamp": 10.0, "tail": 5.0, "sides": 4.0 },
                "minSheetSize": { "width": 210.0, "length": 280.0 },
                "maxSheetSize": { "width": 720.0, "length": 1020.0 },
                "overage": { "amount": 100.0, "perInk": true },
                "minImpressionsCharge": 1000.0,
                "setupCost": { "price": 500.0, "perInk": true },
                "washCost": { "price": 200.0, "perInk": false },
                "impressionCost": { "pricePerThousand": 80.0, "perInkPass": true }
            },
            "sheetSize": { "width": 360.0, "length": 510.0 },
            "netSheetsToPrint": 5000.0,
            "isSymmetricalTurn": false,
            "isSymmetricalTumble": false
        }
    })
)]
pub struct EstimatePayload {
    pub job_details: JobDetailsPayload,
    pub production_plan: ProductionPlanPayload,
}

impl EstimatePayload {
    /// Validates the payload into a core request.
    ///
    /// # Returns
    /// `Err(EstimateError::MissingInput)` when machine or material are
    /// absent, mirroring the request contract.
    fn into_request(self, config: &EstimatorConfig) -> Result<EstimateRequest, EstimateError> {
        let material = self
            .job_details
            .material
            .ok_or_else(|| EstimateError::MissingInput("request lacks a material".into()))?;
        let machine = self
            .production_plan
            .machine
            .ok_or_else(|| EstimateError::MissingInput("request lacks a machine".into()))?;

        Ok(EstimateRequest {
            job_details: JobDetails {
                material,
                dollar_rate: self
                    .job_details
                    .dollar_rate
                    .unwrap_or_else(|| config.default_dollar_rate()),
                front_inks: self.job_details.front_inks,
                back_inks: self.job_details.back_inks,
                same_plates_for_back: self.job_details.same_plates_for_back,
            },
            production_plan: ProductionPlanRequest {
                machine,
                sheet_size: self.production_plan.sheet_size,
                net_sheets_to_print: self.production_plan.net_sheets_to_print,
                is_symmetrical_turn: self.production_plan.is_symmetrical_turn,
                is_symmetrical_tumble: self.production_plan.is_symmetrical_tumble,
            },
        })
    }
}

/// Shared gang details as received on the wire.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommonJobDetailsPayload {
    #[serde(default)]
    #[schema(nullable = true)]
    pub material: Option<Material>,
    pub front_inks: u32,
    pub back_inks: u32,
    #[serde(default)]
    pub is_duplex: bool,
    #[serde(default)]
    pub same_plates_for_back: bool,
    #[serde(default)]
    #[schema(nullable = true)]
    pub dollar_rate: Option<f64>,
}

/// Planner options as received on the wire.
#[derive(Deserialize, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlannerOptionsPayload {
    #[serde(default)]
    pub number_of_results: Option<usize>,
    #[serde(default)]
    pub penalties: PenaltyOptions,
}

/// Request structure for the imposition endpoints.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImpositionPayload {
    pub jobs: Vec<GangJob>,
    pub common_details: CommonJobDetailsPayload,
    pub available_machines: Vec<Machine>,
    pub available_cuts: Vec<CutGroup>,
    #[serde(default)]
    pub options: Option<PlannerOptionsPayload>,
}

impl ImpositionPayload {
    /// Validates the payload into a core request.
    fn into_request(self, config: &EstimatorConfig) -> Result<ImpositionRequest, Response> {
        let material = match self.common_details.material {
            Some(material) => material,
            None => {
                return Err(estimate_error_response(&EstimateError::MissingInput(
                    "request lacks a material".into(),
                )));
            }
        };
        if let Err(err) = material.validate() {
            return Err(validation_error(err.to_string()));
        }
        for job in &self.jobs {
            if let Err(err) = validate_gang_job(job) {
                return Err(validation_error(err.to_string()));
            }
        }

        let options = self.options.unwrap_or_default();
        let number_of_results =
            config.clamp_result_count(options.number_of_results.unwrap_or(0));

        Ok(ImpositionRequest {
            jobs: self.jobs,
            common_details: CommonJobDetails {
                material,
                front_inks: self.common_details.front_inks,
                back_inks: self.common_details.back_inks,
                is_duplex: self.common_details.is_duplex,
                same_plates_for_back: self.common_details.same_plates_for_back,
                dollar_rate: self
                    .common_details
                    .dollar_rate
                    .unwrap_or_else(|| config.default_dollar_rate()),
            },
            available_machines: self.available_machines,
            available_cuts: self.available_cuts,
            options: PlannerOptions {
                number_of_results,
                penalties: options.penalties,
            },
        })
    }
}

/// Validates the geometry of one gang job (DRY with JobItem::new).
fn validate_gang_job(job: &GangJob) -> Result<(), ValidationError> {
    crate::model::JobItem::new(job.id, job.width, job.length, job.quantity).map(|_| ())
}

/// Response structure of the estimate endpoint.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResponse {
    pub best_option: Estimate,
}

/// Response structure of the imposition endpoint.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImpositionResponse {
    pub best_options: Vec<Estimate>,
}

#[derive(Serialize, ToSchema)]
struct ErrorResponse {
    error: String,
    details: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    details: impl Into<String>,
) -> Response {
    (status, Json(ErrorResponse::new(error, details))).into_response()
}

fn json_deserialize_error(err: JsonRejection) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid JSON data",
        err.to_string(),
    )
}

fn validation_error(details: impl Into<String>) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid input data",
        details,
    )
}

/// Maps core estimation errors to HTTP responses.
///
/// Every error kind is an input-data problem and maps to 422, except
/// the defensive `NoEstimateProduced`, which indicates a logic gap and
/// maps to 500.
fn estimate_error_response(err: &EstimateError) -> Response {
    let status = match err {
        EstimateError::NoEstimateProduced => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    };
    error_response(status, err.code(), err.to_string())
}

#[derive(OpenApi)]
#[openapi(
    paths(handle_estimate, handle_impose, handle_impose_stream),
    components(
        schemas(
            EstimatePayload,
            JobDetailsPayload,
            ProductionPlanPayload,
            ImpositionPayload,
            CommonJobDetailsPayload,
            PlannerOptionsPayload,
            EstimateResponse,
            ImpositionResponse,
            ErrorResponse,
            Material,
            FactorySize,
            Machine,
            SheetFeedOrientation,
            Margins,
            OverageRule,
            RunCost,
            ImpressionCost,
            SpecialMaterialCharges,
            CutGroup,
            GangJob,
            PenaltyOptions,
            Estimate,
            CostBreakdown,
            PhysicalNeeds,
            ProductionPlanSummary,
            MaterialNeeds,
            FactorySheets,
            PrintingSheets,
            PrintingPrice,
            PrintNeeds,
            PrintRun,
            CuttingPlan,
            CutPosition,
            Size,
            Technique,
            PlanEvent
        )
    ),
    tags((name = "estimation", description = "Endpoints for production cost estimation"))
)]
struct ApiDoc;

/// Starts the API server.
///
/// Configures CORS for cross-origin requests from the frontend.
/// Blocks until the server is terminated.
pub async fn start_api_server(config: ApiConfig, estimator_config: EstimatorConfig) {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let state = ApiState { estimator_config };

    let app = Router::new()
        // API endpoints
        .route("/estimate", post(handle_estimate))
        .route("/impose", post(handle_impose))
        .route("/impose_stream", post(handle_impose_stream))
        // API documentation
        .route("/docs/openapi.json", get(serve_openapi_json))
        .route("/docs", get(serve_openapi_ui))
        // Web-UI (embedded)
        .route("/", get(serve_index))
        .route("/{*path}", get(serve_static))
        .layer(cors)
        .with_state(state);

    let addr = config.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            panic!("❌ Could not bind API server to {}: {}", addr, err);
        }
    };

    let display_host = config.display_host().to_string();
    println!(
        "🚀 Server running on http://{}:{}",
        display_host,
        config.port()
    );
    if config.binds_to_all_interfaces() && config.uses_default_host() {
        println!("💡 Local access: http://localhost:{}", config.port());
    }
    println!("🖨️ API Endpoints:");
    println!("   - POST /estimate");
    println!("   - POST /impose");
    println!("   - POST /impose_stream");
    println!("📑 Documentation:");
    println!("   - GET /docs");
    println!("   - GET /docs/openapi.json");
    println!("🌐 Web-UI: http://{}:{}", display_host, config.port());

    if let Err(err) = axum::serve(listener, app).await {
        eprintln!("❌ API server terminated with an error: {err}");
    }
}

/// Handler for the POST /estimate endpoint.
///
/// Prices a single job against one machine/sheet-size pair and
/// returns the cheapest feasible technique.
#[utoipa::path(
    post,
    path = "/estimate",
    request_body = EstimatePayload,
    responses(
        (status = 200, description = "Cheapest estimate for the job", body = EstimateResponse),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid request, missing machine/material or infeasible cut",
            body = ErrorResponse
        )
    ),
    tag = "estimation"
)]
async fn handle_estimate(
    State(state): State<ApiState>,
    payload: Result<Json<EstimatePayload>, JsonRejection>,
) -> impl IntoResponse {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(err) => return json_deserialize_error(err),
    };

    let request = match payload.into_request(&state.estimator_config) {
        Ok(request) => request,
        Err(err) => return estimate_error_response(&err),
    };
    if let Err(err) = request.job_details.material.validate() {
        return validation_error(err.to_string());
    }

    println!(
        "📥 New estimate request: {} sheets on '{}'",
        request.production_plan.net_sheets_to_print, request.production_plan.machine.name
    );

    match calculate_estimate(&request) {
        Ok(best_option) => {
            println!(
                "💰 Result: {} at {:.2}",
                best_option.production_plan.printing_technique, best_option.total_cost
            );
            (StatusCode::OK, Json(EstimateResponse { best_option })).into_response()
        }
        Err(err) => estimate_error_response(&err),
    }
}

/// Handler for the POST /impose endpoint.
///
/// Searches every machine × cut-size combination for the cheapest
/// production plans of a gang of jobs.
#[utoipa::path(
    post,
    path = "/impose",
    request_body = ImpositionPayload,
    responses(
        (status = 200, description = "Cheapest production plans, ascending by cost", body = ImpositionResponse),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid request, empty job list or incompatible jobs",
            body = ErrorResponse
        )
    ),
    tag = "estimation"
)]
async fn handle_impose(
    State(state): State<ApiState>,
    payload: Result<Json<ImpositionPayload>, JsonRejection>,
) -> impl IntoResponse {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(err) => return json_deserialize_error(err),
    };

    let request = match payload.into_request(&state.estimator_config) {
        Ok(request) => request,
        Err(response) => return response,
    };

    println!(
        "📥 New imposition request: {} jobs, {} machines, {} cut groups",
        request.jobs.len(),
        request.available_machines.len(),
        request.available_cuts.len()
    );

    match find_best_imposition_plan(&request) {
        Ok(best_options) => {
            println!("💰 Result: {} plans", best_options.len());
            (StatusCode::OK, Json(ImpositionResponse { best_options })).into_response()
        }
        Err(err) => estimate_error_response(&err),
    }
}

/// Handler for the POST /impose_stream endpoint (SSE).
///
/// Streams planner events in real-time as Server-Sent Events
/// (text/event-stream). The frontend can show combinations being
/// priced without waiting for the full ranking.
#[utoipa::path(
    post,
    path = "/impose_stream",
    request_body = ImpositionPayload,
    responses(
        (
            status = 200,
            description = "Streams planner events in real-time",
            content_type = "text/event-stream",
            body = String
        ),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid request, empty job list or incompatible jobs",
            body = ErrorResponse
        )
    ),
    tag = "estimation"
)]
async fn handle_impose_stream(
    State(state): State<ApiState>,
    payload: Result<Json<ImpositionPayload>, JsonRejection>,
) -> impl IntoResponse {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(err) => return json_deserialize_error(err),
    };

    let request = match payload.into_request(&state.estimator_config) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let (tx, rx) = mpsc::channel::<String>(32);

    tokio::task::spawn_blocking(move || {
        let result = find_best_imposition_plan_with_progress(&request, |evt| {
            if let Ok(json) = serde_json::to_string(evt) {
                // A closed receiver just drops the remaining events.
                let _ = tx.blocking_send(json);
            }
        });
        if let Err(err) = result {
            let failed = json!({
                "type": "failed",
                "code": err.code(),
                "details": err.to_string(),
            });
            let _ = tx.blocking_send(failed.to_string());
        }
    });

    let stream = ReceiverStream::new(rx)
        .map(|msg| Ok::<_, std::convert::Infallible>(Event::default().data(msg)));
    Sse::new(stream)
        .keep_alive(
            KeepAlive::new()
                .interval(std::time::Duration::from_secs(10))
                .text("keep-alive"),
        )
        .into_response()
}

/// Serves the embedded index.html.
async fn serve_index() -> Response {
    match WebAssets::get("index.html") {
        Some(content) => Html(content.data).into_response(),
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

/// Serves embedded static assets.
async fn serve_static(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    match WebAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], content.data).into_response()
        }
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

async fn serve_openapi_json(State(_state): State<ApiState>) -> impl IntoResponse {
    Json(openapi_doc())
}

async fn serve_openapi_ui(State(_state): State<ApiState>) -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_estimator_config() -> EstimatorConfig {
        // from_env with no variables set yields the defaults.
        crate::config::AppConfig::from_env().estimator
    }

    #[test]
    fn openapi_doc_lists_expected_paths() {
        let doc = openapi_doc();
        let paths = &doc.paths.paths;
        for path in ["/estimate", "/impose", "/impose_stream"] {
            assert!(
                paths.contains_key(path),
                "OpenAPI documentation is missing the {} path",
                path
            );
        }
    }

    #[test]
    fn openapi_doc_contains_key_schemas() {
        let doc = openapi_doc();
        let components = doc
            .components
            .as_ref()
            .expect("OpenAPI documentation contains no components");
        let schemas = &components.schemas;
        for name in ["EstimatePayload", "ImpositionPayload", "Estimate", "ErrorResponse"] {
            assert!(
                schemas.contains_key(name),
                "Expected schema '{}' is missing from OpenAPI spec",
                name
            );
        }
    }

    #[test]
    fn estimate_payload_without_machine_is_missing_input() {
        let json = r#"{
            "jobDetails": {
                "material": {
                    "id": 1, "name": "Couche 150", "grammage": 150.0,
                    "isSpecialMaterial": false,
                    "factorySizes": [{ "width": 720.0, "length": 1020.0, "usdPerTon": 1200.0 }]
                },
                "frontInks": 4,
                "backInks": 0
            },
            "productionPlan": {
                "sheetSize": { "width": 360.0, "length": 510.0 },
                "netSheetsToPrint": 1000.0
            }
        }"#;
        let payload: EstimatePayload = serde_json::from_str(json).expect("Should parse valid JSON");
        let result = payload.into_request(&test_estimator_config());
        assert!(matches!(result, Err(EstimateError::MissingInput(_))));
    }

    #[test]
    fn estimate_payload_defaults_dollar_rate_from_config() {
        let json = r#"{
            "jobDetails": {
                "material": {
                    "id": 1, "name": "Couche 150", "grammage": 150.0,
                    "isSpecialMaterial": false,
                    "factorySizes": [{ "width": 720.0, "length": 1020.0 }]
                },
                "frontInks": 1,
                "backInks": 0
            },
            "productionPlan": {
                "machine": {
                    "id": 1, "name": "GTO 52", "printingBodies": 2,
                    "sheetFeedOrientation": "short_edge",
                    "margins": { "clamp": 10.0, "tail": 5.0, "sides": 4.0 },
                    "minSheetSize": { "width": 210.0, "length": 280.0 },
                    "maxSheetSize": { "width": 360.0, "length": 520.0 },
                    "overage": { "amount": 50.0, "perInk": false },
                    "minImpressionsCharge": 500.0,
                    "setupCost": { "price": 300.0, "perInk": false },
                    "washCost": { "price": 100.0, "perInk": false },
                    "impressionCost": { "pricePerThousand": 60.0, "perInkPass": false }
                },
                "sheetSize": { "width": 360.0, "length": 510.0 },
                "netSheetsToPrint": 1000.0
            }
        }"#;
        let payload: EstimatePayload = serde_json::from_str(json).expect("Should parse valid JSON");
        let config = test_estimator_config();
        let request = payload.into_request(&config).expect("Should validate");
        assert_eq!(request.job_details.dollar_rate, config.default_dollar_rate());
        assert!(!request.production_plan.is_symmetrical_turn);
    }

    #[test]
    fn imposition_payload_caps_result_count() {
        let json = r#"{
            "jobs": [{ "id": 1, "width": 100.0, "length": 150.0, "quantity": 500 }],
            "commonDetails": {
                "material": {
                    "id": 1, "name": "Obra 80", "grammage": 80.0,
                    "isSpecialMaterial": false,
                    "factorySizes": [{ "width": 760.0, "length": 1120.0, "usdPerTon": 1100.0 }]
                },
                "frontInks": 1,
                "backInks": 0
            },
            "availableMachines": [],
            "availableCuts": [],
            "options": { "numberOfResults": 10000 }
        }"#;
        let payload: ImpositionPayload =
            serde_json::from_str(json).expect("Should parse valid JSON");
        let config = test_estimator_config();
        let request = payload
            .into_request(&config)
            .unwrap_or_else(|_| panic!("Payload should validate"));
        assert_eq!(request.options.number_of_results, config.max_result_count());
    }

    #[test]
    fn imposition_payload_rejects_zero_quantity_job() {
        let json = r#"{
            "jobs": [{ "id": 1, "width": 100.0, "length": 150.0, "quantity": 0 }],
            "commonDetails": {
                "material": {
                    "id": 1, "name": "Obra 80", "grammage": 80.0,
                    "isSpecialMaterial": false,
                    "factorySizes": [{ "width": 760.0, "length": 1120.0 }]
                },
                "frontInks": 1,
                "backInks": 0
            },
            "availableMachines": [],
            "availableCuts": []
        }"#;
        let payload: ImpositionPayload =
            serde_json::from_str(json).expect("Should parse valid JSON");
        let result = payload.into_request(&test_estimator_config());
        assert!(result.is_err(), "zero-quantity job must be rejected");
    }
}
