use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use framefit_core::{Error, ResolvedFrame, SaddleConfig};
use framefit_similarity::{DistanceModes, RankingResponse, DEFAULT_TOP_N};
use framefit_storage::CatalogManager;
use serde::Deserialize;
use std::sync::Arc;

/// Settings shared by every handler.
#[derive(Debug, Clone, Copy)]
pub struct ApiSettings {
    pub default_top_n: usize,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            default_top_n: DEFAULT_TOP_N,
        }
    }
}

#[derive(Deserialize)]
struct SizesQuery {
    brand: String,
    model: String,
}

#[derive(Deserialize)]
struct YearsQuery {
    brand: String,
    model: String,
    size: String,
}

#[derive(Deserialize)]
struct FrameQuery {
    brand: String,
    model: String,
    size: String,
    year: String,
}

/// Reference frame of a ranking request: by record id or by the four labels.
#[derive(Deserialize)]
#[serde(untagged)]
enum FrameSelector {
    Id { id: String },
    Labels(FrameQuery),
}

#[derive(Deserialize)]
struct RankRequest {
    reference: FrameSelector,
    #[serde(default = "DistanceModes::catalog_default")]
    modes: DistanceModes,
    n: Option<usize>,
    #[serde(default)]
    explain: bool,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(
        manager: Arc<CatalogManager>,
        port: u16,
        settings: ApiSettings,
    ) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .configure(configure(manager.clone(), settings))
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

/// Register state and routes; used by the server and by tests.
pub fn configure(
    manager: Arc<CatalogManager>,
    settings: ApiSettings,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(manager))
            .app_data(web::Data::new(settings))
            .route("/all", web::get().to(all_records))
            .route("/brands", web::get().to(list_brands))
            .route("/models/{brand}", web::get().to(list_models))
            .route("/sizes", web::get().to(list_sizes))
            .route("/years", web::get().to(list_years))
            .route("/frame", web::get().to(get_frame))
            .route("/rank", web::post().to(rank))
            .route("/saddle", web::get().to(get_saddle))
            .route("/saddle", web::put().to(set_saddle))
            .route("/stats", web::get().to(get_stats));
    }
}

fn not_found(e: Error) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": e.to_string()
    }))
}

fn json_or_not_found<T: serde::Serialize>(result: framefit_core::Result<T>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => not_found(e),
    }
}

async fn all_records(manager: web::Data<Arc<CatalogManager>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(&manager.snapshot().records))
}

async fn list_brands(manager: web::Data<Arc<CatalogManager>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(manager.brands()))
}

async fn list_models(
    manager: web::Data<Arc<CatalogManager>>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let brand = path.into_inner();
    Ok(json_or_not_found(manager.models_of(&brand)))
}

async fn list_sizes(
    manager: web::Data<Arc<CatalogManager>>,
    query: web::Query<SizesQuery>,
) -> ActixResult<HttpResponse> {
    Ok(json_or_not_found(manager.sizes_of(&query.brand, &query.model)))
}

async fn list_years(
    manager: web::Data<Arc<CatalogManager>>,
    query: web::Query<YearsQuery>,
) -> ActixResult<HttpResponse> {
    Ok(json_or_not_found(
        manager.years_of(&query.brand, &query.model, &query.size),
    ))
}

async fn get_frame(
    manager: web::Data<Arc<CatalogManager>>,
    query: web::Query<FrameQuery>,
) -> ActixResult<HttpResponse> {
    Ok(json_or_not_found(manager.get_frame(
        &query.brand,
        &query.model,
        &query.size,
        &query.year,
    )))
}

fn select(manager: &CatalogManager, selector: &FrameSelector) -> framefit_core::Result<ResolvedFrame> {
    match selector {
        FrameSelector::Id { id } => manager.get_frame_by_id(id),
        FrameSelector::Labels(q) => manager.get_frame(&q.brand, &q.model, &q.size, &q.year),
    }
}

async fn rank(
    manager: web::Data<Arc<CatalogManager>>,
    settings: web::Data<ApiSettings>,
    req: web::Json<RankRequest>,
) -> ActixResult<HttpResponse> {
    let req = req.into_inner();
    let reference = match select(&manager, &req.reference) {
        Ok(frame) => frame,
        Err(e) => return Ok(not_found(e)),
    };

    let n = req.n.unwrap_or(settings.default_top_n);
    let ranked = manager.rank_nearest(&reference, &req.modes, n);
    let response = RankingResponse::new(reference, ranked, req.modes, manager.len(), req.explain);
    Ok(HttpResponse::Ok().json(response))
}

async fn get_saddle(manager: web::Data<Arc<CatalogManager>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(manager.saddle()))
}

async fn set_saddle(
    manager: web::Data<Arc<CatalogManager>>,
    req: web::Json<SaddleConfig>,
) -> ActixResult<HttpResponse> {
    let saddle = req.into_inner();
    if !saddle.is_finite() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "saddle_height and saddle_fore_aft must be finite numbers"
        })));
    }

    // resolving the whole catalog is CPU bound
    let manager = manager.get_ref().clone();
    web::block(move || {
        manager.set_saddle(saddle);
        manager.stats()
    })
    .await
    .map(|stats| HttpResponse::Ok().json(stats))
    .map_err(actix_web::error::ErrorInternalServerError)
}

async fn get_stats(manager: web::Data<Arc<CatalogManager>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(manager.stats()))
}
