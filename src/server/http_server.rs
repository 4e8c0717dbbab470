use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer as ActixHttpServer, Responder};
use log::info;
use std::sync::Arc;

use crate::auth::routes as auth_routes;
use crate::config::AppConfig;
use crate::error::{TextfoldError, TextfoldResult};
use crate::ingestion::routes as ingestion_routes;
use crate::ingestion::{IngestionPipeline, OpenRouterClient, Oracle};
use crate::store::DbOperations;

/// HTTP server for a textfold instance.
///
/// Provides the REST API for authentication, single and batch text
/// analysis, history queries and mutations, and spreadsheet export.
pub struct TextfoldHttpServer {
    state: web::Data<AppState>,
    /// The HTTP server bind address
    bind_address: String,
}

/// Shared application state for the HTTP server.
///
/// Everything a handler touches hangs off this struct; nothing is process
/// global. The store handle is opened once at startup and dropped at
/// shutdown.
pub struct AppState {
    /// The document store
    pub db: Arc<DbOperations>,
    /// The classification-ingestion pipeline
    pub pipeline: Arc<IngestionPipeline>,
    /// Application configuration
    pub config: AppConfig,
}

impl TextfoldHttpServer {
    /// Create a new HTTP server backed by the real oracle service.
    ///
    /// # Errors
    ///
    /// Returns a `TextfoldError` if the configuration is invalid, the oracle
    /// client cannot be built (missing API key), or the store cannot be
    /// opened.
    pub fn new(config: AppConfig, bind_address: &str) -> TextfoldResult<Self> {
        let oracle: Arc<dyn Oracle> = Arc::new(
            OpenRouterClient::new(config.oracle.clone())
                .map_err(|e| TextfoldError::Config(e.to_string()))?,
        );
        Self::with_oracle(config, bind_address, oracle)
    }

    /// Create a new HTTP server with an injected oracle implementation.
    ///
    /// This is the substitution seam: tests pass a canned oracle here and
    /// exercise the full surface without any outbound network call.
    pub fn with_oracle(
        config: AppConfig,
        bind_address: &str,
        oracle: Arc<dyn Oracle>,
    ) -> TextfoldResult<Self> {
        config.validate()?;

        let db = Arc::new(DbOperations::open(&config.storage_path)?);
        let pipeline = Arc::new(IngestionPipeline::new(
            Arc::clone(&db),
            oracle,
            config.oracle.clone(),
        ));
        let state = web::Data::new(AppState {
            db,
            pipeline,
            config,
        });

        Ok(Self {
            state,
            bind_address: bind_address.to_string(),
        })
    }

    /// Run the HTTP server until it is shut down.
    ///
    /// # Errors
    ///
    /// Returns a `TextfoldError` if the bind address is unavailable or the
    /// server fails while running.
    pub async fn run(&self) -> TextfoldResult<()> {
        info!("HTTP server running on {}", self.bind_address);

        let state = self.state.clone();
        let server = ActixHttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(state.clone())
                .configure(configure_routes)
        })
        .bind(&self.bind_address)
        .map_err(|e| TextfoldError::Config(format!("Failed to bind HTTP server: {}", e)))?
        .run();

        server
            .await
            .map_err(|e| TextfoldError::Config(format!("HTTP server error: {}", e)))?;

        Ok(())
    }
}

/// Liveness endpoint.
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "online",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Registers every route of the API.
///
/// Shared between [`TextfoldHttpServer::run`] and the integration tests so
/// the surface under test is exactly the one served.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health_check)).service(
        web::scope("/api")
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth_routes::register))
                    .route("/login", web::post().to(auth_routes::login)),
            )
            .service(
                web::scope("/analyze")
                    .route("", web::post().to(ingestion_routes::analyze_text))
                    .route("/history", web::get().to(ingestion_routes::get_history))
                    .route(
                        "/history/{id}",
                        web::put().to(ingestion_routes::update_analysis),
                    )
                    .route(
                        "/history/{id}",
                        web::delete().to(ingestion_routes::delete_analysis),
                    )
                    .route("/batch", web::post().to(ingestion_routes::batch_analyze))
                    .route(
                        "/export/excel",
                        web::get().to(ingestion_routes::export_excel),
                    ),
            ),
    );
}
