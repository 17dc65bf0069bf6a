use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use blog_service::cache::FeedCache;
use blog_service::handlers::{self, SharedFeedCache};
use blog_service::middleware::{IdentityMiddleware, RequireAuth};
use redis::aio::ConnectionManager;
use sqlx::postgres::PgPoolOptions;
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn health_summary(pool: web::Data<sqlx::PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "blog-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "blog-service"
        })),
    }
}

/// Blog Service
///
/// A small publishing backend: posts, groups, comments, follows, and the
/// feed surfaces over them.
///
/// # Routes
///
/// - `/api/v1/feed` - global and followed-authors feeds
/// - `/api/v1/groups/{slug}` - group feed
/// - `/api/v1/profiles/{username}` - author feed, follow/unfollow
/// - `/api/v1/posts/*` - post detail, creation, editing, comments
///
/// # Architecture
///
/// - HTTP handlers with request/response conversion
/// - PostgreSQL for persistent storage
/// - Redis for the global listing cache (optional; the service degrades to
///   uncached recomputation when Redis is unreachable)
#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match blog_service::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting blog-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Initialize database connection pool
    let db_pool = match PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = sqlx::migrate!("./migrations").run(&db_pool).await {
        tracing::error!("Migration run failed: {}", e);
        eprintln!("ERROR: Failed to run migrations: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Connected to database, schema is current");

    // Initialize the Redis-backed listing cache; the service runs uncached
    // when Redis is unreachable.
    let feed_cache: SharedFeedCache = match redis::Client::open(config.cache.url.as_str()) {
        Ok(client) => match ConnectionManager::new(client).await {
            Ok(manager) => Some(Arc::new(FeedCache::new(
                manager,
                config.feed.cache_ttl_secs,
                config.feed.cached_pages,
            ))),
            Err(e) => {
                tracing::warn!("Redis unavailable, listing cache disabled: {}", e);
                None
            }
        },
        Err(e) => {
            tracing::warn!("Invalid Redis URL, listing cache disabled: {}", e);
            None
        }
    };

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let config_data = web::Data::new(config.clone());
    let pool_data = web::Data::new(db_pool);
    let cache_data = web::Data::new(feed_cache);

    HttpServer::new(move || {
        // Build CORS configuration
        let mut cors = Cors::default();
        for origin in config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(config_data.clone())
            .app_data(pool_data.clone())
            .app_data(cache_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route(
                "/metrics",
                web::get().to(blog_service::metrics::serve_metrics),
            )
            .route("/api/v1/health", web::get().to(health_summary))
            .service(
                web::scope("/api/v1")
                    .wrap(IdentityMiddleware::new(config.auth.jwt_secret.clone()))
                    // Public listing surfaces; a present identity only
                    // enriches them (follow flags).
                    .route("/feed", web::get().to(handlers::feed::get_global_feed))
                    .route(
                        "/groups/{slug}",
                        web::get().to(handlers::groups::get_group_feed),
                    )
                    .route(
                        "/profiles/{username}",
                        web::get().to(handlers::profiles::get_profile),
                    )
                    .route(
                        "/posts/{post_id}",
                        web::get().to(handlers::posts::get_post),
                    )
                    // Mutating surfaces sit behind the auth gate.
                    .service(
                        web::scope("")
                            .wrap(RequireAuth::new(config.auth.login_url.clone()))
                            .route(
                                "/feed/following",
                                web::get().to(handlers::feed::get_following_feed),
                            )
                            .route("/posts", web::post().to(handlers::posts::create_post))
                            .service(
                                web::resource("/posts/{post_id}/edit")
                                    .route(web::get().to(handlers::posts::get_post_edit))
                                    .route(web::post().to(handlers::posts::submit_post_edit)),
                            )
                            .route(
                                "/posts/{post_id}/comments",
                                web::post().to(handlers::comments::create_comment),
                            )
                            .route(
                                "/profiles/{username}/follow",
                                web::post().to(handlers::profiles::follow_author),
                            )
                            .route(
                                "/profiles/{username}/unfollow",
                                web::post().to(handlers::profiles::unfollow_author),
                            ),
                    ),
            )
    })
    .bind(&bind_address)?
    .run()
    .await
}
