/*
 * Responsibility
 * - tracing / panic hook の初期化 (一度だけ)
 * - Config 読み込み → DB 接続 → schema / config / store の適用 → service 生成
 * - axum app 組み立て (fallback → router::Router, tower layers)
 * - axum::serve() で起動, graceful shutdown 後に DB pool を閉じる
 *
 * どの起動ステップの失敗も listener を開く前にプロセスを落とす。
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context as _, Result};
use argon2::password_hash::SaltString;
use axum::extract::{Request, State};
use axum::response::Response;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::api::handlers::stores::{DEFAULT_LOCALE, LOCALE_PATH};
use crate::config::{AdminBootstrap, Config};
use crate::middleware;
use crate::repos::{admin_user_repo, schema};
use crate::services::auth::credentials::hash_password;
use crate::services::auth::{build_credential_verifier, build_token_service};
use crate::services::config::{ConfigGetter, ConfigManager, ConfigScope};
use crate::services::store::StoreManager;
use crate::state::{AppState, Services};

fn init_tracing() {
    // RUST_LOG=info,store_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: fail fast. production: default hook, keep serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("load configuration")?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(?config, "starting store-api");

    let db = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")?;

    schema::init(&db).await.context("initialize schema")?;

    let state = build_state(&config, &db).await?;
    let app = build_app(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("bind {}", config.addr))?;
    tracing::info!(addr = %config.addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve")?;

    db.close().await;
    tracing::info!("shutdown complete");
    Ok(())
}

async fn build_state(config: &Config, db: &PgPool) -> Result<AppState> {
    let config_data = ConfigManager::load(db)
        .await
        .context("load core config data")?;
    let default_locale = config_data.string(LOCALE_PATH, ConfigScope::Default);
    tracing::info!(
        locale = default_locale.as_deref().unwrap_or(DEFAULT_LOCALE),
        "default locale"
    );

    let stores = StoreManager::load(db)
        .await
        .context("load store hierarchy")?;
    stores
        .resolve(&config.store_scope)
        .context("resolve STORE_SCOPE")?;

    if let Some(admin) = &config.admin {
        bootstrap_admin(db, admin).await?;
    }

    let tokens = build_token_service(&config.token)
        .await
        .context("build token service")?;

    let state = AppState::new(Services {
        tokens,
        credentials: build_credential_verifier(db.clone()),
        stores: Arc::new(stores),
        config: Arc::new(config_data),
        scope: config.store_scope.clone(),
    })
    .context("register routes")?;

    Ok(state)
}

async fn bootstrap_admin(db: &PgPool, admin: &AdminBootstrap) -> Result<()> {
    // 16 random bytes from the v4 generator.
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| anyhow::anyhow!("encode salt: {e}"))?;
    let hash = hash_password(&admin.password, &salt).context("hash admin password")?;

    let user_id = admin_user_repo::upsert(db, &admin.username, &hash)
        .await
        .context("upsert admin user")?;
    tracing::info!(user_id, username = %admin.username, "admin user bootstrapped");
    Ok(())
}

/// Every request goes through here; axum does no routing of its own.
async fn dispatch(State(state): State<AppState>, req: Request) -> Response {
    state.router.dispatch(&state.root, req).await
}

pub fn build_app(state: AppState, config: &Config) -> axum::Router {
    let app = axum::Router::new().fallback(dispatch).with_state(state);

    let app = middleware::security_headers::apply(app);
    let app = middleware::cors::apply(app, config);
    middleware::http::apply(app)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
