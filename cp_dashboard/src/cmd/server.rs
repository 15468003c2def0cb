use crate::modules::{
    handlers::{contest::list_contests, liveness, problem::search_problems, profile::get_user},
    state::AppState,
};
use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing, Router, Server,
};
use clap::Args;
use std::{env, net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

#[derive(Debug, Args)]
pub struct ServerArgs {
    #[arg(long)]
    port: Option<u16>,
}

pub async fn run(args: ServerArgs) -> Result<()> {
    let state = AppState::from_env().with_context(|| {
        let message = "couldn't initialize upstream clients";
        tracing::error!(message);
        message
    })?;
    let origin = env::var("FRONTEND_ORIGIN_URL").ok();

    let app = create_router(state, origin);
    let port = match args.port {
        Some(port) => port,
        None => {
            tracing::warn!("API server will be launched at default port number 8000");
            8000u16
        }
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server start at port {}", port);
    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    Ok(())
}

fn cors_layer(origin: Option<String>) -> CorsLayer {
    let allow_origin = match origin.map(|origin| HeaderValue::from_str(&origin)) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(e)) => {
            tracing::warn!("invalid FRONTEND_ORIGIN_URL, allowing any origin: {}", e);
            AllowOrigin::from(Any)
        }
        None => AllowOrigin::from(Any),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET])
        .allow_headers([CONTENT_TYPE])
}

pub fn create_router(state: AppState, origin: Option<String>) -> Router {
    Router::new()
        .route("/api/problems", routing::get(search_problems))
        .route("/api/contests", routing::get(list_contests))
        .route("/api/liveness", routing::get(liveness))
        .route("/api/:platform/getUser", routing::get(get_user))
        .layer(Extension(Arc::new(state)))
        .layer(cors_layer(origin))
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, starting graceful shutdown.");
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::modules::handlers::fake;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn liveness_is_ok() {
        let app = create_router(fake::state(None), None);
        let res = app
            .oneshot(
                Request::builder()
                    .uri("/api/liveness")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let app = create_router(fake::state(None), None);
        let res = app
            .oneshot(Request::builder().uri("/api/users").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn configured_origin_is_echoed() {
        let app = create_router(
            fake::state(None),
            Some(String::from("http://localhost:3000")),
        );
        let res = app
            .oneshot(
                Request::builder()
                    .uri("/api/liveness")
                    .header("Origin", "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            res.headers()["access-control-allow-origin"],
            "http://localhost:3000"
        );
    }

    #[tokio::test]
    async fn any_origin_without_configuration() {
        let app = create_router(fake::state(None), None);
        let res = app
            .oneshot(
                Request::builder()
                    .uri("/api/liveness")
                    .header("Origin", "https://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.headers()["access-control-allow-origin"], "*");
    }
}
