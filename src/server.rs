pub mod errors;
pub mod handlers;
pub mod responses;

use std::future::{Future, pending};
use std::time::Duration;

use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use color_eyre::eyre::{Context, Result};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::domain::blocklist::{BlocklistService, BlocklistStore};
use handlers::{blocklist, health::health_check};

/// State shared by every request handler.
#[derive(Debug)]
pub struct AppState<S: BlocklistStore> {
    pub blocklist: BlocklistService<S>,
    pub request_timeout: Duration,
}

impl<S: BlocklistStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            blocklist: self.blocklist.clone(),
            request_timeout: self.request_timeout,
        }
    }
}

/// Builds the application router over the given state.
pub fn router<S: BlocklistStore>(state: AppState<S>) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &'_ axum::extract::Request<_>| {
            let uri = request.uri().to_string();
            tracing::info_span!("request", method = %request.method(), uri)
        });

    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS]);

    Router::new()
        .route("/health", get(health_check::<S>))
        .route("/blocklist", get(blocklist::list_handler::<S>))
        .route("/block", post(blocklist::add_handler::<S>))
        .route(
            "/block/{ip}",
            get(blocklist::get_handler::<S>).delete(blocklist::remove_handler::<S>),
        )
        .layer(cors_layer)
        .layer(trace_layer)
        .with_state(state)
}

pub struct Server {
    router: Router,
    listener: TcpListener,
    port: u16,
}

impl Server {
    /// Binds the listener and prepares the router.
    ///
    /// Port `0` binds a random free port; [`port`](Self::port) reports the
    /// one actually bound.
    pub async fn new<S: BlocklistStore>(
        blocklist: BlocklistService<S>,
        config: &ServerConfig,
    ) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .wrap_err_with(|| format!("Binding TCP listener on {addr}"))?;
        let port = listener
            .local_addr()
            .context("Getting local address")?
            .port();

        let state = AppState {
            blocklist,
            request_timeout: config.request_timeout(),
        };

        Ok(Self {
            router: router(state),
            listener,
            port,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serves requests until the process is stopped.
    pub async fn run(self) -> Result<()> {
        self.run_until(pending::<()>()).await
    }

    /// Serves requests until `shutdown` resolves, then drains in-flight
    /// requests before returning.
    pub async fn run_until(self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
        tracing::info!("Server listening on http://{}", self.listener.local_addr()?);
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .context("Running HTTP server")?;
        tracing::info!("Server stopped");
        Ok(())
    }
}
