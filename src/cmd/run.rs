//! `formrelay run` — start the relay server.
//!
//! Validates the upstream settings, builds the shared state and router,
//! and serves until Ctrl+C or SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::cli::RunArgs;
use crate::config::{self, UpstreamConfig};
use crate::error::FormRelayError;
use crate::logging;
use crate::server::{self, AppState};

pub async fn execute(args: RunArgs) -> Result<(), FormRelayError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    #[cfg(feature = "sentry-integration")]
    let _sentry_guard = args
        .sentry_dsn
        .as_ref()
        .map(|dsn| crate::sentry_integration::init(dsn, args.sentry_environment.as_deref()));

    let upstream = UpstreamConfig::new(args.upstream);
    config::validate(&upstream, &args.path)
        .map_err(|errors| FormRelayError::ConfigValidation { errors })?;

    let state = Arc::new(AppState::new(
        upstream,
        server::build_http_client()?,
        args.max_body,
    ));
    let upstream_template = state.upstream.base_template.clone();

    let router = server::build_router(state, &args.path);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        path = %args.path,
        upstream = %upstream_template,
        max_body = args.max_body,
        "formrelay started"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!("formrelay stopped");
    Ok(())
}
