use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use shardgate_router::{PayloadSource, ProxyState, ReqwestHttpClient, RoutingState};

use crate::cmd::load_payload;
use crate::exit_codes;
use crate::output::print_error;
use crate::{OutputArgs, PayloadArgs, ServeArgs};

pub async fn serve_cmd(payload: &PayloadArgs, args: &ServeArgs, output: OutputArgs) -> i32 {
    // Tables are decoded on the first request, not here.
    let source = match load_payload(payload) {
        Ok(p) => PayloadSource::Inline(p),
        Err(e) => {
            print_error(output.format, output.quiet, &e);
            return exit_codes::VALIDATION_FAILED;
        }
    };

    let client = match ReqwestHttpClient::new(Duration::from_millis(args.timeout)) {
        Ok(c) => c,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let state = ProxyState::new(Arc::new(RoutingState::new(source)), Arc::new(client))
        .with_max_body_bytes(args.max_body_bytes);

    let listener = match tokio::net::TcpListener::bind(args.listen).await {
        Ok(l) => l,
        Err(e) => {
            print_error(
                output.format,
                output.quiet,
                &format!("failed to bind {}: {e}", args.listen),
            );
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let shutdown = shutdown_on(tokio::signal::ctrl_c());

    match shardgate_router::serve(listener, state, shutdown).await {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            print_error(output.format, output.quiet, &format!("server error: {e}"));
            exit_codes::RUNTIME_ERROR
        }
    }
}

/// Resolves once `signal` fires. A signal handler that cannot be installed
/// never resolves, so the server keeps running instead of stopping at once.
async fn shutdown_on(signal: impl Future<Output = std::io::Result<()>>) {
    match signal.await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
