use crate::args::ServeArgs;
use crate::commands::Out;
use crate::http::{self, AppState};
use crate::{Config, Result};
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

/// Runs the HTTP service until it receives Ctrl-C.
pub async fn serve(config: Config, args: &ServeArgs) -> Result<Out<()>> {
    let bind = args.bind().unwrap_or(config.bind_address()).to_string();
    let service = config.service().await?;
    info!(
        "Using the {} store, default window {}",
        config.store(),
        service.default_window()
    );

    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Unable to listen on {bind}"))?;
    http::serve(listener, AppState::new(service, config.trailing_months())).await?;
    Ok("The rewards service has stopped".into())
}
