//! CLI command implementations.

pub mod init;
pub mod play;
pub mod status;

use anyhow::Result;
use twostep_client::{
    initial_color, RemoteStateStore, SyncController, WeatherApiClient, WeatherError,
};

use crate::config::{CliContext, SavedSession};

/// Build a controller and bring it up to date.
///
/// Seeds the color from the weather (when enabled), then reconciles with a
/// saved session if there is one. Failures here are reported, not fatal.
pub async fn start<S: RemoteStateStore + 'static>(
    store: S,
    ctx: &CliContext,
) -> SyncController<S> {
    let mut controller = SyncController::new(store);

    if ctx.config.weather.enabled {
        match WeatherApiClient::new(&ctx.config.weather) {
            Ok(client) => controller.seed_color(initial_color(&client).await),
            Err(WeatherError::MissingApiKey) => {
                tracing::warn!("Weather lookup enabled but no api_key set")
            }
            Err(e) => tracing::warn!("Weather lookup unavailable: {}", e),
        }
    }

    if ctx.persist_session {
        if let Some(token) = SavedSession::load(&ctx.data_dir, &ctx.config.server.base_url).await
        {
            controller = controller.with_session(token);
        }
    }

    if let Err(e) = controller.reconcile().await {
        tracing::warn!("Could not restore session: {}", e);
    }

    controller
}

/// Save or forget the session credential, then wait for pending writes.
pub async fn finish<S: RemoteStateStore + 'static>(
    controller: &mut SyncController<S>,
    ctx: &CliContext,
) -> Result<()> {
    controller.flush().await;

    if !ctx.persist_session {
        return Ok(());
    }
    match controller.session_token() {
        Some(token) => {
            SavedSession::save(&ctx.data_dir, &ctx.config.server.base_url, token).await
        }
        None => SavedSession::clear(&ctx.data_dir).await,
    }
}
