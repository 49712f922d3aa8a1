use items_service::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    init_tracing(&config)?;

    let state = AppState::from_config(config.clone());
    tracing::info!(items = state.store().read().await.len(), "Item store ready");

    Server::new(config).serve(router(state)).await
}
