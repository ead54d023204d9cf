use talent_server::{Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. .env, work dir, logging
    let config = setup_environment()?;

    print_banner();
    tracing::info!(environment = %config.environment, "Talent server starting...");

    // 2. Open (and maybe seed) the job store
    let state = ServerState::initialize(&config)?;

    // 3. Serve until Ctrl-C
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
