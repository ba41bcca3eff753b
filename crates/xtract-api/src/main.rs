use xtract_core::Config;

// Use mimalloc as the global allocator for lower fragmentation under many
// concurrent multipart uploads, especially on musl-based container images.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (telemetry, conversion service, routes)
    let (_state, router) = xtract_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    xtract_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
