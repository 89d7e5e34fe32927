use realty_query_agent::{
    api::start_server, prompts, GeminiClient, MockPlacesLookup, MockPropertyStore, RealEstateAgent,
};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "realty_query_agent=info,tower_http=info".into()),
        )
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    // Template contract violations are programming errors; fail fast.
    prompts::validate_templates()?;

    let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_else(|_| {
        eprintln!("GEMINI_API_KEY not set in .env");
        eprintln!("The server will run, but every reply degrades to the service-unavailable message.");
        String::new()
    });

    let api_port: u16 = std::env::var("PORT")
        .or_else(|_| std::env::var("API_PORT"))
        .unwrap_or_else(|_| "8080".to_string())
        .parse()?;

    info!("Real-Estate Query Agent - API server");
    info!("Port: {}", api_port);

    let gateway = Arc::new(GeminiClient::new(api_key));
    if let Err(e) = gateway.connect().await {
        warn!("Gateway warm-up failed, continuing degraded: {}", e);
    }

    let agent = Arc::new(RealEstateAgent::new(
        gateway,
        Arc::new(MockPropertyStore::new()),
        Arc::new(MockPlacesLookup::new()),
    ));

    info!("Agent initialized, starting API server");

    start_server(agent, api_port).await?;

    Ok(())
}
