use realty_query_agent::{
    prompts, GeminiClient, MockPlacesLookup, MockPropertyStore, RealEstateAgent,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "realty_query_agent=info".into()),
        )
        .init();

    dotenv::dotenv().ok();

    // Template contract violations are programming errors; fail fast.
    prompts::validate_templates()?;

    let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_else(|_| {
        eprintln!("GEMINI_API_KEY not set; replies will degrade to the service-unavailable message.");
        String::new()
    });

    let gateway = Arc::new(GeminiClient::new(api_key));
    if let Err(e) = gateway.connect().await {
        warn!("Gateway warm-up failed, continuing degraded: {}", e);
    }

    let agent = RealEstateAgent::new(
        gateway,
        Arc::new(MockPropertyStore::new()),
        Arc::new(MockPlacesLookup::new()),
    );

    info!("Real-estate query agent ready");

    let sample_queries = [
        "Hello there!",
        "What's the price of Lotus Villa?",
        "Tell me about Green Valley Apartments.",
        "Where is Pearl Heights located?",
        "What schools are near Green Valley Apartments?",
        "Are there any parks near Sunset Bungalow?",
        "Is Kondapur a good place to live?",
        "Thanks for the info!",
        "gibberish query test",
    ];

    println!("=== SAMPLE QUERIES ===");
    for query in sample_queries {
        let reply = agent.handle_query(query).await;
        println!("Query: {}\nReply: {}\n---", query, reply);
    }

    println!("Ask your own questions (empty line to quit):");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"> ").await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let query = line.trim();
        if query.is_empty() {
            break;
        }
        let reply = agent.handle_query(query).await;
        println!("{}", reply);
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }

    Ok(())
}
