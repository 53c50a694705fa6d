use ragchat::client::ChatClient;
use ragchat::config::ClientConfig;
use ragchat::stream::ChatEvent;
use ragchat::turn::ConversationTurn;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use futures::StreamExt;
use std::io::Write;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    // Logs go to stderr so stdout stays clean for the answer itself
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let question = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if question.is_empty() {
        return Err(eyre!("usage: ragchat <question>"));
    }

    let client = ChatClient::new(ClientConfig::from_env());
    let mut events = client.ask(&question).await?;
    let mut turn = ConversationTurn::assistant();

    while let Some(event) = events.next().await {
        let event = event?;
        if let ChatEvent::Text { text: Some(delta) } = &event {
            print!("{delta}");
            std::io::stdout().flush()?;
        }
        turn.apply(&event);
    }
    println!();

    if !turn.sources.is_empty() {
        println!("\nSources:");
        for source in &turn.sources {
            println!("  {} ({})", source.filename, source.heading);
        }
    }

    if !turn.follow_ups.is_empty() {
        println!("\nFollow-up questions:");
        for question in &turn.follow_ups {
            println!("  {question}");
        }
    }

    Ok(())
}
