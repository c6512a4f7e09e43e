use gemini_resilient_http::GeminiClient;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = GeminiClient::from_env().map_err(anyhow::Error::msg)?;
    println!("Chatting with {}. Empty line skips, Ctrl-D quits.", client.model());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let prompt = line.trim();
        if prompt.is_empty() {
            continue;
        }
        println!("you: {prompt}");
        println!("ai:  {}", client.reply(prompt).await);
    }

    Ok(())
}
