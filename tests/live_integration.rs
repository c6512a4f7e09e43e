use gemini_resilient_http::{CallerOptions, GeminiClient, Outcome};

#[tokio::test]
async fn live_generate_returns_text() {
    let client = match GeminiClient::from_env() {
        Ok(client) => client,
        Err(_) => {
            eprintln!("skipping live test: GEMINI_API_KEY not set");
            return;
        }
    };
    let client = client.with_options(CallerOptions {
        max_retries: 2,
        ..CallerOptions::default()
    });

    let outcome = client
        .generate("Reply with the single word: pong")
        .await;

    match outcome {
        Outcome::Success(text) => assert!(!text.trim().is_empty()),
        Outcome::Failure { kind, message } => {
            panic!("live call failed ({kind:?}): {message}")
        }
    }
}
