//! Lists the Gemini models visible to `GOOGLE_API_KEY` and makes one test call.

use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use optimizer_api::config::{google_api_key, load_dotenv};
use optimizer_api::diagnostics;
use optimizer_api::llm_client::{GeminiClient, DEFAULT_API_BASE, DEFAULT_MODEL};

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let api_key = match google_api_key() {
        Ok(key) => key,
        Err(_) => {
            println!("Error: GOOGLE_API_KEY not found in .env file.");
            return ExitCode::FAILURE;
        }
    };

    let api_base = std::env::var("GEMINI_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

    let result = match GeminiClient::new(api_key, &api_base, DEFAULT_MODEL) {
        Ok(client) => diagnostics::run(&client, &mut std::io::stdout()).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = diagnostics::report_failure(&mut std::io::stdout(), &e);
            ExitCode::FAILURE
        }
    }
}
