//! Connectivity check behind the `check-models` binary: lists the models the
//! API key can see, picks a text and a multimodal model, and makes one test
//! call with the text model.

use std::io::Write;

use anyhow::Result;
use tracing::info;

use crate::llm_client::catalog::{identify_models, ModelSelection};
use crate::llm_client::{ContentPart, GeminiClient, GenerativeModel};

pub const TEST_PROMPT: &str = "Hello, Gemini!";

const FAILURE_HINT: &str = "This might indicate a deeper API key permission issue or network problem \
                            preventing even model listing.";

#[derive(Debug, Default)]
pub struct DiagnosticReport {
    pub models_listed: usize,
    pub selection: ModelSelection,
    /// Reply to the test prompt, when a text model was found.
    pub test_reply: Option<String>,
}

pub async fn run(client: &GeminiClient, out: &mut impl Write) -> Result<DiagnosticReport> {
    writeln!(out, "API configured.")?;
    writeln!(out, "\n--- Listing ALL available Gemini models: ---")?;

    let models = client.list_models().await?;
    for m in &models {
        writeln!(
            out,
            "  - Name: {}, Display Name: {}, Methods: {:?}",
            m.name, m.display_name, m.supported_generation_methods
        )?;
    }

    let selection = identify_models(&models);

    match &selection.text_model {
        Some(name) => writeln!(out, "\nIdentified correct Gemini Pro model name: {name}")?,
        None => writeln!(
            out,
            "\nCould not find a suitable 'gemini-pro' equivalent that supports generateContent."
        )?,
    }
    match &selection.vision_model {
        Some(name) => writeln!(out, "Identified correct Gemini Pro Vision model name: {name}")?,
        None => writeln!(
            out,
            "Could not find a suitable 'gemini-pro-vision' equivalent that supports generateContent."
        )?,
    }

    let test_reply = match &selection.text_model {
        Some(name) => {
            writeln!(out, "\nAttempting a simple text generation using: {name}")?;
            let reply = client
                .with_model(name)
                .generate(&[ContentPart::text(TEST_PROMPT)])
                .await?;
            writeln!(out, "\n--- Text Model API Call Successful! ---")?;
            writeln!(out, "Response: {reply}")?;
            Some(reply)
        }
        None => {
            writeln!(out, "\nSkipping text model test as no suitable model was found.")?;
            None
        }
    };

    info!("Diagnostics finished: {} models listed", models.len());
    Ok(DiagnosticReport {
        models_listed: models.len(),
        selection,
        test_reply,
    })
}

/// Prints a failed run with the permissions/network hint.
pub fn report_failure(out: &mut impl Write, err: &anyhow::Error) -> std::io::Result<()> {
    writeln!(out, "\n--- An Unexpected Error Occurred ---")?;
    writeln!(out, "Error: {err}")?;
    writeln!(out, "\n{FAILURE_HINT}")
}
