//! Model catalogue returned by `GET /v1beta/models` and the rules the
//! `check-models` utility uses to pick a text model and a multimodal model.

use serde::{Deserialize, Serialize};

const GENERATE_CONTENT: &str = "generateContent";

const TEXT_MODEL_NAMES: &[&str] = &["models/gemini-pro", "models/gemini-1.0-pro"];
const TEXT_MODEL_DISPLAY_NAME: &str = "Gemini 1.0 Pro";

const VISION_MODEL_NAMES: &[&str] = &[
    "models/gemini-pro-vision",
    "models/gemini-1.0-pro-vision",
    "models/gemini-1.5-flash",
];
const VISION_MODEL_DISPLAY_NAME: &str = "Gemini 1.0 Pro Vision";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    pub fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == GENERATE_CONTENT)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListModelsResponse {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
    pub next_page_token: Option<String>,
}

/// The models picked out of a listing. Either slot may be empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelSelection {
    pub text_model: Option<String>,
    pub vision_model: Option<String>,
}

/// Scans the listing in order; a later match replaces an earlier one.
pub fn identify_models(models: &[ModelInfo]) -> ModelSelection {
    let mut selection = ModelSelection::default();

    for model in models.iter().filter(|m| m.supports_generate_content()) {
        if TEXT_MODEL_NAMES.contains(&model.name.as_str())
            || model.display_name == TEXT_MODEL_DISPLAY_NAME
        {
            selection.text_model = Some(model.name.clone());
        }

        if VISION_MODEL_NAMES.contains(&model.name.as_str())
            || model.display_name == VISION_MODEL_DISPLAY_NAME
        {
            selection.vision_model = Some(model.name.clone());
        }
    }

    selection
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(name: &str, display: &str, methods: &[&str]) -> ModelInfo {
        ModelInfo {
            name: name.to_string(),
            display_name: display.to_string(),
            supported_generation_methods: methods.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn test_identifies_text_and_vision_models() {
        let models = vec![
            model("models/embedding-001", "Embedding 001", &["embedContent"]),
            model("models/gemini-1.0-pro", "Gemini 1.0 Pro", &["generateContent"]),
            model("models/gemini-1.5-flash", "Gemini 1.5 Flash", &["generateContent", "countTokens"]),
        ];
        let selection = identify_models(&models);
        assert_eq!(selection.text_model.as_deref(), Some("models/gemini-1.0-pro"));
        assert_eq!(selection.vision_model.as_deref(), Some("models/gemini-1.5-flash"));
    }

    #[test]
    fn test_ignores_models_without_generate_content() {
        let models = vec![model("models/gemini-pro", "Gemini Pro", &["countTokens"])];
        assert_eq!(identify_models(&models), ModelSelection::default());
    }

    #[test]
    fn test_matches_on_display_name() {
        let models = vec![model(
            "models/gemini-pro-001",
            "Gemini 1.0 Pro",
            &["generateContent"],
        )];
        let selection = identify_models(&models);
        assert_eq!(selection.text_model.as_deref(), Some("models/gemini-pro-001"));
        assert!(selection.vision_model.is_none());
    }

    #[test]
    fn test_later_match_wins() {
        let models = vec![
            model("models/gemini-pro-vision", "Gemini Pro Vision", &["generateContent"]),
            model("models/gemini-1.5-flash", "Gemini 1.5 Flash", &["generateContent"]),
        ];
        let selection = identify_models(&models);
        assert_eq!(selection.vision_model.as_deref(), Some("models/gemini-1.5-flash"));
    }

    #[test]
    fn test_listing_deserializes_camel_case() {
        let page: ListModelsResponse = serde_json::from_str(
            r#"{"models":[{"name":"models/gemini-1.5-flash","displayName":"Gemini 1.5 Flash",
                "supportedGenerationMethods":["generateContent"]}],"nextPageToken":"abc"}"#,
        )
        .unwrap();
        assert_eq!(page.models.len(), 1);
        assert!(page.models[0].supports_generate_content());
        assert_eq!(page.next_page_token.as_deref(), Some("abc"));
    }
}
