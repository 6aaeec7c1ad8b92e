/*!
 * Tests for provider request shapes, response parsing and transport errors
 */

use typeshift::errors::ProviderError;
use typeshift::providers::Provider;
use typeshift::providers::anthropic::{Anthropic, AnthropicRequest, AnthropicResponse};
use typeshift::providers::gemini::{Gemini, GeminiRequest, GeminiResponse};
use typeshift::providers::ollama::{GenerationRequest, GenerationResponse, Ollama};

#[test]
fn test_anthropicRequest_shouldCarrySystemAndTemperature() {
    let request = AnthropicRequest::new("claude-3-haiku-20240307", 256)
        .system("Translate from Hebrew to English")
        .temperature(0.1)
        .add_message("user", "שלום");
    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(json["system"], "Translate from Hebrew to English");
    assert_eq!(json["max_tokens"], 256);
    assert_eq!(json["messages"][0]["content"], "שלום");
}

#[test]
fn test_anthropicExtractText_shouldSkipNonTextBlocks() {
    let json = r#"{
        "content": [
            { "type": "text", "text": "Hello" },
            { "type": "tool_use", "id": "x" },
            { "type": "text", "text": "!" }
        ],
        "usage": { "input_tokens": 3, "output_tokens": 2 }
    }"#;
    let response: AnthropicResponse = serde_json::from_str(json).unwrap();
    assert_eq!(Anthropic::extract_text(&response), "Hello!");
}

#[test]
fn test_geminiRequest_withTokenCap_shouldSerializeCamelCase() {
    let request = GeminiRequest::new("gemini-2.0-flash", "hola").max_output_tokens(64);
    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(json["generationConfig"]["maxOutputTokens"], 64);
    assert!(json["generationConfig"].get("temperature").is_none());
    assert!(json.get("systemInstruction").is_none());
}

#[test]
fn test_geminiExtractText_withNoCandidates_shouldBeEmpty() {
    let response: GeminiResponse = serde_json::from_str(r#"{ "candidates": [] }"#).unwrap();
    assert_eq!(Gemini::extract_text(&response), "");
}

#[test]
fn test_ollamaRequest_shouldDisableStreaming() {
    let request = GenerationRequest::new("llama3", "hola").system("Translate").num_predict(128);
    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(json["stream"], false);
    assert_eq!(json["options"]["num_predict"], 128);
    assert_eq!(json["system"], "Translate");
}

#[test]
fn test_ollamaExtractText_shouldReturnResponseField() {
    let response: GenerationResponse =
        serde_json::from_str(r#"{ "model": "llama3", "response": "Hello", "done": true }"#).unwrap();
    assert_eq!(Ollama::extract_text(&response), "Hello");
}

#[tokio::test]
async fn test_ollamaComplete_withNothingListening_shouldReportConnectionError() {
    let client = Ollama::from_url("http://127.0.0.1:9", 2);
    let result = client.complete(GenerationRequest::new("llama3", "hola")).await;
    assert!(matches!(result, Err(ProviderError::ConnectionError(_))));
}
