/*!
 * Tests for configuration loading, defaults and validation
 */

use typeshift::app_config::{Config, LogLevel, TranslationProvider};
use typeshift::formatting::DirectionPolicy;

#[test]
fn test_config_fromPartialJson_shouldFillDefaults() {
    let json = r#"{
        "source_language": "he",
        "target_language": "en",
        "translation": { "provider": "ollama", "available_providers": [] }
    }"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.translation.provider, TranslationProvider::Ollama);
    assert_eq!(config.translation.common.rate_limit_delay_ms, 200);
    assert_eq!(config.translation.common.retry_delay_ms, 300);
    assert!(config.formatting.fine_grained_capture);
    assert!(config.formatting.corrective_pass);
    assert_eq!(config.formatting.settle_delay_ms, 200);
    assert_eq!(config.formatting.corrective_delay_ms, 100);
    assert_eq!(config.formatting.direction_policy, DirectionPolicy::Auto);
    assert_eq!(config.translation.get_endpoint(), "http://localhost:11434");
}

#[test]
fn test_directionPolicy_shouldUseKebabCase() {
    let json = r#"{
        "source_language": "ar",
        "target_language": "en",
        "translation": { "provider": "gemini", "available_providers": [] },
        "formatting": { "direction_policy": "force-left-to-right" }
    }"#;
    let config: Config = serde_json::from_str(json).unwrap();
    assert_eq!(config.formatting.direction_policy, DirectionPolicy::ForceLeftToRight);
}

#[test]
fn test_validate_withHostedProviderAndNoKey_shouldFail() {
    let config = Config::default();
    assert!(config.translation.provider.requires_api_key());
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withKeyOrLocalProvider_shouldPass() {
    let mut config = Config::default();
    config.translation.set_api_key("secret");
    assert!(config.validate().is_ok());

    let mut local = Config::default();
    local.translation.provider = TranslationProvider::Ollama;
    assert!(local.validate().is_ok());
}

#[test]
fn test_validate_withLanguageNames_shouldPass() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;
    config.source_language = "Arabic".to_string();
    config.target_language = "English".to_string();
    assert!(config.validate().is_ok());

    config.target_language = "Elvish".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withTemperatureOutOfRange_shouldFail() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;
    config.translation.common.temperature = 3.5;
    assert!(config.validate().is_err());
}

#[test]
fn test_setModel_shouldOnlyAffectActiveProvider() {
    let mut config = Config::default();
    config.translation.set_model("gemini-1.5-pro");
    assert_eq!(config.translation.get_model(), "gemini-1.5-pro");

    config.translation.provider = TranslationProvider::Anthropic;
    assert_eq!(config.translation.get_model(), "claude-3-haiku-20240307");
}

#[test]
fn test_systemPromptFor_shouldUseLanguageNames() {
    let config = Config::default();
    let prompt = config.translation.system_prompt_for("ar", "en");
    assert!(prompt.contains("Arabic"));
    assert!(prompt.contains("English"));
    assert!(!prompt.contains("{source_language}"));
}

#[test]
fn test_logLevel_fromStr_shouldAcceptAliases() {
    assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
    assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
    assert!("loud".parse::<LogLevel>().is_err());
}

#[test]
fn test_provider_fromStr_shouldRoundTripDisplay() {
    for provider in [TranslationProvider::Gemini, TranslationProvider::Anthropic, TranslationProvider::Ollama] {
        let parsed: TranslationProvider = provider.to_lowercase_string().parse().unwrap();
        assert_eq!(parsed, provider);
    }
}
