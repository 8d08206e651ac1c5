//! Config tests.

use crate::config::bot_config::BotConfig;
use crate::config::DEFAULT_PORT;
use serial_test::serial;
use std::env;

const ALL_VARS: &[&str] = &[
    "port",
    "PORT",
    "LOG_FILE",
    "MicrosoftAppId",
    "MicrosoftAppPassword",
    "QnAKnowledgebaseId",
    "QnAEndpointKey",
    "QnAAuthKey",
    "QnAEndpointHostName",
    "DefaultAnswer",
];

fn clear_env() {
    for name in ALL_VARS {
        env::remove_var(name);
    }
}

fn set_qna_env() {
    env::set_var("QnAKnowledgebaseId", "kb-1");
    env::set_var("QnAEndpointKey", "endpoint-key");
    env::set_var("QnAEndpointHostName", "myqna.azurewebsites.net");
}

#[test]
#[serial]
fn test_load_config_with_defaults() {
    clear_env();
    set_qna_env();

    let config = BotConfig::load(None).unwrap();

    assert_eq!(config.port(), DEFAULT_PORT);
    assert_eq!(config.log_file(), "logs/qna-bot.log");
    assert!(config.base().app_id.is_none());
    assert!(config.base().app_password.is_none());
    assert_eq!(config.qna().knowledge_base_id, "kb-1");
    assert_eq!(config.qna().endpoint_key, "endpoint-key");
    assert!(config.qna().default_answer.is_none());
    assert!(config.validate().is_ok());

    let endpoint = config.qna().endpoint().unwrap();
    assert_eq!(endpoint.host, "https://myqna.azurewebsites.net/qnamaker");

    clear_env();
}

#[test]
#[serial]
fn test_load_config_with_custom_values() {
    clear_env();
    set_qna_env();
    env::set_var("PORT", "8080");
    env::set_var("LOG_FILE", "/tmp/qna.log");
    env::set_var("MicrosoftAppId", "app-id");
    env::set_var("MicrosoftAppPassword", "app-secret");
    env::set_var("DefaultAnswer", "Sorry, I don't know.");

    let config = BotConfig::load(None).unwrap();

    assert_eq!(config.port(), 8080);
    assert_eq!(config.log_file(), "/tmp/qna.log");
    assert_eq!(config.base().app_id.as_deref(), Some("app-id"));
    assert_eq!(
        config.qna().default_answer.as_deref(),
        Some("Sorry, I don't know.")
    );
    assert!(config.validate().is_ok());

    clear_env();
}

#[test]
#[serial]
fn test_lowercase_port_wins_and_override_wins_over_env() {
    clear_env();
    set_qna_env();
    env::set_var("port", "4000");
    env::set_var("PORT", "5000");

    assert_eq!(BotConfig::load(None).unwrap().port(), 4000);
    assert_eq!(BotConfig::load(Some(6000)).unwrap().port(), 6000);

    clear_env();
}

#[test]
#[serial]
fn test_blank_port_falls_back() {
    clear_env();
    set_qna_env();
    env::set_var("PORT", "");

    assert_eq!(BotConfig::load(None).unwrap().port(), DEFAULT_PORT);

    env::set_var("port", "  ");
    env::set_var("PORT", "5000");
    assert_eq!(BotConfig::load(None).unwrap().port(), 5000);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_port_fails_to_load() {
    clear_env();
    env::set_var("PORT", "not-a-port");

    assert!(BotConfig::load(None).is_err());

    clear_env();
}

#[test]
#[serial]
fn test_legacy_auth_key_fallback() {
    clear_env();
    set_qna_env();
    env::set_var("QnAEndpointKey", "");
    env::set_var("QnAAuthKey", "legacy-key");

    let config = BotConfig::load(None).unwrap();
    assert_eq!(config.qna().endpoint_key, "legacy-key");

    clear_env();
}

#[test]
#[serial]
fn test_validate_missing_qna_settings() {
    clear_env();

    let config = BotConfig::load(None).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("QnAKnowledgebaseId"));

    env::set_var("QnAKnowledgebaseId", "kb-1");
    let err = BotConfig::load(None).unwrap().validate().unwrap_err();
    assert!(err.to_string().contains("QnAEndpointKey"));

    env::set_var("QnAEndpointKey", "key");
    let err = BotConfig::load(None).unwrap().validate().unwrap_err();
    assert!(err.to_string().contains("QnAEndpointHostName"));

    clear_env();
}

#[test]
#[serial]
fn test_validate_app_id_requires_password() {
    clear_env();
    set_qna_env();
    env::set_var("MicrosoftAppId", "app-id");

    let config = BotConfig::load(None).unwrap();
    assert!(config.validate().is_err());

    clear_env();
}
