use super::*;
use crate::features::Sentiment;
use serial_test::serial;
use std::env;
use std::path::PathBuf;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_credence_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("CREDENCE_CLASSIFIER_PATH");
        env::remove_var("CREDENCE_SENTIMENT_PATH");
        env::remove_var("CREDENCE_NER_PATH");
        env::remove_var("CREDENCE_CLASSIFIER_LABELS");
        env::remove_var("CREDENCE_SENTIMENT_LABELS");
        env::remove_var("CREDENCE_MAX_SEQ_LEN");
        env::remove_var("CREDENCE_LLM_API_BASE");
        env::remove_var("CREDENCE_LLM_API_KEY");
        env::remove_var("OPENROUTER_API_KEY");
        env::remove_var("CREDENCE_LLM_MODEL");
        env::remove_var("CREDENCE_LLM_TIMEOUT_SECS");
        env::remove_var("CREDENCE_LLM_TEMPERATURE");
        env::remove_var("CREDENCE_LLM_MAX_TOKENS");
        env::remove_var("CREDENCE_SHORT_TEXT_WORDS");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert!(config.classifier_path.is_none());
    assert!(config.sentiment_path.is_none());
    assert!(config.ner_path.is_none());
    assert_eq!(config.classifier_labels, LabelOrder::default());
    assert_eq!(config.sentiment_labels.label_for(2), Sentiment::Neutral);
    assert_eq!(config.max_seq_len, 512);
    assert_eq!(config.llm_api_base, "https://openrouter.ai/api/v1");
    assert!(config.llm_api_key.is_none());
    assert_eq!(config.llm_timeout_secs, 30);
    assert_eq!(config.short_text_words, 30);
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_credence_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert!(config.classifier_path.is_none());
    assert!(config.llm_api_key.is_none());
    assert_eq!(config.llm_max_tokens, 500);
}

#[test]
#[serial]
fn test_from_env_custom_paths() {
    clear_credence_env();

    with_env_vars(
        &[
            ("CREDENCE_CLASSIFIER_PATH", "/models/arabert-fake-news"),
            ("CREDENCE_SENTIMENT_PATH", "/models/arabert-sentiment"),
            ("CREDENCE_NER_PATH", "  "),
        ],
        || {
            let config = Config::from_env().expect("should parse");

            assert_eq!(
                config.classifier_path,
                Some(PathBuf::from("/models/arabert-fake-news"))
            );
            assert_eq!(
                config.sentiment_path,
                Some(PathBuf::from("/models/arabert-sentiment"))
            );
            assert!(config.ner_path.is_none());
        },
    );
}

#[test]
#[serial]
fn test_from_env_label_orders() {
    clear_credence_env();

    with_env_vars(
        &[
            ("CREDENCE_CLASSIFIER_LABELS", "real, fake"),
            ("CREDENCE_SENTIMENT_LABELS", "positive,negative"),
        ],
        || {
            let config = Config::from_env().expect("should parse");

            assert_eq!(config.classifier_labels.real_index, 0);
            assert_eq!(config.classifier_labels.fake_index, 1);
            assert_eq!(config.sentiment_labels.len(), 2);
            assert_eq!(config.sentiment_labels.label_for(0), Sentiment::Positive);
            assert_eq!(config.sentiment_labels.label_for(2), Sentiment::Unknown);
        },
    );
}

#[test]
#[serial]
fn test_invalid_classifier_labels() {
    clear_credence_env();

    with_env_vars(&[("CREDENCE_CLASSIFIER_LABELS", "true,false")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLabels { .. }));
        assert!(err.to_string().contains("CREDENCE_CLASSIFIER_LABELS"));
    });
}

#[test]
#[serial]
fn test_invalid_sentiment_labels() {
    clear_credence_env();

    with_env_vars(&[("CREDENCE_SENTIMENT_LABELS", "happy,sad")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLabels { .. }));
    });
}

#[test]
#[serial]
fn test_from_env_generation_settings() {
    clear_credence_env();

    with_env_vars(
        &[
            ("CREDENCE_LLM_API_BASE", "http://localhost:11434/v1"),
            ("CREDENCE_LLM_API_KEY", "sk-local"),
            ("CREDENCE_LLM_MODEL", "qwen2.5:7b"),
            ("CREDENCE_LLM_TIMEOUT_SECS", "12"),
            ("CREDENCE_LLM_TEMPERATURE", "0.2"),
            ("CREDENCE_LLM_MAX_TOKENS", "300"),
            ("CREDENCE_SHORT_TEXT_WORDS", "20"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            let generation = config.generation_config();

            assert_eq!(generation.api_base, "http://localhost:11434/v1");
            assert_eq!(generation.api_key.as_deref(), Some("sk-local"));
            assert_eq!(generation.model, "qwen2.5:7b");
            assert_eq!(generation.timeout, Duration::from_secs(12));
            assert_eq!(generation.temperature, 0.2);
            assert_eq!(generation.max_tokens, 300);
            assert!(generation.is_configured());
            assert_eq!(config.fallback_config().short_text_words, 20);
        },
    );
}

#[test]
#[serial]
fn test_api_key_falls_back_to_openrouter_var() {
    clear_credence_env();

    with_env_vars(&[("OPENROUTER_API_KEY", "sk-or-123")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.llm_api_key.as_deref(), Some("sk-or-123"));
    });

    with_env_vars(
        &[
            ("OPENROUTER_API_KEY", "sk-or-123"),
            ("CREDENCE_LLM_API_KEY", "sk-credence"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.llm_api_key.as_deref(), Some("sk-credence"));
        },
    );
}

#[test]
#[serial]
fn test_invalid_timeout_not_number() {
    clear_credence_env();

    with_env_vars(&[("CREDENCE_LLM_TIMEOUT_SECS", "soon")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: "CREDENCE_LLM_TIMEOUT_SECS",
                ..
            }
        ));
        assert!(err.to_string().contains("soon"));
    });
}

#[test]
#[serial]
fn test_invalid_short_text_words() {
    clear_credence_env();

    with_env_vars(&[("CREDENCE_SHORT_TEXT_WORDS", "-4")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    });
}

#[test]
fn test_classifier_config_derivation() {
    let config = Config {
        classifier_path: Some(PathBuf::from("/models/clf")),
        classifier_labels: LabelOrder {
            fake_index: 1,
            real_index: 0,
        },
        max_seq_len: 256,
        ..Default::default()
    };

    let classifier = config.classifier_config();
    assert_eq!(classifier.model_path, Some(PathBuf::from("/models/clf")));
    assert_eq!(classifier.labels.fake_index, 1);
    assert_eq!(classifier.max_seq_len, 256);
}

#[test]
fn test_validate_success_with_defaults() {
    let config = Config::default();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_nonexistent_model_path() {
    let config = Config {
        classifier_path: Some(PathBuf::from("/nonexistent/path/to/classifier")),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::PathNotFound { .. }));
}

#[test]
fn test_validate_ner_path_is_file() {
    let config = Config {
        ner_path: Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml")),
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::NotADirectory { .. }));
}

#[test]
fn test_validate_success_with_existing_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        classifier_path: Some(dir.path().to_path_buf()),
        sentiment_path: Some(dir.path().to_path_buf()),
        ..Default::default()
    };

    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_bad_generation_settings() {
    let config = Config {
        llm_timeout_secs: 0,
        ..Default::default()
    };
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::InvalidGeneration { .. }
    ));

    let config = Config {
        llm_temperature: 3.5,
        ..Default::default()
    };
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::InvalidGeneration { .. }
    ));
}

#[test]
fn test_validate_rejects_zero_seq_len() {
    let config = Config {
        max_seq_len: 0,
        ..Default::default()
    };
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::InvalidValue { .. }
    ));
}

#[test]
fn test_debug_redacts_api_key() {
    let config = Config {
        llm_api_key: Some("sk-very-secret".to_string()),
        ..Default::default()
    };

    let debug = format!("{:?}", config);
    assert!(!debug.contains("sk-very-secret"));
    assert!(debug.contains("<redacted>"));
}

#[test]
fn test_error_messages_are_descriptive() {
    let err = ConfigError::PathNotFound {
        path: PathBuf::from("/some/path"),
    };
    assert!(err.to_string().contains("/some/path"));

    let err = ConfigError::InvalidValue {
        name: "CREDENCE_LLM_MAX_TOKENS",
        value: "lots".to_string(),
        reason: "invalid digit found in string".to_string(),
    };
    assert!(err.to_string().contains("CREDENCE_LLM_MAX_TOKENS"));
    assert!(err.to_string().contains("lots"));
}
