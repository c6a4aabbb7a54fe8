//! Integration tests for skillify-core infrastructure

use skillify_core::{
    config_error, init_logging, process_ordered, retry_async, transport_error, validation_error,
    ErrorContext, LanguageTally, LogFormat, LoggingConfig, RetryConfig, SkillifyConfig,
    SkillifyError,
};
use std::sync::atomic::{AtomicUsize, Ordering};

#[tokio::test]
async fn test_error_handling() {
    let error = transport_error!("Connection reset", "test_component");

    match &error {
        SkillifyError::Transport {
            message,
            status,
            context,
            ..
        } => {
            assert_eq!(message, "Connection reset");
            assert!(status.is_none());
            assert_eq!(context.component, "test_component");
            assert!(!context.error_id.is_empty());
        }
        _ => panic!("Expected Transport error"),
    }

    // logging an error must not panic without a subscriber
    error.log();

    assert!(error.is_recoverable());

    let config_error = config_error!("Invalid config", "test");
    assert!(!config_error.is_recoverable());

    let validation = validation_error!("top_k must be positive", "ranking.top_k", "test");
    match validation {
        SkillifyError::Validation { field, .. } => {
            assert_eq!(field.as_deref(), Some("ranking.top_k"))
        }
        _ => panic!("Expected Validation error"),
    }

    let document = SkillifyError::DocumentState {
        path: "README.md".to_string(),
        message: "document does not exist".to_string(),
        context: ErrorContext::new("test").with_metadata("policy", "fail"),
    };
    assert!(!document.is_recoverable());
    assert_eq!(
        document.context().map(|c| c.metadata.get("policy").cloned()),
        Some(Some("fail".to_string()))
    );
}

#[tokio::test]
async fn test_logging_initialization() {
    let config = LoggingConfig {
        level: "debug".to_string(),
        format: LogFormat::Compact,
        filter_directives: vec!["skillify_core=debug".to_string()],
        ..Default::default()
    };

    // a global subscriber can only be set once per process, so a second
    // call reports an error instead of panicking
    let _ = init_logging(&config);
    assert!(init_logging(&config).is_err());
}

#[tokio::test]
async fn test_logging_rejects_file_output_without_path() {
    let config = LoggingConfig {
        log_to_file: true,
        log_file_path: None,
        ..Default::default()
    };

    assert!(init_logging(&config).is_err());
}

#[tokio::test]
async fn test_retry_mechanism() {
    let attempts = AtomicUsize::new(0);
    let config = RetryConfig {
        max_attempts: 3,
        initial_delay_ms: 1,
        max_delay_ms: 5,
        backoff_multiplier: 2.0,
        jitter: false,
    };

    let counter = &attempts;
    let result = retry_async(
        move || async move {
            let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
            if attempt < 3 {
                Err(transport_error!("Temporary failure", "test"))
            } else {
                Ok(attempt)
            }
        },
        &config,
        "flaky_operation",
    )
    .await;

    assert_eq!(result.unwrap(), 3);
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_ordered_processing_keeps_input_order() {
    let items: Vec<u64> = (1..=20).collect();

    let results = process_ordered(items, 4, |n| async move {
        // later items finish first
        tokio::time::sleep(std::time::Duration::from_millis(20 - n)).await;
        n * 10
    })
    .await;

    assert_eq!(results, (1..=20).map(|n| n * 10).collect::<Vec<_>>());
}

#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = SkillifyConfig::default();
    config.github.account = "octocat".to_string();
    config.ranking.top_k = 5;
    config.save_to_file(&path).unwrap();

    let loaded = SkillifyConfig::from_file(&path).unwrap();
    assert_eq!(loaded.github.account, "octocat");
    assert_eq!(loaded.ranking.top_k, 5);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_language_tally_totals() {
    let mut tally: LanguageTally = [("Rust", 300), ("Go", 40)].into_iter().collect();
    tally.add("Rust", 100);
    tally.add("Shell", u64::MAX);

    assert_eq!(tally.get("Rust"), Some(400));
    assert_eq!(tally.len(), 3);
    // totals saturate instead of overflowing
    assert_eq!(tally.total_bytes(), u64::MAX);
}
