//! Tests for the error system.

use socrates::error::unified::*;
use socrates::error::*;
use socrates::types::Role;

#[test]
fn error_messages_are_stable() {
    assert_eq!(
        SocratesError::InvalidRole(Role::System).to_string(),
        "Invalid role: system messages can only be set by a reset"
    );
    assert_eq!(
        SocratesError::Busy.to_string(),
        "Busy: a turn is already awaiting completion"
    );
    assert_eq!(
        SocratesError::provider(502, "bad gateway").to_string(),
        "Provider error: bad gateway"
    );
    assert_eq!(SocratesError::Timeout(60_000).to_string(), "Timeout after 60000ms");
}

#[test]
fn error_helper_mappings_are_stable_for_major_variants() {
    struct Case {
        error: SocratesError,
        expected_category: ErrorCategory,
        expected_retryable: bool,
        expected_recovery: RecoverySuggestion,
    }

    let transport_error = reqwest::Client::new()
        .get("http://[::1")
        .build()
        .unwrap_err();
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "disk");
    let serde_error = serde_json::from_str::<serde_json::Value>("{not-json}").unwrap_err();

    let cases = vec![
        Case {
            error: SocratesError::InvalidRole(Role::System),
            expected_category: ErrorCategory::Usage,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckUsage,
        },
        Case {
            error: SocratesError::Busy,
            expected_category: ErrorCategory::Usage,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckUsage,
        },
        Case {
            error: SocratesError::Authentication("bad-key".to_string()),
            expected_category: ErrorCategory::Authentication,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckCredentials,
        },
        Case {
            error: SocratesError::RateLimited {
                retry_after_ms: Some(1000),
            },
            expected_category: ErrorCategory::RateLimit,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryWithBackoff,
        },
        Case {
            error: SocratesError::Transport(transport_error),
            expected_category: ErrorCategory::Transport,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryWithBackoff,
        },
        Case {
            error: SocratesError::Timeout(5000),
            expected_category: ErrorCategory::Timeout,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::IncreaseTimeout,
        },
        Case {
            error: SocratesError::provider(503, "Server unavailable"),
            expected_category: ErrorCategory::Provider,
            expected_retryable: true,
            expected_recovery: RecoverySuggestion::RetryWithBackoff,
        },
        Case {
            error: SocratesError::provider(400, "Bad request"),
            expected_category: ErrorCategory::Provider,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::ContactSupport,
        },
        Case {
            error: SocratesError::malformed("no choices"),
            expected_category: ErrorCategory::Provider,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::ContactSupport,
        },
        Case {
            error: SocratesError::Configuration("bad-config".to_string()),
            expected_category: ErrorCategory::Configuration,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckConfiguration,
        },
        Case {
            error: SocratesError::Serialization(serde_error),
            expected_category: ErrorCategory::Serialization,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::ContactSupport,
        },
        Case {
            error: SocratesError::Io(io_error),
            expected_category: ErrorCategory::Unknown,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::ContactSupport,
        },
        Case {
            error: SocratesError::InvalidArgument("bad-arg".to_string()),
            expected_category: ErrorCategory::Usage,
            expected_retryable: false,
            expected_recovery: RecoverySuggestion::CheckUsage,
        },
    ];

    for case in cases {
        assert_eq!(
            case.error.category(),
            case.expected_category,
            "category mismatch for {:?}",
            case.error
        );
        assert_eq!(
            case.error.is_retryable(),
            case.expected_retryable,
            "retryable mismatch for {:?}",
            case.error
        );
        assert_eq!(
            case.error.recovery_suggestion(),
            case.expected_recovery,
            "recovery mismatch for {:?}",
            case.error
        );
    }
}

#[test]
fn only_core_misuse_counts_as_usage_error() {
    assert!(SocratesError::Busy.is_usage_error());
    assert!(SocratesError::InvalidRole(Role::System).is_usage_error());
    assert!(!SocratesError::Timeout(1).is_usage_error());
    assert!(!SocratesError::Authentication(String::new()).is_usage_error());
}
