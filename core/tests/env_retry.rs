//! A failed configuration read is retried on the next call.
//!
//! Lives in its own test binary because it mutates the process environment
//! and observes the process-wide cache from an empty state.

use portfolio_api::{api_client, get_env, ApiError, ConfigError};

#[test]
fn missing_base_url_is_not_cached() {
    std::env::remove_var("PORTFOLIO_API_BASE_URL");
    std::env::remove_var("PORTFOLIO_ENV");

    let err = get_env().unwrap_err();
    assert_eq!(err, ConfigError::MissingBaseUrl("PORTFOLIO_API_BASE_URL"));
    let err = api_client().unwrap_err();
    assert!(matches!(err, ApiError::Config(ConfigError::MissingBaseUrl(_))));

    std::env::set_var("PORTFOLIO_API_BASE_URL", "https://api.example.com");

    let env = get_env().unwrap();
    assert_eq!(env.api_base_url, "https://api.example.com");
    assert_eq!(api_client().unwrap().base_url(), "https://api.example.com");
}
