//! The shared client and configuration are built once per process.
//!
//! Lives in its own test binary because it mutates the process environment.

use portfolio_api::{api_client, get_env, NodeEnv};

#[test]
fn shared_client_is_built_once_from_the_environment() {
    std::env::set_var("PORTFOLIO_API_BASE_URL", "  https://api.example.com/  ");
    std::env::set_var("PORTFOLIO_ENV", "production");

    let first = api_client().unwrap();
    let second = api_client().unwrap();
    assert!(std::ptr::eq(first, second));
    assert_eq!(first.compose_url("/projects"), "https://api.example.com/projects");

    let env = get_env().unwrap();
    assert!(std::ptr::eq(env, get_env().unwrap()));
    assert_eq!(env.node_env, NodeEnv::Production);

    // Later changes are not observed.
    std::env::set_var("PORTFOLIO_API_BASE_URL", "https://other.example.com");
    assert_eq!(get_env().unwrap().api_base_url, env.api_base_url);
}
