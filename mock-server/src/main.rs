mod logging;

use std::env;

use portfolio_mock_server::AdminAccount;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    logging::init();

    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");

    let defaults = AdminAccount::default();
    let admin = AdminAccount {
        email: env::var("PORTFOLIO_ADMIN_EMAIL").unwrap_or(defaults.email),
        password: env::var("PORTFOLIO_ADMIN_PASSWORD").unwrap_or(defaults.password),
        name: defaults.name,
    };

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, admin = %admin.email, "mock portfolio backend listening");
    portfolio_mock_server::serve(listener, admin).await
}
