use tokio::net::TcpListener;
use tracing::Level;

fn log_level() -> Level {
    std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(Level::INFO)
}

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt().with_max_level(log_level()).init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");

    let mut state = mock_server::MockState::with_devices(mock_server::fixture_devices());
    if let Ok(token) = std::env::var("MOCK_ACCESS_TOKEN") {
        state = state.require_token(&token);
    }

    let listener = TcpListener::bind(&addr).await?;
    mock_server::run(listener, state).await
}
