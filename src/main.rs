use todo_api::{app, config, database, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting todo-api in {:?} mode", config.environment);

    let pool = database::connect(&config.database)
        .await
        .expect("failed to open database");
    database::migrate(&pool)
        .await
        .expect("failed to bootstrap schema");

    let app = app(AppState { pool });

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("todo-api listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
