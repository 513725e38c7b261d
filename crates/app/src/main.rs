use migration::{Migrator, MigratorTrait};
use server::{DEFAULT_TOKEN_DAYS, LoginClient, TokenIssuer};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "cashbook={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.server.database).await?;
    tracing::info!("database ready, migrations applied");
    let engine = engine::Engine::builder().database(db).build().await?;

    let tokens = TokenIssuer::new(
        &settings.auth.secret,
        settings.auth.token_days.unwrap_or(DEFAULT_TOKEN_DAYS),
    );
    let login = match settings.wx.api_base {
        Some(api_base) => LoginClient::with_api_base(settings.wx.appid, settings.wx.secret, api_base),
        None => LoginClient::new(settings.wx.appid, settings.wx.secret),
    };

    let bind = settings.server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    server::run_with_listener(engine, tokens, login, listener).await?;
    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
