use std::io;
use std::sync::Arc;

use dotenvy::dotenv;
use salon_shop::config::AppConfig;
use salon_shop::domain::ports::OrderNotifier;
use salon_shop::infrastructure::notifier::{LogNotifier, WebhookNotifier};
use salon_shop::{build_server, create_pool, run_migrations, AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(io::Error::other)?;

    let pool = create_pool(&config.database_url, config.pool_size).map_err(io::Error::other)?;
    run_migrations(&pool).map_err(io::Error::other)?;

    let notifier: Arc<dyn OrderNotifier> = match &config.notify_webhook_url {
        Some(url) => {
            log::info!("Order confirmations relayed to {}", url);
            Arc::new(WebhookNotifier::new(url.clone(), config.notify_timeout))
        }
        None => {
            log::info!("NOTIFY_WEBHOOK_URL not set, order confirmations are only logged");
            Arc::new(LogNotifier)
        }
    };

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(AppState::from_pool(pool, notifier), &config.host, config.port)?.await
}
