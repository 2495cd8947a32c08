//! Load bot entry point.

mod bot;
mod config;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::bot::SocialNetworkBot;
use crate::config::BotConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = BotConfig::from_env()?;
    tracing::info!(
        api_base_url = %config.api_base_url,
        number_of_users = config.rules.number_of_users,
        max_posts_per_user = config.rules.max_posts_per_user,
        max_likes_per_user = config.rules.max_likes_per_user,
        "Starting load bot"
    );

    let mut bot = SocialNetworkBot::new(config)?;
    bot.run().await;

    Ok(())
}
