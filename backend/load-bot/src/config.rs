//! Environment-driven bot configuration.

use std::env;

use anyhow::{ensure, Context};

/// How much traffic one run generates.
#[derive(Debug, Clone)]
pub struct BotRules {
    pub number_of_users: usize,
    pub max_posts_per_user: usize,
    pub max_likes_per_user: usize,
}

/// Loaded once at startup and passed to the bot explicitly.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub api_base_url: String,
    pub rules: BotRules,
}

impl BotConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = BotConfig {
            api_base_url: env::var("BOT_API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            rules: BotRules {
                number_of_users: parse_var("BOT_NUMBER_OF_USERS", 10)?,
                max_posts_per_user: parse_var("BOT_MAX_POSTS_PER_USER", 5)?,
                max_likes_per_user: parse_var("BOT_MAX_LIKES_PER_USER", 10)?,
            },
        };

        ensure!(
            config.rules.number_of_users > 0,
            "BOT_NUMBER_OF_USERS must be at least 1"
        );
        ensure!(
            config.rules.max_posts_per_user > 0,
            "BOT_MAX_POSTS_PER_USER must be at least 1"
        );
        ensure!(
            config.rules.max_likes_per_user > 0,
            "BOT_MAX_LIKES_PER_USER must be at least 1"
        );

        Ok(config)
    }
}

fn parse_var(name: &str, default: usize) -> anyhow::Result<usize> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} must be an integer, got {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_applies_when_var_is_unset() {
        assert_eq!(parse_var("LOAD_BOT_TEST_UNSET_VAR", 7).unwrap(), 7);
    }

    #[test]
    fn set_value_overrides_default() {
        env::set_var("LOAD_BOT_TEST_SET_VAR", "42");
        assert_eq!(parse_var("LOAD_BOT_TEST_SET_VAR", 7).unwrap(), 42);
        env::remove_var("LOAD_BOT_TEST_SET_VAR");
    }

    #[test]
    fn non_numeric_value_is_rejected() {
        env::set_var("LOAD_BOT_TEST_BAD_VAR", "lots");
        assert!(parse_var("LOAD_BOT_TEST_BAD_VAR", 7).is_err());
        env::remove_var("LOAD_BOT_TEST_BAD_VAR");
    }
}
