//! Synthetic traffic generator.
//!
//! Drives the HTTP API end to end: signs up a crowd of users, logs them in,
//! publishes a random number of posts per user, exchanges random likes and
//! finally prints a per-post activity summary. Every request degrades to
//! `None` on failure so a partially available API never aborts a run.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use anyhow::Context;
use rand::Rng;
use reqwest::Method;
use serde_json::{json, Value};

use crate::config::{BotConfig, BotRules};

const BOT_PASSWORD: &str = "password$$$";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// One post created during the run, tracked by its local index.
#[derive(Debug)]
struct PostRecord {
    /// Identifier assigned by the API, `None` when creation failed.
    api_id: Option<String>,
    /// Local indices of the users whose like went through.
    liked_by: BTreeSet<usize>,
}

/// Everything the bot knows about one simulated user.
#[derive(Debug, Default)]
struct UserRecord {
    access_token: Option<String>,
    posts: BTreeMap<usize, PostRecord>,
}

pub struct SocialNetworkBot {
    api_base_url: String,
    rules: BotRules,
    client: reqwest::Client,
    users: BTreeMap<usize, UserRecord>,
}

impl SocialNetworkBot {
    pub fn new(config: BotConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            rules: config.rules,
            client,
            users: BTreeMap::new(),
        })
    }

    /// Runs all phases in order, then prints the activity summary.
    pub async fn run(&mut self) {
        self.signup_users().await;
        self.login_users().await;
        self.create_posts().await;
        self.like_posts().await;
        self.display_activity();
    }

    async fn signup_users(&mut self) {
        tracing::info!(count = self.rules.number_of_users, "Signing up users");
        for user_id in 0..self.rules.number_of_users {
            let payload = json!({
                "username": username_for(user_id),
                "password": BOT_PASSWORD,
            });
            // A conflict here usually means the user survived a previous
            // run; login still decides whether the account is usable.
            if self
                .make_request(Method::POST, "user/signup/", Some(&payload), None)
                .await
                .is_none()
            {
                tracing::warn!(user_id, "Signup failed");
            }
            self.users.insert(user_id, UserRecord::default());
        }
    }

    async fn login_users(&mut self) {
        tracing::info!(count = self.rules.number_of_users, "Obtaining tokens");
        for user_id in 0..self.rules.number_of_users {
            let payload = json!({
                "username": username_for(user_id),
                "password": BOT_PASSWORD,
            });
            let token = self
                .make_request(Method::POST, "user/token/", Some(&payload), None)
                .await
                .and_then(|body| body["access"].as_str().map(str::to_string));
            if token.is_none() {
                tracing::warn!(user_id, "Login failed, user sits out the rest of the run");
            }
            if let Some(record) = self.users.get_mut(&user_id) {
                record.access_token = token;
            }
        }
    }

    async fn create_posts(&mut self) {
        for user_id in 0..self.rules.number_of_users {
            let Some(token) = self.access_token(user_id) else {
                continue;
            };
            let posts_number = rand::thread_rng().gen_range(1..=self.rules.max_posts_per_user);
            for post_index in 0..posts_number {
                let payload = json!({
                    "title": format!("Post by user #{}", user_id),
                    "content": format!("Some content in the post #{}", post_index),
                });
                let api_id = self
                    .make_request(Method::POST, "posts/", Some(&payload), Some(&token))
                    .await
                    .and_then(|body| body["id"].as_str().map(str::to_string));
                if api_id.is_none() {
                    tracing::warn!(user_id, post_index, "Post creation failed");
                }
                if let Some(record) = self.users.get_mut(&user_id) {
                    record.posts.insert(
                        post_index,
                        PostRecord {
                            api_id,
                            liked_by: BTreeSet::new(),
                        },
                    );
                }
            }
            tracing::info!(user_id, posts = posts_number, "Created posts");
        }
    }

    async fn like_posts(&mut self) {
        for user_id in 0..self.rules.number_of_users {
            let Some(token) = self.access_token(user_id) else {
                continue;
            };
            let attempts = rand::thread_rng().gen_range(1..=self.rules.max_likes_per_user);
            let mut targeted: BTreeSet<(usize, usize)> = BTreeSet::new();
            let mut likes_sent = 0usize;
            for _ in 0..attempts {
                let Some((target_user, target_post)) = self.pick_target() else {
                    continue;
                };
                // One like per (user, post) pair: the endpoint toggles, so a
                // repeat call would take the like back.
                if !targeted.insert((target_user, target_post)) {
                    continue;
                }
                let Some(api_id) = self.post_api_id(target_user, target_post) else {
                    continue;
                };
                let endpoint = format!("posts/{}/like-unlike/", api_id);
                if self
                    .make_request(Method::POST, &endpoint, None, Some(&token))
                    .await
                    .is_some()
                {
                    if let Some(post) = self
                        .users
                        .get_mut(&target_user)
                        .and_then(|u| u.posts.get_mut(&target_post))
                    {
                        post.liked_by.insert(user_id);
                        likes_sent += 1;
                    }
                }
            }
            tracing::info!(user_id, likes = likes_sent, attempts, "Liked posts");
        }
    }

    /// Prints which users liked every post created during the run.
    fn display_activity(&self) {
        for (user_id, record) in &self.users {
            println!("User {}:", user_id);
            for (post_index, post) in &record.posts {
                println!("  {}", activity_line(*post_index, post));
            }
        }
    }

    /// Picks a uniformly random (user, post index) pair, `None` when the
    /// chosen user has no posts to like.
    fn pick_target(&self) -> Option<(usize, usize)> {
        let mut rng = rand::thread_rng();
        let target_user = rng.gen_range(0..self.rules.number_of_users);
        let posts_count = self.users.get(&target_user).map_or(0, |u| u.posts.len());
        if posts_count == 0 {
            return None;
        }
        Some((target_user, rng.gen_range(0..posts_count)))
    }

    fn access_token(&self, user_id: usize) -> Option<String> {
        self.users
            .get(&user_id)
            .and_then(|u| u.access_token.clone())
    }

    fn post_api_id(&self, user_id: usize, post_index: usize) -> Option<String> {
        self.users
            .get(&user_id)
            .and_then(|u| u.posts.get(&post_index))
            .and_then(|p| p.api_id.clone())
    }

    /// Fires one API request. Network failures and non-2xx responses are
    /// logged and collapse to `None` so callers skip and move on.
    async fn make_request(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<&Value>,
        token: Option<&str>,
    ) -> Option<Value> {
        let url = format!("{}/{}", self.api_base_url, endpoint);
        let mut request = self.client.request(method, &url);
        if let Some(payload) = payload {
            request = request.json(payload);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => response.json().await.ok(),
            Ok(response) => {
                tracing::debug!(%url, status = %response.status(), "Request rejected");
                None
            }
            Err(err) => {
                tracing::debug!(%url, error = %err, "Request failed");
                None
            }
        }
    }
}

fn username_for(user_id: usize) -> String {
    format!("user_{}", user_id)
}

fn activity_line(post_index: usize, post: &PostRecord) -> String {
    let likers = post
        .liked_by
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Post {} with id #{} was liked by users: [{}]",
        post_index,
        post.api_id.as_deref().unwrap_or("unknown"),
        likers
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames_derive_from_local_index() {
        assert_eq!(username_for(0), "user_0");
        assert_eq!(username_for(12), "user_12");
    }

    #[test]
    fn activity_line_lists_likers_in_order() {
        let post = PostRecord {
            api_id: Some("9b2e".to_string()),
            liked_by: BTreeSet::from([3, 1, 2]),
        };
        assert_eq!(
            activity_line(0, &post),
            "Post 0 with id #9b2e was liked by users: [1, 2, 3]"
        );
    }

    #[test]
    fn activity_line_handles_failed_creation() {
        let post = PostRecord {
            api_id: None,
            liked_by: BTreeSet::new(),
        };
        assert_eq!(
            activity_line(7, &post),
            "Post 7 with id #unknown was liked by users: []"
        );
    }
}
