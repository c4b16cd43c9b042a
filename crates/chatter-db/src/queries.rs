use anyhow::Result;
use chrono::Utc;

use chatter_types::models::{Message, User};

use crate::Database;
use crate::repository::Repository;

impl Database {
    // -- Messages --

    /// Stamp a new message with the current clock and append it.
    pub async fn append_message(&self, user: String, content: String) -> Result<Message> {
        let message = Message::new(user, content, Utc::now());
        self.messages.append(message.clone()).await?;
        Ok(message)
    }

    /// Every message, oldest first.
    pub async fn list_messages(&self) -> Result<Vec<Message>> {
        self.messages.list().await
    }

    // -- Users --

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.users.list().await
    }

    pub async fn find_user(&self, username: &str) -> Result<Option<User>> {
        self.users.find_by(|u| u.username == username).await
    }

    /// Record a first-seen user. An existing record is left untouched, so
    /// `created_at` is written exactly once. Returns whether a record was added.
    pub async fn ensure_user(&self, username: &str, avatar: &str) -> Result<bool> {
        let mut users = self.users.load().await?;
        if users.iter().any(|u| u.username == username) {
            return Ok(false);
        }

        users.push(User::new(
            username.to_string(),
            avatar.to_string(),
            Utc::now(),
        ));
        self.users.save(&users).await?;
        Ok(true)
    }

    /// Returns `false` when no user record exists for `username`.
    pub async fn update_avatar(&self, username: &str, avatar: &str) -> Result<bool> {
        self.users
            .update(|u| u.username == username, |u| u.avatar = avatar.to_string())
            .await
    }
}
