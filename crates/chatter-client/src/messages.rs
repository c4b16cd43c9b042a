use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use chatter_types::models::Message;

/// Client-side grouping key. The server has no notion of channels.
pub type ChannelId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Pending,
    Sent,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelMessage {
    pub id: String,
    pub channel_id: ChannelId,
    pub user: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub status: MessageStatus,
}

impl ChannelMessage {
    /// Place a server message into a channel.
    pub fn from_server(channel_id: impl Into<ChannelId>, message: Message) -> Self {
        Self {
            id: message.id.to_string(),
            channel_id: channel_id.into(),
            user: message.user,
            content: message.content,
            timestamp: message.timestamp,
            status: MessageStatus::Sent,
        }
    }
}

/// Input for [`MessageStore::send_message`].
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub channel_id: ChannelId,
    pub user: String,
    pub content: String,
}

/// Partial update merged over an existing message. `None` fields are kept.
#[derive(Debug, Clone, Default)]
pub struct MessageUpdate {
    pub content: Option<String>,
    pub status: Option<MessageStatus>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Messages cached per channel, plus load/error flags for the UI.
#[derive(Debug, Default)]
pub struct MessageStore {
    channel_messages: HashMap<ChannelId, Vec<ChannelMessage>>,
    loading: bool,
    error: Option<String>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Mutations --

    pub fn set_channel_messages(&mut self, channel_id: &str, messages: Vec<ChannelMessage>) {
        self.channel_messages.insert(channel_id.to_string(), messages);
    }

    pub fn add_message(&mut self, channel_id: &str, message: ChannelMessage) {
        self.channel_messages
            .entry(channel_id.to_string())
            .or_default()
            .push(message);
    }

    /// No-op if the channel or message is unknown.
    pub fn update_message(&mut self, channel_id: &str, message_id: &str, update: MessageUpdate) {
        let Some(message) = self
            .channel_messages
            .get_mut(channel_id)
            .and_then(|messages| messages.iter_mut().find(|m| m.id == message_id))
        else {
            return;
        };

        if let Some(content) = update.content {
            message.content = content;
        }
        if let Some(status) = update.status {
            message.status = status;
        }
        if let Some(timestamp) = update.timestamp {
            message.timestamp = timestamp;
        }
    }

    /// No-op if the channel or message is unknown.
    pub fn delete_message(&mut self, channel_id: &str, message_id: &str) {
        if let Some(messages) = self.channel_messages.get_mut(channel_id) {
            if let Some(idx) = messages.iter().position(|m| m.id == message_id) {
                messages.remove(idx);
            }
        }
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn clear_channel_messages(&mut self, channel_id: &str) {
        self.channel_messages.remove(channel_id);
    }

    // -- Actions --

    /// Replace a channel's messages with whatever `source` yields.
    ///
    /// The source is supplied by the caller; on failure the error text is
    /// kept in [`MessageStore::error`] and the cached messages are left alone.
    pub async fn fetch_channel_messages<F, E>(&mut self, channel_id: &str, source: F)
    where
        F: Future<Output = Result<Vec<ChannelMessage>, E>>,
        E: Display,
    {
        self.set_loading(true);
        self.set_error(None);

        match source.await {
            Ok(messages) => self.set_channel_messages(channel_id, messages),
            Err(e) => {
                error!("Failed to fetch messages for channel {}: {}", channel_id, e);
                self.set_error(Some(e.to_string()));
            }
        }

        self.set_loading(false);
    }

    /// Add a locally-created message to its channel and return it.
    /// Nothing is sent over the network.
    pub fn send_message(&mut self, new: NewMessage) -> ChannelMessage {
        let now = Utc::now();
        let message = ChannelMessage {
            id: now.timestamp_millis().to_string(),
            channel_id: new.channel_id,
            user: new.user,
            content: new.content,
            timestamp: now,
            status: MessageStatus::Sent,
        };

        self.add_message(&message.channel_id, message.clone());
        message
    }

    // -- Getters --

    /// Empty when the channel has never been loaded.
    pub fn channel_messages(&self, channel_id: &str) -> &[ChannelMessage] {
        self.channel_messages
            .get(channel_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn last_channel_message(&self, channel_id: &str) -> Option<&ChannelMessage> {
        self.channel_messages(channel_id).last()
    }

    /// Messages strictly newer than `last_read`. Zero when the channel is
    /// unknown or nothing has been read yet.
    pub fn unread_count(&self, channel_id: &str, last_read: Option<DateTime<Utc>>) -> usize {
        let Some(last_read) = last_read else {
            return 0;
        };
        self.channel_messages(channel_id)
            .iter()
            .filter(|m| m.timestamp > last_read)
            .count()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
