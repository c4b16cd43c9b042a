use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat message as stored in `messages.json` and returned by the API.
///
/// `id` is the creation time in epoch millis, so two messages posted within
/// the same millisecond share an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub user: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Build a message stamped with `now`, truncated to millisecond precision
    /// so the id and the timestamp describe the same instant.
    pub fn new(user: String, content: String, now: DateTime<Utc>) -> Self {
        let timestamp = truncate_to_millis(now);
        Self {
            id: timestamp.timestamp_millis(),
            user,
            content,
            timestamp,
        }
    }
}

/// Durable user record. Survives restarts, unlike presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// `created_at` is truncated to millisecond precision, like message timestamps.
    pub fn new(username: String, avatar: String, now: DateTime<Utc>) -> Self {
        Self {
            username,
            avatar,
            created_at: truncate_to_millis(now),
        }
    }
}

fn truncate_to_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ts.timestamp_millis()).unwrap_or(ts)
}

/// Transient "currently online" record held by the presence tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceEntry {
    pub username: String,
    pub avatar: String,
    /// Epoch millis of the last "online" call.
    pub last_activity: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_id_matches_timestamp() {
        let now = DateTime::parse_from_rfc3339("2024-05-01T10:20:30.123456Z")
            .unwrap()
            .with_timezone(&Utc);
        let msg = Message::new("alice".into(), "hi".into(), now);

        assert_eq!(msg.id, msg.timestamp.timestamp_millis());
        assert_eq!(msg.timestamp.timestamp_subsec_nanos(), 123_000_000);
    }

    #[test]
    fn user_created_at_has_millisecond_precision() {
        let now = DateTime::parse_from_rfc3339("2024-05-01T10:20:30.123456789Z")
            .unwrap()
            .with_timezone(&Utc);
        let user = User::new("bob".into(), "a".into(), now);

        assert_eq!(user.created_at.timestamp_subsec_nanos(), 123_000_000);
        assert_eq!(
            serde_json::to_value(&user).unwrap()["createdAt"],
            "2024-05-01T10:20:30.123Z"
        );
    }

    #[test]
    fn user_uses_camel_case_on_disk() {
        let user = User {
            username: "bob".into(),
            avatar: "https://example.com/bob.png".into(),
            created_at: DateTime::from_timestamp_millis(0).unwrap(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn presence_serializes_last_activity_as_millis() {
        let entry = PresenceEntry {
            username: "bob".into(),
            avatar: "a".into(),
            last_activity: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["lastActivity"], 1_700_000_000_000i64);
    }
}
