use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::debug;
use url::form_urlencoded;

use chatter_types::models::PresenceEntry;

/// Entries whose last activity is this old or older are dropped on the next read.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

const AVATAR_SERVICE: &str = "https://ui-avatars.com/api/";

/// Placeholder avatar keyed by username.
pub fn default_avatar(username: &str) -> String {
    format!(
        "{AVATAR_SERVICE}?name={}&background=random",
        encode_component(username)
    )
}

/// Percent-encode one query value. Spaces become `%20`, not `+`.
fn encode_component(value: &str) -> String {
    // A literal '+' is already escaped to %2B, so any '+' left is a space.
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Outcome of an "online" call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceChange {
    /// The user was not in the online list and has been added with `avatar`.
    Joined { avatar: String },
    /// The user was already online; activity time refreshed.
    Refreshed,
}

/// Tracks who is online. Cloning shares the same underlying list.
///
/// Staleness is only checked when the list is read: an entry that timed out
/// stays in memory until the next `list_online`.
#[derive(Clone)]
pub struct PresenceTracker {
    inner: Arc<TrackerInner>,
}

struct TrackerInner {
    ttl_ms: i64,
    /// First-seen order, looked up by linear scan.
    entries: RwLock<Vec<PresenceEntry>>,
}

impl Default for PresenceTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(TrackerInner {
                ttl_ms: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
                entries: RwLock::new(Vec::new()),
            }),
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.inner.ttl_ms as u64)
    }

    pub async fn mark_online(&self, username: &str, avatar: Option<&str>) -> PresenceChange {
        self.mark_online_at(username, avatar, now_millis()).await
    }

    /// Refresh or insert `username` with activity time `now` (epoch millis).
    ///
    /// An existing entry keeps its avatar unless a new one is given.
    pub async fn mark_online_at(
        &self,
        username: &str,
        avatar: Option<&str>,
        now: i64,
    ) -> PresenceChange {
        let mut entries = self.inner.entries.write().await;

        if let Some(entry) = entries.iter_mut().find(|e| e.username == username) {
            entry.last_activity = now;
            if let Some(avatar) = avatar {
                entry.avatar = avatar.to_string();
            }
            return PresenceChange::Refreshed;
        }

        let avatar = avatar.map_or_else(|| default_avatar(username), str::to_string);
        entries.push(PresenceEntry {
            username: username.to_string(),
            avatar: avatar.clone(),
            last_activity: now,
        });
        debug!("{} is now online ({} online)", username, entries.len());

        PresenceChange::Joined { avatar }
    }

    /// Remove `username`. Returns whether it was present; removing an absent
    /// user is not an error.
    pub async fn mark_offline(&self, username: &str) -> bool {
        let mut entries = self.inner.entries.write().await;
        let before = entries.len();
        entries.retain(|e| e.username != username);
        before != entries.len()
    }

    pub async fn list_online(&self) -> Vec<PresenceEntry> {
        self.list_online_at(now_millis()).await
    }

    /// Drop every entry not active within the TTL before `now`, then return
    /// the survivors in first-seen order.
    pub async fn list_online_at(&self, now: i64) -> Vec<PresenceEntry> {
        let cutoff = now.saturating_sub(self.inner.ttl_ms);
        let mut entries = self.inner.entries.write().await;

        let before = entries.len();
        entries.retain(|e| e.last_activity > cutoff);
        let evicted = before - entries.len();
        if evicted > 0 {
            debug!("Evicted {} stale presence entries", evicted);
        }

        entries.clone()
    }

    /// Overwrite the avatar of an online user. Returns `false` if not online.
    pub async fn set_avatar(&self, username: &str, avatar: &str) -> bool {
        let mut entries = self.inner.entries.write().await;
        match entries.iter_mut().find(|e| e.username == username) {
            Some(entry) => {
                entry.avatar = avatar.to_string();
                true
            }
            None => false,
        }
    }

    /// Whether an entry exists, stale or not. Does not evict.
    pub async fn is_online(&self, username: &str) -> bool {
        self.inner
            .entries
            .read()
            .await
            .iter()
            .any(|e| e.username == username)
    }

    pub async fn len(&self) -> usize {
        self.inner.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: i64 = 60 * 1000;
    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn default_avatar_encodes_username() {
        assert_eq!(
            default_avatar("bob"),
            "https://ui-avatars.com/api/?name=bob&background=random"
        );
        assert_eq!(
            default_avatar("a&b c"),
            "https://ui-avatars.com/api/?name=a%26b%20c&background=random"
        );
        assert!(default_avatar("c++").contains("name=c%2B%2B&"));
    }

    #[tokio::test]
    async fn online_then_offline_is_gone() {
        let tracker = PresenceTracker::new();
        tracker.mark_online("alice", None).await;
        assert!(tracker.mark_offline("alice").await);

        let online = tracker.list_online().await;
        assert!(online.iter().all(|e| e.username != "alice"));
    }

    #[tokio::test]
    async fn offline_for_unknown_user_is_noop() {
        let tracker = PresenceTracker::new();
        tracker.mark_online("alice", None).await;

        assert!(!tracker.mark_offline("nobody").await);
        assert!(!tracker.mark_offline("nobody").await);
        assert_eq!(tracker.len().await, 1);
    }

    #[tokio::test]
    async fn latest_avatar_wins() {
        let tracker = PresenceTracker::new();
        tracker.mark_online("alice", Some("a1")).await;
        tracker.mark_online("alice", Some("a2")).await;

        let online = tracker.list_online().await;
        assert_eq!(online.len(), 1);
        assert_eq!(online[0].avatar, "a2");
    }

    #[tokio::test]
    async fn refresh_without_avatar_keeps_existing() {
        let tracker = PresenceTracker::new();
        tracker.mark_online_at("alice", Some("custom"), NOW).await;
        let change = tracker.mark_online_at("alice", None, NOW + MINUTE).await;

        assert_eq!(change, PresenceChange::Refreshed);
        let online = tracker.list_online_at(NOW + MINUTE).await;
        assert_eq!(online[0].avatar, "custom");
        assert_eq!(online[0].last_activity, NOW + MINUTE);
    }

    #[tokio::test]
    async fn repeated_online_does_not_duplicate() {
        let tracker = PresenceTracker::new();
        let first = tracker.mark_online("bob", None).await;
        let second = tracker.mark_online("bob", None).await;

        assert_eq!(
            first,
            PresenceChange::Joined {
                avatar: default_avatar("bob")
            }
        );
        assert_eq!(second, PresenceChange::Refreshed);

        let online = tracker.list_online().await;
        assert_eq!(online.len(), 1);
        assert_eq!(online[0].avatar, default_avatar("bob"));
    }

    #[tokio::test]
    async fn stale_entries_are_evicted_on_read() {
        let tracker = PresenceTracker::new();
        tracker.mark_online_at("old", None, NOW - 6 * MINUTE).await;
        tracker.mark_online_at("recent", None, NOW - 4 * MINUTE).await;

        // Nothing is evicted until someone reads the list.
        assert_eq!(tracker.len().await, 2);

        let online = tracker.list_online_at(NOW).await;
        let names: Vec<_> = online.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, vec!["recent"]);
        assert!(!tracker.is_online("old").await);
    }

    #[tokio::test]
    async fn exactly_ttl_old_is_stale() {
        let tracker = PresenceTracker::new();
        tracker.mark_online_at("edge", None, NOW - 5 * MINUTE).await;

        assert!(tracker.list_online_at(NOW).await.is_empty());
        assert!(tracker.is_empty().await);
    }

    #[tokio::test]
    async fn custom_ttl_is_respected() {
        let tracker = PresenceTracker::with_ttl(Duration::from_secs(30));
        assert_eq!(tracker.ttl(), Duration::from_secs(30));

        tracker.mark_online_at("alice", None, NOW - 40_000).await;
        tracker.mark_online_at("bob", None, NOW - 20_000).await;

        let online = tracker.list_online_at(NOW).await;
        assert_eq!(online.len(), 1);
        assert_eq!(online[0].username, "bob");
    }

    #[tokio::test]
    async fn set_avatar_only_touches_online_users() {
        let tracker = PresenceTracker::new();
        assert!(!tracker.set_avatar("alice", "x").await);

        tracker.mark_online("alice", None).await;
        assert!(tracker.set_avatar("alice", "x").await);
        assert_eq!(tracker.list_online().await[0].avatar, "x");
    }

    #[tokio::test]
    async fn clones_share_state() {
        let tracker = PresenceTracker::new();
        let other = tracker.clone();
        other.mark_online("alice", None).await;

        assert!(tracker.is_online("alice").await);
    }

    #[tokio::test]
    async fn separate_trackers_are_independent() {
        let a = PresenceTracker::new();
        let b = PresenceTracker::new();
        a.mark_online("alice", None).await;

        assert!(b.list_online().await.is_empty());
    }
}
