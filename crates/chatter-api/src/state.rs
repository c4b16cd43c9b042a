use std::sync::Arc;

use chatter_db::Database;
use chatter_presence::PresenceTracker;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub presence: PresenceTracker,
}

impl AppStateInner {
    pub fn new(db: Database, presence: PresenceTracker) -> AppState {
        Arc::new(Self { db, presence })
    }
}
