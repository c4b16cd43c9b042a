use crate::messages::MessageStore;
use crate::profile::UserProfile;

/// Root client state.
#[derive(Debug, Default)]
pub struct Store {
    pub user_profile: UserProfile,
    pub messages: MessageStore,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }
}
