use serde::{Deserialize, Serialize};

/// The signed-in user's own profile, as edited in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    username: String,
    avatar: String,
    bio: String,
    status: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            username: String::new(),
            avatar: String::new(),
            bio: String::new(),
            status: "online".into(),
        }
    }
}

/// Bulk update. Missing or empty fields leave the current value alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub status: Option<String>,
}

impl UserProfile {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn avatar(&self) -> &str {
        &self.avatar
    }

    pub fn bio(&self) -> &str {
        &self.bio
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn set_avatar(&mut self, avatar: impl Into<String>) {
        self.avatar = avatar.into();
    }

    pub fn set_bio(&mut self, bio: impl Into<String>) {
        self.bio = bio.into();
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn update_profile(&mut self, patch: ProfilePatch) {
        fn apply(field: &mut String, value: Option<String>) {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                *field = value;
            }
        }

        apply(&mut self.username, patch.username);
        apply(&mut self.avatar, patch.avatar);
        apply(&mut self.bio, patch.bio);
        apply(&mut self.status, patch.status);
    }

    /// Snapshot of every field.
    pub fn profile(&self) -> UserProfile {
        self.clone()
    }
}
