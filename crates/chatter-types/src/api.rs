use serde::{Deserialize, Serialize};

// -- Messages --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub user: String,
    pub content: String,
}

// -- Presence --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnlineRequest {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfflineRequest {
    pub username: String,
}

// -- Users --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarRequest {
    pub username: String,
    pub avatar: String,
}

// -- Generic bodies --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub const OK: Self = Self { success: true };
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
