//! Client-side state for the chat UI: a per-channel message cache, the local
//! user's profile, and a thin HTTP client for the server API.

pub mod api;
pub mod avatar;
pub mod messages;
pub mod profile;
pub mod store;
pub mod time;

pub use api::{ApiClient, ClientError};
pub use messages::{ChannelId, ChannelMessage, MessageStatus, MessageStore, MessageUpdate, NewMessage};
pub use profile::{ProfilePatch, UserProfile};
pub use store::Store;
