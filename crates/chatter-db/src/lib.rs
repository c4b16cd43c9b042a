pub mod bootstrap;
pub mod queries;
pub mod repository;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use chatter_types::models::{Message, User};

pub use repository::{JsonFile, Repository};

pub const MESSAGES_FILE: &str = "messages.json";
pub const USERS_FILE: &str = "users.json";

/// The two persisted collections, each a JSON array file under one data directory.
pub struct Database {
    dir: PathBuf,
    messages: JsonFile<Message>,
    users: JsonFile<User>,
}

impl Database {
    pub async fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir).await?;

        let db = Self {
            dir: dir.to_path_buf(),
            messages: JsonFile::new(dir.join(MESSAGES_FILE)),
            users: JsonFile::new(dir.join(USERS_FILE)),
        };

        bootstrap::run(&db).await?;

        info!("Data directory opened at {}", dir.display());
        Ok(db)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn messages(&self) -> &JsonFile<Message> {
        &self.messages
    }

    pub fn users(&self) -> &JsonFile<User> {
        &self.users
    }
}
