use anyhow::Result;
use tracing::info;

use crate::Database;

/// Make sure both collection files exist. There is no schema version: a
/// missing file starts as `[]`, an existing one is used as-is.
pub async fn run(db: &Database) -> Result<()> {
    db.messages().ensure().await?;
    db.users().ensure().await?;

    info!(
        "Collections ready: {}, {}",
        db.messages().path().display(),
        db.users().path().display()
    );
    Ok(())
}
