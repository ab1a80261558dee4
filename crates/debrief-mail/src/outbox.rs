use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::error::MailError;
use crate::{Mailer, OutgoingEmail, check_recipient};

/// Writes each message as a JSON file into a directory.
#[derive(Debug, Clone)]
pub struct OutboxMailer {
    dir: PathBuf,
}

#[derive(Serialize)]
struct OutboxEntry<'a> {
    id: Uuid,
    queued_at: jiff::Timestamp,
    #[serde(flatten)]
    email: &'a OutgoingEmail,
}

impl OutboxMailer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl Mailer for OutboxMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        check_recipient(&email.to)?;

        let entry = OutboxEntry {
            id: Uuid::new_v4(),
            queued_at: jiff::Timestamp::now(),
            email,
        };
        let json = serde_json::to_vec_pretty(&entry)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(outbox_err(&self.dir))?;

        // Write under a dotted name, then rename, so a watcher never sees a
        // partial message.
        let name = format!("{}-{}.json", entry.queued_at.as_second(), entry.id);
        let tmp = self.dir.join(format!(".{name}"));
        let path = self.dir.join(&name);
        tokio::fs::write(&tmp, json).await.map_err(outbox_err(&tmp))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(outbox_err(&path))?;

        tracing::info!(path = %path.display(), id = %entry.id, "email queued in outbox");
        Ok(())
    }
}

fn outbox_err(path: &Path) -> impl FnOnce(std::io::Error) -> MailError {
    let path = path.to_path_buf();
    move |source| MailError::Outbox { path, source }
}
