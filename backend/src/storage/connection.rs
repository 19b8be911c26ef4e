use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::Database;

/// Owned handle on the record store document.
///
/// Cloning is cheap; all clones share the same document and file.
#[derive(Clone)]
pub struct JsonConnection {
    data_file: Arc<PathBuf>,
    database: Arc<RwLock<Database>>,
}

impl JsonConnection {
    /// Load the document at `data_file`, starting empty if the file does not exist yet
    pub async fn open<P: AsRef<Path>>(data_file: P) -> Result<Self> {
        let data_file = data_file.as_ref().to_path_buf();

        let database = match fs::read_to_string(&data_file).await {
            Ok(raw) => {
                let db = Database::from_json(&raw).with_context(|| {
                    format!("Record store {} is not valid JSON", data_file.display())
                })?;
                info!(
                    "Loaded record store from {} ({} accounts, {} babies)",
                    data_file.display(),
                    db.accounts.len(),
                    db.babies.len()
                );
                db
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "No existing record store at {}, starting fresh",
                    data_file.display()
                );
                Database::default()
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read record store {}", data_file.display())
                })
            }
        };

        Ok(Self {
            data_file: Arc::new(data_file),
            database: Arc::new(RwLock::new(database)),
        })
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Run a read-only query against the document
    pub async fn read<R>(&self, query: impl FnOnce(&Database) -> R) -> R {
        let db = self.database.read().await;
        query(&db)
    }

    /// Apply a mutation and flush the document.
    ///
    /// The mutation runs on a copy; the copy replaces the live document only
    /// if the mutation returned `Ok` and the flush succeeded.
    pub async fn write<R, E>(
        &self,
        mutation: impl FnOnce(&mut Database) -> Result<R, E>,
    ) -> Result<R, E>
    where
        E: From<anyhow::Error>,
    {
        let mut db = self.database.write().await;
        let mut draft = db.clone();
        let result = mutation(&mut draft)?;
        self.flush(&draft).await?;
        *db = draft;
        Ok(result)
    }

    async fn flush(&self, db: &Database) -> Result<()> {
        if let Some(parent) = self.data_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create data directory {}", parent.display())
                })?;
            }
        }

        let json = db.to_json().context("Failed to serialize record store")?;

        // Write to a sibling file first so a crash never leaves a truncated document
        let tmp_file = self.data_file.with_extension("json.tmp");
        fs::write(&tmp_file, json)
            .await
            .with_context(|| format!("Failed to write {}", tmp_file.display()))?;
        if let Err(e) = fs::rename(&tmp_file, self.data_file.as_ref()).await {
            warn!("Failed to move {} into place: {}", tmp_file.display(), e);
            return Err(e).with_context(|| {
                format!("Failed to replace record store {}", self.data_file.display())
            });
        }

        debug!("Flushed record store to {}", self.data_file.display());
        Ok(())
    }

    /// Store backed by a fresh temporary directory. The directory lives as long
    /// as the returned guard.
    #[cfg(test)]
    pub async fn open_temp() -> Result<(Self, tempfile::TempDir)> {
        let temp_dir = tempfile::TempDir::new()?;
        let conn = Self::open(temp_dir.path().join("db.json")).await?;
        Ok((conn, temp_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Baby;
    use chrono::{NaiveDate, Utc};

    fn baby(id: &str) -> Baby {
        Baby {
            id: id.to_string(),
            name: "Ada".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let (conn, _dir) = JsonConnection::open_temp().await.unwrap();
        let babies = conn.read(|db| db.babies.len()).await;
        assert_eq!(babies, 0);
        assert!(!conn.data_file().exists());
    }

    #[tokio::test]
    async fn test_write_flushes_and_reload_sees_it() {
        let (conn, _dir) = JsonConnection::open_temp().await.unwrap();
        conn.write(|db| {
            db.babies.push(baby("b1"));
            Ok::<_, anyhow::Error>(())
        })
        .await
        .unwrap();

        let reopened = JsonConnection::open(conn.data_file()).await.unwrap();
        let ids = reopened
            .read(|db| db.babies.iter().map(|b| b.id.clone()).collect::<Vec<_>>())
            .await;
        assert_eq!(ids, vec!["b1".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_document_untouched() {
        let (conn, _dir) = JsonConnection::open_temp().await.unwrap();
        let result = conn
            .write(|db| {
                db.babies.push(baby("b1"));
                Err::<(), _>(anyhow::anyhow!("rejected"))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(conn.read(|db| db.babies.len()).await, 0);
        assert!(!conn.data_file().exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("db.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(JsonConnection::open(&path).await.is_err());
    }
}
