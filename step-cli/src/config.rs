//! Local files for twostep: config path and the saved session.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use twostep_client::ClientConfig;
use twostep_types::SessionToken;

/// Config file name inside the data directory.
pub const CONFIG_FILE: &str = "twostep.toml";

/// Saved session file name inside the data directory.
pub const SESSION_FILE: &str = "session.json";

/// Everything a command needs besides the store.
#[derive(Debug, Clone)]
pub struct CliContext {
    /// Data directory.
    pub data_dir: PathBuf,
    /// Loaded client configuration.
    pub config: ClientConfig,
    /// Whether to restore and save the session credential.
    pub persist_session: bool,
}

/// Session credential kept between runs, like a browser cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSession {
    /// Server the credential belongs to.
    pub server: String,
    /// Raw credential.
    pub token: String,
}

impl SavedSession {
    /// Load the saved session, if one exists for `server`.
    pub async fn load(data_dir: &Path, server: &str) -> Option<SessionToken> {
        let contents = tokio::fs::read_to_string(data_dir.join(SESSION_FILE))
            .await
            .ok()?;
        let saved: SavedSession = match serde_json::from_str(&contents) {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!("Ignoring unreadable saved session: {}", e);
                return None;
            }
        };
        (saved.server == server).then(|| SessionToken::new(saved.token))
    }

    /// Save the credential for `server`.
    pub async fn save(data_dir: &Path, server: &str, token: &SessionToken) -> Result<()> {
        let path = data_dir.join(SESSION_FILE);
        let saved = SavedSession {
            server: server.to_string(),
            token: token.as_str().to_string(),
        };
        let contents = serde_json::to_string_pretty(&saved)?;
        tokio::fs::write(&path, contents)
            .await
            .context("Failed to save session")?;
        set_file_permissions_0600(&path).await?;
        Ok(())
    }

    /// Forget any saved credential.
    pub async fn clear(data_dir: &Path) -> Result<()> {
        let path = data_dir.join(SESSION_FILE);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("Failed to remove saved session"),
        }
    }
}

/// Set file permissions to 0600 (owner read/write only) on Unix.
/// No-op on non-Unix platforms.
async fn set_file_permissions_0600(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .await
            .context("Failed to set file permissions")?;
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn session_roundtrip_for_same_server() {
        let dir = tempdir().unwrap();
        let token = SessionToken::new("abc");
        SavedSession::save(dir.path(), "http://a", &token).await.unwrap();

        let loaded = SavedSession::load(dir.path(), "http://a").await;
        assert_eq!(loaded, Some(token));
    }

    #[tokio::test]
    async fn session_for_other_server_is_ignored() {
        let dir = tempdir().unwrap();
        SavedSession::save(dir.path(), "http://a", &SessionToken::new("abc"))
            .await
            .unwrap();

        assert_eq!(SavedSession::load(dir.path(), "http://b").await, None);
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let dir = tempdir().unwrap();
        SavedSession::save(dir.path(), "http://a", &SessionToken::new("abc"))
            .await
            .unwrap();

        SavedSession::clear(dir.path()).await.unwrap();
        SavedSession::clear(dir.path()).await.unwrap();
        assert_eq!(SavedSession::load(dir.path(), "http://a").await, None);
    }

    #[tokio::test]
    async fn corrupt_session_is_ignored() {
        let dir = tempdir().unwrap();
        tokio::fs::write(dir.path().join(SESSION_FILE), "not json")
            .await
            .unwrap();

        assert_eq!(SavedSession::load(dir.path(), "http://a").await, None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn session_file_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir().unwrap();
        SavedSession::save(dir.path(), "http://a", &SessionToken::new("abc"))
            .await
            .unwrap();

        let path = dir.path().join(SESSION_FILE);
        let perms = tokio::fs::metadata(&path).await.unwrap().permissions();
        assert_eq!(perms.mode() & 0o777, 0o600, "file should be 0600");
    }
}
