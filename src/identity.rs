use crate::models::Result;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const USER_ID_KEY: &str = "rc_user_id";
pub const SESSION_ID_KEY: &str = "rc_session_id";

/// Identities attached to every `/chat` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub session_id: String,
}

/// File-backed storage for the two identity keys. The user id survives
/// everything this program does; the session id is deleted on reset and
/// minted fresh at the next bootstrap.
pub struct IdentityStore {
    dir: PathBuf,
}

impl IdentityStore {
    pub fn open() -> Self {
        let dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rc-chat");
        Self { dir }
    }

    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Reads each key, minting and persisting a fresh UUID where one is
    /// missing. Idempotent across restarts.
    pub fn bootstrap(&self) -> Result<Identity> {
        Ok(Identity {
            user_id: self.load_or_create(USER_ID_KEY)?,
            session_id: self.load_or_create(SESSION_ID_KEY)?,
        })
    }

    /// Removes the session key only; the user id is never touched. The next
    /// bootstrap generates a new session id.
    pub fn clear_session(&self) -> Result<()> {
        let path = self.dir.join(SESSION_ID_KEY);
        match fs::remove_file(&path) {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }

    fn load_or_create(&self, key: &str) -> Result<String> {
        let path = self.dir.join(key);
        if let Some(id) = read_id(&path)? {
            return Ok(id);
        }
        fs::create_dir_all(&self.dir)?;
        let id = Uuid::new_v4().to_string();
        fs::write(&path, &id)?;
        Ok(id)
    }
}

fn read_id(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(raw) => {
            let id = raw.trim();
            Ok((!id.is_empty()).then(|| id.to_string()))
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn bootstrap_creates_both_identities() {
        let dir = tempdir().unwrap();
        let store = IdentityStore::at(dir.path());

        let identity = store.bootstrap().unwrap();
        assert!(!identity.user_id.is_empty());
        assert!(!identity.session_id.is_empty());
        assert_ne!(identity.user_id, identity.session_id);

        assert!(dir.path().join(USER_ID_KEY).exists());
        assert!(dir.path().join(SESSION_ID_KEY).exists());
    }

    #[test]
    fn bootstrap_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = IdentityStore::at(dir.path());

        let first = store.bootstrap().unwrap();
        let second = store.bootstrap().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn reset_regenerates_session_but_not_user() {
        let dir = tempdir().unwrap();
        let store = IdentityStore::at(dir.path());

        let before = store.bootstrap().unwrap();
        store.clear_session().unwrap();
        let after = store.bootstrap().unwrap();

        assert_eq!(before.user_id, after.user_id);
        assert_ne!(before.session_id, after.session_id);
    }

    #[test]
    fn clear_session_without_a_session_is_a_no_op() {
        let dir = tempdir().unwrap();
        let store = IdentityStore::at(dir.path());
        store.clear_session().unwrap();
    }

    #[test]
    fn blank_stored_id_is_replaced() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(USER_ID_KEY), "  \n").unwrap();

        let store = IdentityStore::at(dir.path());
        let identity = store.bootstrap().unwrap();
        assert!(!identity.user_id.trim().is_empty());
    }
}
