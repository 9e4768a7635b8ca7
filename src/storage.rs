use crate::constants::SESSION_FILE;
use crate::models::Session;
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Persists the session (tokens and user id) between runs
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Store backed by `session.yaml` inside `data_dir`
    pub fn new(data_dir: &Path) -> Self {
        SessionStore {
            path: Some(data_dir.join(SESSION_FILE)),
        }
    }

    /// Store that keeps nothing on disk
    pub fn in_memory() -> Self {
        SessionStore { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Load the saved session; an absent file is an empty session
    pub fn load(&self) -> Result<Session> {
        let Some(path) = &self.path else {
            return Ok(Session::default());
        };
        if !path.exists() {
            return Ok(Session::default());
        }
        let content = fs::read_to_string(path)?;
        let session = serde_yaml::from_str::<Session>(&content)?;
        Ok(session)
    }

    /// Write all three session values
    pub fn save(&self, session: &Session) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let content = serde_yaml::to_string(session)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Remove the saved session
    pub fn clear(&self) -> Result<()> {
        if let Some(path) = &self.path {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}
