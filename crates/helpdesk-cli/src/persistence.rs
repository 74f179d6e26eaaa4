use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use helpdesk_sdk::Session;
use tracing::{debug, info};

const APP_DIR: &str = "helpdesk";
const SESSION_FILE: &str = "session.json";

/// Where the logged-in session is kept between invocations.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// `<config dir>/helpdesk/session.json`.
    pub fn default_location() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::in_dir(&dir.join(APP_DIR)))
    }

    /// `session.json` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored session, or `None` when nobody is logged in.
    pub fn load(&self) -> io::Result<Option<Session>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        let session = serde_json::from_str(&content)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        debug!(path = %self.path.display(), "session loaded");
        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, json)?;
        info!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Forget the session. Returns `false` if there was none.
    pub fn clear(&self) -> io::Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}
