// Token store: single-slot persistence of the session token.
//
// The token lives as one line of plain text in `<home>/.gnotes/token`. The
// directory is created owner-only (0700) and the file is owner read/write
// (0600). There is no locking; two CLI processes racing on login/logout may
// interleave.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const TOKEN_DIR: &str = ".gnotes";
const TOKEN_FILE: &str = "token";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("cannot resolve home directory")]
    NoHomeDir,

    #[error("no session found at {}", path.display())]
    Missing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("empty token file: {}", path.display())]
    Empty { path: PathBuf },

    #[error("cannot update token file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SessionError {
    /// True for the states that are fixed by logging in again.
    pub fn needs_login(&self) -> bool {
        matches!(
            self,
            Self::Missing { .. } | Self::Empty { .. } | Self::NoHomeDir
        )
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Owns the on-disk token file.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Store at the fixed per-user location.
    pub fn default_location() -> Result<Self> {
        let home = dirs::home_dir().ok_or(SessionError::NoHomeDir)?;
        Ok(Self::at(home.join(TOKEN_DIR).join(TOKEN_FILE)))
    }

    /// Store at an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `token` followed by a newline, replacing any previous session.
    pub fn save(&self, token: &str) -> Result<()> {
        let io_err = |source| SessionError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent() {
            create_private_dir(dir).map_err(io_err)?;
        }
        write_private_file(&self.path, format!("{}\n", token).as_bytes()).map_err(io_err)?;
        debug!(path = %self.path.display(), "session token saved");
        Ok(())
    }

    /// Read the token back, trimmed. Unreadable or empty files both mean
    /// the user has to log in again.
    pub fn load(&self) -> Result<String> {
        let raw = fs::read_to_string(&self.path).map_err(|source| SessionError::Missing {
            path: self.path.clone(),
            source,
        })?;
        let token = raw.trim();
        if token.is_empty() {
            return Err(SessionError::Empty {
                path: self.path.clone(),
            });
        }
        Ok(token.to_string())
    }

    /// Remove the token file. A file that is already gone is fine.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "session token removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn write_private_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation; tighten a pre-existing file too.
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    fs::write(path, contents)
}
