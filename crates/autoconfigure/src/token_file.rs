use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use dirs::home_dir;
use wavefront_errors::TokenFileError;

pub const TOKEN_FILE_NAME: &str = ".wavefront_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFileWrite {
    Written,
    /// The target exists but is not a regular file.
    Skipped,
}

/// Local copy of a previously negotiated api token.
///
/// The file holds the raw token and nothing else. Access is not synchronised
/// between processes: concurrent writers race and the last one wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiTokenFile {
    path: PathBuf,
}

impl ApiTokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.wavefront_token`, or `None` when the home directory is unknown.
    pub fn default_path() -> Option<PathBuf> {
        home_dir().map(|home| home.join(TOKEN_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the cached token.
    ///
    /// The content is returned verbatim except for a single trailing line
    /// terminator, which editors add when the file is edited by hand.
    /// A missing, unreadable or blank file yields `Ok(None)`. Only an I/O
    /// failure on a file that could be opened is reported as an error.
    pub fn read(&self) -> Result<Option<String>, TokenFileError> {
        if !self.path.is_file() {
            return Ok(None);
        }

        match fs::read_to_string(&self.path) {
            Ok(token) if token.trim().is_empty() => Ok(None),
            Ok(token) => Ok(Some(strip_line_terminator(&token).to_string())),
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied) => {
                Ok(None)
            }
            Err(source) => Err(TokenFileError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Writes `token` verbatim, replacing any previous content.
    pub fn write(&self, token: &str) -> Result<TokenFileWrite, TokenFileError> {
        if self.path.exists() && !self.path.is_file() {
            return Ok(TokenFileWrite::Skipped);
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        options
            .open(&self.path)
            .and_then(|mut file| file.write_all(token.as_bytes()))
            .map_err(|source| TokenFileError::Write {
                path: self.path.clone(),
                source,
            })?;

        Ok(TokenFileWrite::Written)
    }
}

fn strip_line_terminator(token: &str) -> &str {
    token
        .strip_suffix("\r\n")
        .or_else(|| token.strip_suffix('\n'))
        .unwrap_or(token)
}
