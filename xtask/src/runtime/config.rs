//! Typed TOML configuration loading.

use crate::runtime::error::{XtaskError, XtaskResult};
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Generic TOML-backed config loader.
///
/// Handles filesystem access and deserialization only; command modules validate the loaded
/// value themselves.
#[derive(Clone, Debug)]
pub struct ConfigLoader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> ConfigLoader<T>
where
    T: DeserializeOwned,
{
    /// Create a loader for the given workspace-relative path.
    pub fn new(root: &Path, relative_path: &str) -> Self {
        Self {
            path: root.join(relative_path),
            _marker: PhantomData,
        }
    }

    /// Load and deserialize the configuration file.
    ///
    /// Missing files, unreadable files, and parse failures are all `Config` errors.
    pub fn load(&self) -> XtaskResult<T> {
        self.load_optional()?.ok_or_else(|| {
            XtaskError::config(format!("missing config file {}", self.path.display()))
        })
    }

    /// Load the configuration file if it exists.
    pub fn load_optional(&self) -> XtaskResult<Option<T>> {
        let body = match fs::read_to_string(&self.path) {
            Ok(body) => body,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(XtaskError::config(format!(
                    "failed to read {}: {err}",
                    self.path.display()
                )))
            }
        };
        toml::from_str(&body).map(Some).map_err(|err| {
            XtaskError::config(format!("failed to parse {}: {err}", self.path.display()))
        })
    }

    /// Config path on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
