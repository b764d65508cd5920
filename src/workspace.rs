//! Files shared between the separate pipeline invocations.
//!
//! The `create-payload` action writes the payload handoff file and the
//! `trigger-test` action reads it back; any failing action writes the error
//! file that `report-failure` echoes into the pull request. All paths are
//! relative to one workspace root.

use std::io::{ErrorKind, Write};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::error::TriggerError;

/// Handoff file location relative to the workspace root.
pub const PAYLOAD_FILE: &str = "temp/testio_payload.json";

/// Default error message file name.
pub const DEFAULT_ERROR_FILE: &str = "testio_error_message.txt";

/// Workspace root plus the names of the files kept below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: Utf8PathBuf,
    error_file: Utf8PathBuf,
}

impl Workspace {
    /// Creates a workspace rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>, error_file: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            error_file: error_file.into(),
        }
    }

    /// Workspace root directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Full path of the payload handoff file.
    #[must_use]
    pub fn payload_path(&self) -> Utf8PathBuf {
        self.root.join(PAYLOAD_FILE)
    }

    /// Full path of the error message file.
    #[must_use]
    pub fn error_path(&self) -> Utf8PathBuf {
        self.root.join(&self.error_file)
    }

    /// Writes the handoff payload, replacing any previous run's file.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Io`] when the file cannot be written or
    /// synced to disk.
    pub fn write_payload(&self, contents: &str) -> Result<Utf8PathBuf, TriggerError> {
        self.write_synced(Utf8Path::new(PAYLOAD_FILE), contents, "payload")
    }

    /// Reads the handoff payload.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Io`] when the file is missing or unreadable.
    pub fn read_payload(&self) -> Result<String, TriggerError> {
        self.read_optional(Utf8Path::new(PAYLOAD_FILE), "payload")?
            .ok_or_else(|| TriggerError::Io {
                message: format!("payload file '{}' does not exist", self.payload_path()),
            })
    }

    /// Reads the handoff payload if a previous action wrote one.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Io`] when the file exists but is unreadable.
    pub fn read_payload_if_present(&self) -> Result<Option<String>, TriggerError> {
        self.read_optional(Utf8Path::new(PAYLOAD_FILE), "payload")
    }

    /// Removes the handoff payload left by an earlier run.
    ///
    /// Returns whether a file was removed.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Io`] when the file exists but cannot be
    /// removed.
    pub fn clear_payload(&self) -> Result<bool, TriggerError> {
        let Some(dir) = self.open_root(false)? else {
            return Ok(false);
        };

        match dir.remove_file(PAYLOAD_FILE) {
            Ok(()) => Ok(true),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(false),
            Err(error) => Err(TriggerError::Io {
                message: format!(
                    "failed to remove payload file '{}': {error}",
                    self.payload_path()
                ),
            }),
        }
    }

    /// Writes the failure message for the reporting action.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Io`] when the file cannot be written.
    pub fn write_error(&self, message: &str) -> Result<Utf8PathBuf, TriggerError> {
        self.write_synced(&self.error_file, message, "error message")
    }

    /// Reads the failure message if one was recorded.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::Io`] when the file exists but is unreadable.
    pub fn read_error(&self) -> Result<Option<String>, TriggerError> {
        self.read_optional(&self.error_file, "error message")
    }

    fn open_root(&self, create: bool) -> Result<Option<Dir>, TriggerError> {
        if create {
            Dir::create_ambient_dir_all(&self.root, ambient_authority()).map_err(|error| {
                TriggerError::Io {
                    message: format!("failed to create workspace '{}': {error}", self.root),
                }
            })?;
        }

        match Dir::open_ambient_dir(&self.root, ambient_authority()) {
            Ok(dir) => Ok(Some(dir)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(TriggerError::Io {
                message: format!("failed to open workspace '{}': {error}", self.root),
            }),
        }
    }

    fn write_synced(
        &self,
        relative: &Utf8Path,
        contents: &str,
        file_type: &str,
    ) -> Result<Utf8PathBuf, TriggerError> {
        let full_path = self.root.join(relative);
        let io_error = |action: &str, error: std::io::Error| TriggerError::Io {
            message: format!("failed to {action} {file_type} file '{full_path}': {error}"),
        };

        let dir = self.open_root(true)?.ok_or_else(|| TriggerError::Io {
            message: format!("workspace '{}' disappeared", self.root),
        })?;

        if let Some(parent) = relative.parent().filter(|p| !p.as_str().is_empty()) {
            dir.create_dir_all(parent)
                .map_err(|error| io_error("create directory for", error))?;
        }

        let mut file = dir
            .create(relative)
            .map_err(|error| io_error("create", error))?;
        file.write_all(contents.as_bytes())
            .map_err(|error| io_error("write", error))?;
        file.flush().map_err(|error| io_error("flush", error))?;
        file.sync_all().map_err(|error| io_error("sync", error))?;

        Ok(full_path)
    }

    fn read_optional(
        &self,
        relative: &Utf8Path,
        file_type: &str,
    ) -> Result<Option<String>, TriggerError> {
        let Some(dir) = self.open_root(false)? else {
            return Ok(None);
        };

        match dir.read_to_string(relative) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(TriggerError::Io {
                message: format!(
                    "failed to read {file_type} file '{}': {error}",
                    self.root.join(relative)
                ),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::{DEFAULT_ERROR_FILE, Workspace};
    use crate::error::TriggerError;

    struct WorkspaceFixture {
        _temp_dir: TempDir,
        workspace: Workspace,
    }

    #[fixture]
    fn fixture() -> WorkspaceFixture {
        let temp_dir = tempfile::tempdir().expect("temp dir should be created");
        let root = Utf8PathBuf::from_path_buf(temp_dir.path().join("action"))
            .expect("temp path should be UTF-8");
        WorkspaceFixture {
            _temp_dir: temp_dir,
            workspace: Workspace::new(root, DEFAULT_ERROR_FILE),
        }
    }

    #[rstest]
    fn payload_round_trips_and_creates_directories(fixture: WorkspaceFixture) {
        let workspace = &fixture.workspace;

        let written = workspace
            .write_payload(r#"{"a":1}"#)
            .expect("payload should be written");

        assert_eq!(written, workspace.payload_path());
        assert!(written.as_str().ends_with("temp/testio_payload.json"));
        assert_eq!(
            workspace.read_payload().expect("payload should be read"),
            r#"{"a":1}"#
        );
    }

    #[rstest]
    fn payload_is_overwritten_each_run(fixture: WorkspaceFixture) {
        let workspace = &fixture.workspace;

        workspace
            .write_payload("first run with a longer body")
            .expect("first write");
        workspace.write_payload("second").expect("second write");

        assert_eq!(workspace.read_payload().expect("read"), "second");
    }

    #[rstest]
    fn missing_payload_is_an_io_error(fixture: WorkspaceFixture) {
        let result = fixture.workspace.read_payload();

        assert!(matches!(result, Err(TriggerError::Io { .. })), "{result:?}");
        assert_eq!(fixture.workspace.read_payload_if_present(), Ok(None));
    }

    #[rstest]
    fn clearing_removes_previous_payload(fixture: WorkspaceFixture) {
        let workspace = &fixture.workspace;
        assert_eq!(workspace.clear_payload(), Ok(false), "nothing to clear yet");

        workspace.write_payload("{}").expect("payload should be written");

        assert_eq!(workspace.clear_payload(), Ok(true));
        assert_eq!(workspace.read_payload_if_present(), Ok(None));
        assert_eq!(workspace.clear_payload(), Ok(false));
    }

    #[rstest]
    fn error_file_is_optional(fixture: WorkspaceFixture) {
        let workspace = &fixture.workspace;
        assert_eq!(workspace.read_error(), Ok(None));

        workspace
            .write_error("Category 'x' is not valid")
            .expect("error should be written");

        assert_eq!(
            workspace.read_error(),
            Ok(Some("Category 'x' is not valid".to_owned()))
        );
    }
}
