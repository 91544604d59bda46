//! File intake: copy picked files into the managed evidence directory
//!
//! Copies are named `<millis>-<basename>`. If that name is taken, a numeric
//! suffix is inserted before the extension (`<millis>-report-1.pdf`).

use crate::SdkError;
use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use vault_domain::numbered_file_name;
use vault_store::Clock;

/// Copies source files into an evidence directory
#[derive(Clone)]
pub struct FileIntake {
    dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FileIntake {
    /// Intake into `dir`, stamping names with `clock`
    pub fn new(dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            dir: dir.into(),
            clock,
        }
    }

    /// Copy `source` into the evidence directory and return the new path
    pub fn import(&self, source: &Path) -> Result<PathBuf, SdkError> {
        let fail = |e: io::Error| SdkError::Intake {
            path: source.to_path_buf(),
            source: e,
        };

        let basename = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| fail(io::Error::new(ErrorKind::InvalidInput, "path has no file name")))?;

        let mut input = File::open(source).map_err(fail)?;
        std::fs::create_dir_all(&self.dir).map_err(fail)?;

        let stamp = self.clock.now_millis();
        let (target, mut output) = self.reserve_name(stamp, &basename).map_err(fail)?;

        if let Err(e) = io::copy(&mut input, &mut output) {
            drop(output);
            let _ = std::fs::remove_file(&target);
            return Err(fail(e));
        }

        tracing::info!(source = %source.display(), target = %target.display(), "Imported evidence file");
        Ok(target)
    }

    /// Create the first free target name, exclusively
    fn reserve_name(&self, stamp: u64, basename: &str) -> io::Result<(PathBuf, File)> {
        let mut attempt = 0u32;
        loop {
            let candidate = self.dir.join(candidate_name(stamp, basename, attempt));
            match OpenOptions::new().write(true).create_new(true).open(&candidate) {
                Ok(file) => return Ok((candidate, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e),
            }
        }
    }
}

fn candidate_name(stamp: u64, basename: &str, attempt: u32) -> String {
    format!("{}-{}", stamp, numbered_file_name(basename, attempt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vault_store::ManualClock;

    #[test]
    fn test_candidate_names() {
        assert_eq!(candidate_name(42, "scan.pdf", 0), "42-scan.pdf");
        assert_eq!(candidate_name(42, "scan.pdf", 2), "42-scan-2.pdf");
        assert_eq!(candidate_name(42, "README", 1), "42-README-1");
        assert_eq!(candidate_name(42, "archive.tar.gz", 1), "42-archive.tar-1.gz");
    }

    #[test]
    fn test_import_copies_and_avoids_collisions() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("scan.pdf");
        std::fs::write(&source, "content").unwrap();

        let intake = FileIntake::new(dir.path().join("evidence-files"), Arc::new(ManualClock::new(7)));
        let first = intake.import(&source).unwrap();
        let second = intake.import(&source).unwrap();

        assert_eq!(first.file_name().unwrap(), "7-scan.pdf");
        assert_eq!(second.file_name().unwrap(), "7-scan-1.pdf");
        assert_eq!(std::fs::read_to_string(&second).unwrap(), "content");
    }

    #[test]
    fn test_import_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let intake = FileIntake::new(dir.path(), Arc::new(ManualClock::new(0)));

        let err = intake.import(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, SdkError::Intake { .. }));
    }
}
