//! Archive writing
//!
//! The zip writer never leaves a half-written file at the destination: the
//! archive is built next to it under a temporary name and renamed into place
//! once complete.

use crate::report::ReportArtifact;
use crate::ExportError;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A file to copy into the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Entry name inside the archive
    pub name: String,

    /// File on disk to copy from
    pub source: PathBuf,
}

/// Writes the report and evidence files to a single archive
pub trait ArchiveWriter {
    /// Write `report` followed by `files` to `destination`
    ///
    /// Any failure aborts the export.
    fn write_archive(
        &self,
        destination: &Path,
        report: &ReportArtifact,
        files: &[ArchiveEntry],
    ) -> Result<(), ExportError>;
}

/// Deflate-compressed zip archives
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiveWriter;

impl ArchiveWriter for ZipArchiveWriter {
    fn write_archive(
        &self,
        destination: &Path,
        report: &ReportArtifact,
        files: &[ArchiveEntry],
    ) -> Result<(), ExportError> {
        let partial = partial_path(destination);

        let result = write_zip(&partial, report, files)
            .and_then(|()| fs::rename(&partial, destination).map_err(ExportError::from));

        if result.is_err() {
            // Best effort: the partial file may not exist yet.
            let _ = fs::remove_file(&partial);
        }
        result
    }
}

fn write_zip(path: &Path, report: &ReportArtifact, files: &[ArchiveEntry]) -> Result<(), ExportError> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(File::create(path)?);

    zip.start_file(report.file_name.clone(), options)?;
    zip.write_all(&report.bytes)?;

    for entry in files {
        let mut source = File::open(&entry.source)?;
        zip.start_file(entry.name.clone(), options)?;
        io::copy(&mut source, &mut zip)?;
    }

    let file = zip.finish()?;
    file.sync_all()?;
    Ok(())
}

/// `<dir>/.<name>.partial` next to the destination
fn partial_path(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "export.zip".to_string());
    destination.with_file_name(format!(".{}.partial", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn report() -> ReportArtifact {
        ReportArtifact {
            file_name: "report.txt".to_string(),
            bytes: b"hello".to_vec(),
        }
    }

    #[test]
    fn test_partial_path_is_sibling() {
        let partial = partial_path(Path::new("/tmp/out/package.zip"));
        assert_eq!(partial, PathBuf::from("/tmp/out/.package.zip.partial"));
    }

    #[test]
    fn test_writes_report_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("scan.csv");
        fs::write(&source, "a,b\n").unwrap();
        let destination = dir.path().join("package.zip");

        let entries = vec![ArchiveEntry {
            name: "scan.csv".to_string(),
            source,
        }];
        ZipArchiveWriter
            .write_archive(&destination, &report(), &entries)
            .unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&destination).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);

        let mut contents = String::new();
        archive
            .by_name("scan.csv")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "a,b\n");
        assert!(!partial_path(&destination).exists());
    }

    #[test]
    fn test_failure_leaves_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("package.zip");
        let entries = vec![ArchiveEntry {
            name: "gone.txt".to_string(),
            source: dir.path().join("gone.txt"),
        }];

        let result = ZipArchiveWriter.write_archive(&destination, &report(), &entries);
        assert!(matches!(result, Err(ExportError::Io(_))));
        assert!(!destination.exists());
        assert!(!partial_path(&destination).exists());
    }
}
