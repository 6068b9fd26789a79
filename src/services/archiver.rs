//! Archiver - bundles the final receipt PDFs into a single ZIP.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;

/// Filename pattern of archivable receipts: `receipt_*.pdf`
const RECEIPT_PREFIX: &str = "receipt_";
const RECEIPT_SUFFIX: &str = ".pdf";

/// Writes the receipts ZIP deliverable.
pub struct Archiver {
    zip_path: PathBuf,
}

impl Archiver {
    pub fn new(zip_path: impl Into<PathBuf>) -> Self {
        Self {
            zip_path: zip_path.into(),
        }
    }

    /// Archive every `receipt_*.pdf` found directly in `receipts_dir`.
    ///
    /// Entries are added in sorted name order for deterministic output.
    /// Returns the number of archived files; an empty directory still yields a
    /// valid (empty) archive.
    pub fn archive_receipts(&self, receipts_dir: &Path) -> Result<usize> {
        let mut names: Vec<String> = fs::read_dir(receipts_dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| matches_receipt_pattern(name))
            .collect();
        names.sort();

        let mut writer = ZipWriter::new(File::create(&self.zip_path)?);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for name in &names {
            debug!("archiving {}", name);
            writer.start_file(name.as_str(), options)?;
            let mut input = File::open(receipts_dir.join(name))?;
            io::copy(&mut input, &mut writer)?;
        }
        writer.finish()?;

        info!(
            "📦 Archived {} receipt(s) into {}",
            names.len(),
            self.zip_path.display()
        );
        Ok(names.len())
    }
}

fn matches_receipt_pattern(name: &str) -> bool {
    name.starts_with(RECEIPT_PREFIX) && name.ends_with(RECEIPT_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn touch(path: &Path, contents: &[u8]) {
        fs::write(path, contents).unwrap();
    }

    fn zip_entry_names(path: &Path) -> Vec<String> {
        let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    #[test]
    fn archives_only_matching_receipts() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("receipt_1.pdf"), b"pdf one");
        touch(&tmp.path().join("receipt_2.pdf"), b"pdf two");
        touch(&tmp.path().join("robot_preview_1.png"), b"png");
        touch(&tmp.path().join("notes.txt"), b"scratch");

        let zip_path = tmp.path().join("receipts.zip");
        let count = Archiver::new(&zip_path).archive_receipts(tmp.path()).unwrap();

        assert_eq!(count, 2);
        let mut names = zip_entry_names(&zip_path);
        names.sort();
        assert_eq!(names, vec!["receipt_1.pdf", "receipt_2.pdf"]);
    }

    #[test]
    fn empty_directory_yields_valid_empty_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let zip_path = tmp.path().join("receipts.zip");
        let count = Archiver::new(&zip_path).archive_receipts(tmp.path()).unwrap();

        assert_eq!(count, 0);
        assert!(zip_entry_names(&zip_path).is_empty());
    }

    #[test]
    fn rerun_overwrites_previous_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let zip_path = tmp.path().join("receipts.zip");
        let archiver = Archiver::new(&zip_path);

        touch(&tmp.path().join("receipt_1.pdf"), b"pdf one");
        archiver.archive_receipts(tmp.path()).unwrap();

        fs::remove_file(tmp.path().join("receipt_1.pdf")).unwrap();
        touch(&tmp.path().join("receipt_2.pdf"), b"pdf two");
        let count = archiver.archive_receipts(tmp.path()).unwrap();

        assert_eq!(count, 1);
        assert_eq!(zip_entry_names(&zip_path), vec!["receipt_2.pdf"]);
    }

    #[test]
    fn archived_bytes_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("receipt_5.pdf"), b"%PDF-1.5 fake");
        let zip_path = tmp.path().join("receipts.zip");
        Archiver::new(&zip_path).archive_receipts(tmp.path()).unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        let mut entry = archive.by_name("receipt_5.pdf").unwrap();
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).unwrap();
        assert_eq!(contents, b"%PDF-1.5 fake");
    }
}
