//! In-memory export archives
//!
//! An export finishes as a zip file. [`Archive`] holds its decoded entries so
//! the selector can pick files out without touching the filesystem.
//! [`Archive::extract_to`] is available when the files are wanted on disk.

use crate::error::{Error, Result};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One file inside an export archive
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path-like entry name as stored in the zip
    pub name: String,
    /// Raw (decompressed) bytes
    pub data: Vec<u8>,
}

impl ArchiveEntry {
    /// Entry bytes decoded as UTF-8 (invalid sequences replaced) and trimmed
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).trim().to_string()
    }
}

/// A downloaded export, decomposed into its entries
///
/// Entries keep the zip's central-directory order; directory entries are
/// dropped.
#[derive(Clone, Debug, Default)]
pub struct Archive {
    entries: Vec<ArchiveEntry>,
}

impl Archive {
    /// Parse zip bytes into an archive
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let size = bytes.len();
        let mut zip = zip::ZipArchive::new(Cursor::new(bytes))?;

        let mut entries = Vec::with_capacity(zip.len());
        for i in 0..zip.len() {
            let mut file = zip.by_index(i)?;
            if file.is_dir() {
                continue;
            }

            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data).map_err(|e| {
                Error::CorruptArchive(zip::result::ZipError::Io(std::io::Error::other(format!(
                    "failed to read entry {}: {}",
                    file.name(),
                    e
                ))))
            })?;

            entries.push(ArchiveEntry {
                name: file.name().to_string(),
                data,
            });
        }

        debug!(size, entries = entries.len(), "parsed export archive");
        Ok(Self { entries })
    }

    /// Build an archive directly from entries
    pub fn from_entries(entries: Vec<ArchiveEntry>) -> Self {
        Self { entries }
    }

    /// Read-only view of every file entry
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Number of file entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the archive has no file entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write every entry verbatim below `dest`, creating directories as needed
    ///
    /// Entries whose names would resolve outside `dest` are skipped.
    pub fn extract_to(&self, dest: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dest).map_err(|e| {
            Error::Io(std::io::Error::other(format!(
                "failed to create destination {}: {}",
                dest.display(),
                e
            )))
        })?;

        let mut written = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let Some(relative) = enclosed_path(&entry.name) else {
                warn!(name = %entry.name, "skipping entry with unsafe path");
                continue;
            };
            let file_path = dest.join(relative);

            if let Some(parent) = file_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::Io(std::io::Error::other(format!(
                        "failed to create parent directories: {}",
                        e
                    )))
                })?;
            }

            std::fs::write(&file_path, &entry.data).map_err(|e| {
                Error::Io(std::io::Error::other(format!(
                    "failed to write {}: {}",
                    file_path.display(),
                    e
                )))
            })?;
            written.push(file_path);
        }

        info!(
            ?dest,
            extracted_count = written.len(),
            "export archive extracted"
        );
        Ok(written)
    }
}

/// Relative path for an entry name, or None if it is absolute or escapes upward
fn enclosed_path(name: &str) -> Option<PathBuf> {
    use std::path::Component;

    if name.contains('\0') {
        return None;
    }
    let mut out = PathBuf::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if out.as_os_str().is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Build zip bytes from `(name, content)` pairs, stored uncompressed
#[cfg(test)]
pub(crate) fn zip_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    use std::io::Write;

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, content) in files {
        writer.start_file(*name, options).expect("start_file failed");
        writer.write_all(content).expect("write failed");
    }
    writer.finish().expect("finish failed").into_inner()
}
