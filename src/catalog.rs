use memmap2::Mmap;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

use crate::error::ScanError;

/// A memory-mapped jar (or any zip) opened for reading class entries.
pub struct JarArchive {
    path: PathBuf,
    archive: ZipArchive<Cursor<Mmap>>,
}

impl JarArchive {
    pub fn open(path: &Path) -> Result<Self, ScanError> {
        let archive_error = |reason: String| ScanError::Archive {
            path: path.to_path_buf(),
            reason,
        };

        let file = File::open(path).map_err(|e| archive_error(e.to_string()))?;
        // SAFETY: The file is opened read-only and the map is owned by the archive,
        // so it lives exactly as long as the reader that borrows it.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| archive_error(format!("mmap failed: {e}")))?;
        let archive = ZipArchive::new(Cursor::new(mmap))
            .map_err(|e| archive_error(format!("not a zip archive: {e}")))?;

        Ok(Self {
            path: path.to_path_buf(),
            archive,
        })
    }

    /// Names of every `.class` entry, in archive order.
    pub fn class_entries(&self) -> Vec<String> {
        self.archive
            .file_names()
            .filter(|name| name.ends_with(".class"))
            .map(str::to_string)
            .collect()
    }

    pub fn read(&mut self, entry: &str) -> Result<Vec<u8>, ScanError> {
        let unavailable = |reason: String| ScanError::ResourceUnavailable {
            resource: format!("{}!/{entry}", self.path.display()),
            reason,
        };

        let mut file = self
            .archive
            .by_name(entry)
            .map_err(|e| unavailable(e.to_string()))?;
        let mut bytes = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut bytes)
            .map_err(|e| unavailable(e.to_string()))?;
        Ok(bytes)
    }
}
