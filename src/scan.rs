//! Discovery of class resources under directory roots and archives.

use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tracing::{debug, warn};

use crate::catalog::JarArchive;
use crate::error::ScanError;

/// A validated scan starting point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassRoot {
    Directory(PathBuf),
    Archive(PathBuf),
}

impl ClassRoot {
    pub fn open(path: &Path) -> Result<Self, ScanError> {
        if !path.exists() {
            return Err(ScanError::PathNotFound {
                path: path.to_path_buf(),
            });
        }
        if path.is_dir() {
            Ok(Self::Directory(path.to_path_buf()))
        } else {
            JarArchive::open(path)?;
            Ok(Self::Archive(path.to_path_buf()))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Directory(p) | Self::Archive(p) => p,
        }
    }

    /// Every `.class` resource under this root as a `/`-separated relative name.
    pub fn list_classes(&self) -> Result<Vec<String>, ScanError> {
        match self {
            Self::Directory(base) => Ok(scan_class_files(base)),
            Self::Archive(path) => Ok(JarArchive::open(path)?.class_entries()),
        }
    }

    pub fn reader(&self) -> Result<RootReader, ScanError> {
        match self {
            Self::Directory(base) => Ok(RootReader::Directory(base.clone())),
            Self::Archive(path) => Ok(RootReader::Archive(JarArchive::open(path)?)),
        }
    }
}

/// Reads class bytes from one root. Dropping it releases any mapped archive.
pub enum RootReader {
    Directory(PathBuf),
    Archive(JarArchive),
}

impl RootReader {
    pub fn read(&mut self, resource: &str) -> Result<Vec<u8>, ScanError> {
        match self {
            Self::Directory(base) => {
                let path = base.join(resource);
                std::fs::read(&path).map_err(|e| ScanError::ResourceUnavailable {
                    resource: path.display().to_string(),
                    reason: e.to_string(),
                })
            }
            Self::Archive(archive) => archive.read(resource),
        }
    }
}

/// The class resources of one root, sorted and already filtered.
#[derive(Debug, Clone)]
pub struct RootListing<'a> {
    pub root: &'a ClassRoot,
    pub resources: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ClassSource {
    roots: Vec<ClassRoot>,
    include_nested: bool,
}

impl ClassSource {
    /// Validates every root up front; nothing is scanned if one is missing.
    pub fn open(paths: &[PathBuf], include_nested: bool) -> Result<Self, ScanError> {
        let roots = paths
            .iter()
            .map(|p| ClassRoot::open(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            roots,
            include_nested,
        })
    }

    /// Lists each root in argument order. A resource already provided by an
    /// earlier root is shadowed and left out of later ones.
    pub fn enumerate(&self) -> Result<Vec<RootListing<'_>>, ScanError> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut listings = Vec::with_capacity(self.roots.len());

        for root in &self.roots {
            let mut resources: Vec<String> = root
                .list_classes()?
                .into_iter()
                .filter(|r| is_scannable(r, self.include_nested))
                .collect();
            resources.sort();
            resources.dedup();
            resources.retain(|r| {
                let fresh = seen.insert(r.clone());
                if !fresh {
                    debug!(resource = %r, root = %root.path().display(), "shadowed by an earlier root");
                }
                fresh
            });

            debug!(root = %root.path().display(), classes = resources.len(), "enumerated root");
            listings.push(RootListing { root, resources });
        }

        Ok(listings)
    }
}

pub fn scan_class_files(base_path: &Path) -> Vec<String> {
    let (tx, rx) = mpsc::channel();

    let walker = WalkBuilder::new(base_path)
        .hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .parents(false)
        .build_parallel();

    walker.run(|| {
        let tx = tx.clone();
        Box::new(move |entry| {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && path.extension().is_some_and(|e| e == "class") {
                        let _ = tx.send(path.to_path_buf());
                    }
                }
                Err(e) => warn!("skipping unreadable entry: {e}"),
            }
            ignore::WalkState::Continue
        })
    });

    drop(tx);
    rx.iter()
        .filter_map(|p| resource_name(base_path, &p))
        .collect()
}

fn resource_name(base: &Path, file: &Path) -> Option<String> {
    let rel = file.strip_prefix(base).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    Some(parts.join("/"))
}

/// Drops module/package descriptors, versioned `META-INF` copies and,
/// unless asked for, nested classes.
pub fn is_scannable(resource: &str, include_nested: bool) -> bool {
    let Some(stem) = resource.strip_suffix(".class") else {
        return false;
    };
    if resource.starts_with("META-INF/") {
        return false;
    }
    let simple = stem.rsplit('/').next().unwrap_or(stem);
    if simple == "module-info" || simple == "package-info" {
        return false;
    }
    include_nested || !simple.contains('$')
}
