//! Scan → decode → classify → aggregate, run once from start to finish.
//!
//! Roots and the classes inside them are handed to rayon; each worker owns
//! its own [`RootReader`] so an archive is mapped at most once per worker.
//! All per-class results meet in one collected `Vec` before aggregation.

use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::classfile::ClassFile;
use crate::classify::ClassUnit;
use crate::config::{Config, DecodePolicy};
use crate::error::{DecodeError, ScanError};
use crate::report::AggregatedReport;
use crate::rules::{ClassificationResult, classify_class};
use crate::scan::{ClassSource, RootListing, RootReader};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub roots: usize,
    pub classes_scanned: usize,
    pub classes_skipped: usize,
    pub classes_reported: usize,
    pub methods_reported: usize,
}

#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub report: AggregatedReport,
    pub summary: ScanSummary,
}

/// Decodes and classifies a single class file.
pub fn analyze_class_bytes(
    bytes: &[u8],
    config: &Config,
) -> Result<ClassificationResult, DecodeError> {
    let class = ClassFile::parse(bytes)?;
    let unit = ClassUnit::from_class_file(&class);
    Ok(classify_class(&unit, config))
}

pub fn run(paths: &[PathBuf], config: &Config) -> Result<ScanOutcome, ScanError> {
    let source = ClassSource::open(paths, config.include_nested)?;
    scan_source(&source, config)
}

pub fn scan_source(source: &ClassSource, config: &Config) -> Result<ScanOutcome, ScanError> {
    let listings = source.enumerate()?;
    let classes_scanned = listings.iter().map(|l| l.resources.len()).sum();

    let per_root: Vec<Vec<Option<ClassificationResult>>> = listings
        .par_iter()
        .map(|listing| scan_root(listing, config))
        .collect::<Result<_, _>>()?;

    let results: Vec<ClassificationResult> = per_root.into_iter().flatten().flatten().collect();
    let classes_skipped = classes_scanned - results.len();
    let report = AggregatedReport::from_results(results);

    let summary = ScanSummary {
        roots: listings.len(),
        classes_scanned,
        classes_skipped,
        classes_reported: report.classes.len(),
        methods_reported: report.method_count(),
    };
    info!(
        roots = summary.roots,
        scanned = summary.classes_scanned,
        skipped = summary.classes_skipped,
        reported = summary.classes_reported,
        methods = summary.methods_reported,
        "scan complete"
    );

    Ok(ScanOutcome { report, summary })
}

fn scan_root(
    listing: &RootListing<'_>,
    config: &Config,
) -> Result<Vec<Option<ClassificationResult>>, ScanError> {
    listing
        .resources
        .par_iter()
        .map_init(
            || listing.root.reader(),
            |reader, resource| match reader {
                Ok(reader) => scan_resource(reader, resource, config),
                Err(e) => Err(ScanError::ResourceUnavailable {
                    resource: resource.clone(),
                    reason: e.to_string(),
                }),
            },
        )
        .collect()
}

fn scan_resource(
    reader: &mut RootReader,
    resource: &str,
    config: &Config,
) -> Result<Option<ClassificationResult>, ScanError> {
    let bytes = reader.read(resource)?;
    match analyze_class_bytes(&bytes, config) {
        Ok(result) => Ok(Some(result)),
        Err(source) => {
            let class = class_name_of(resource);
            if config.on_decode_error == DecodePolicy::Skip {
                warn!(class = %class, error = %source, "skipping class that failed to decode");
                Ok(None)
            } else {
                Err(ScanError::Decode { class, source })
            }
        }
    }
}

/// `com/acme/Foo.class` → `com.acme.Foo`
pub fn class_name_of(resource: &str) -> String {
    resource
        .strip_suffix(".class")
        .unwrap_or(resource)
        .replace(['/', '\\'], ".")
}
