/*!
 * End-to-end export: validate, scan, write
 */

use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::scanner::Scanner;
use crate::settings::FilterConfig;
use crate::types::{ExportDocument, WriteMode};
use crate::writer::XmlWriter;

/// Result of a completed export
#[derive(Debug, Clone)]
pub struct Export {
    /// Everything that was written
    pub document: ExportDocument,
    /// Serialization used for the output file
    pub write_mode: WriteMode,
}

/// Export the configured project into its output file
///
/// `filter` is the resolved settings filter; per-run additions from `config`
/// are merged on top of it. Nothing is written when the project directory
/// does not exist.
pub fn export(config: &Config, filter: &FilterConfig, progress: Arc<ProgressBar>) -> Result<Export> {
    let root = config.validate()?;
    let filter = filter.with_additions(&config.additional_include, &config.omit);

    let config_path = std::path::absolute(&config.config_path).unwrap_or_else(|_| config.config_path.clone());
    progress.suspend(|| {
        info!("Scanning project: {}", root.display());
        info!("Using config: {}", config_path.display());
        info!("Omitting directories named (case-insensitive): {:?}", filter.omit_patterns);
        info!("Output XML: {}", config.output_file.display());
    });

    let scanner = Scanner::new(config.clone(), filter, Arc::clone(&progress));
    let document = scanner.scan()?;

    let writer = XmlWriter::new(config.clone());
    let write_mode = writer.write(&document)?;

    progress.suspend(|| match write_mode {
        WriteMode::Pretty => info!(
            "Successfully created XML: {} ({} files included)",
            config.output_file.display(),
            document.included_count()
        ),
        WriteMode::Raw => info!(
            "Successfully created XML (raw, non-pretty-printed): {} ({} files included)",
            config.output_file.display(),
            document.included_count()
        ),
    });

    Ok(Export { document, write_mode })
}
