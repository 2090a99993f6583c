/*!
 * srcdump - Export a project's source files into a single XML document
 *
 * This library walks a project directory, keeps the files selected by a
 * YAML settings file, and writes their paths and contents as CDATA blocks
 * for use as context for Large Language Models.
 */

pub mod config;
pub mod error;
pub mod exporter;
pub mod filter;
pub mod logger;
pub mod report;
pub mod scanner;
pub mod settings;
pub mod types;
pub mod utils;
pub mod writer;

#[cfg(test)]
mod tests;

// Re-export main components for easier access
pub use config::{Args, Config};
pub use error::{Result, SrcDumpError};
pub use exporter::{export, Export};
pub use filter::{is_source_file, should_prune_directory, should_skip_file};
pub use report::{FileReportInfo, ReportFormat, Reporter, ScanReport};
pub use scanner::Scanner;
pub use settings::{FilterConfig, SettingsCache};
pub use types::{ExportDocument, FileRecord, WriteMode};
pub use writer::XmlWriter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
