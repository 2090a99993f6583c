/*!
 * Reporting functionality for srcdump
 *
 * Provides functionality for generating formatted reports of export results
 * using the tabled library for clean, consistent table rendering.
 */

use std::fs;
use std::path::Path;
use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::exporter::Export;
use crate::types::WriteMode;
use crate::utils::format_file_size;

/// Information about a file in the report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReportInfo {
    /// Number of lines in the file
    pub lines: usize,
    /// Number of characters in the file
    pub chars: usize,
    /// Whether the file failed to read
    pub failed: bool,
}

/// Statistics for an export run
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Output file path
    pub output_file: String,
    /// Size of the written output, if it could be read back
    pub output_size: Option<u64>,
    /// Time taken to scan and write
    pub duration: Duration,
    /// Number of files read successfully
    pub files_included: usize,
    /// Number of files recorded with a read error
    pub read_errors: usize,
    /// Total number of lines
    pub total_lines: usize,
    /// Total number of characters
    pub total_chars: usize,
    /// Serialization used for the output
    pub write_mode: WriteMode,
    /// Details for each file, in document order
    pub file_details: Vec<(String, FileReportInfo)>,
}

impl ScanReport {
    /// Collect statistics from a finished export
    pub fn new(export: &Export, output_file: &Path, duration: Duration) -> Self {
        let file_details: Vec<(String, FileReportInfo)> = export
            .document
            .files
            .iter()
            .map(|file| {
                let info = if file.is_ok() {
                    FileReportInfo {
                        lines: file.content.lines().count(),
                        chars: file.content.chars().count(),
                        failed: false,
                    }
                } else {
                    FileReportInfo {
                        failed: true,
                        ..Default::default()
                    }
                };
                (file.relative_path.clone(), info)
            })
            .collect();

        Self {
            output_file: output_file.display().to_string(),
            output_size: fs::metadata(output_file).ok().map(|m| m.len()),
            duration,
            files_included: export.document.included_count(),
            read_errors: export.document.error_count(),
            total_lines: file_details.iter().map(|(_, i)| i.lines).sum(),
            total_chars: file_details.iter().map(|(_, i)| i.chars).sum(),
            write_mode: export.write_mode,
            file_details,
        }
    }
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for export results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string based on export statistics
    pub fn generate_report(&self, report: &ScanReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &ScanReport) {
        println!("\n{}", self.generate_report(report));
    }

    // Keep the tail of long paths, cutting at a separator where possible
    fn format_path(&self, path: &str, max_len: usize) -> String {
        if path.chars().count() <= max_len {
            return path.to_string();
        }

        let mut segments = Vec::new();
        let mut current_len = 3; // Start with "..."
        for part in path.split('/').rev() {
            let part_len = part.chars().count() + 1;
            if current_len + part_len > max_len {
                break;
            }
            segments.push(part);
            current_len += part_len;
        }

        if segments.is_empty() {
            let tail: String = path.chars().rev().take(max_len - 3).collect::<Vec<_>>().into_iter().rev().collect();
            return format!("...{}", tail);
        }

        let mut result = String::from("...");
        for part in segments.iter().rev() {
            result.push('/');
            result.push_str(part);
        }
        result
    }

    // Create a summary table using the tabled crate
    fn create_summary_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let output_value = match report.output_size {
            Some(size) => format!("{} ({})", report.output_file, format_file_size(size)),
            None => report.output_file.clone(),
        };

        let mode_value = match report.write_mode {
            WriteMode::Pretty => "pretty (CDATA)",
            WriteMode::Raw => "raw (escaped, non-pretty-printed)",
        };

        let mut rows = vec![
            SummaryRow {
                key: "📂 Output File".to_string(),
                value: output_value,
            },
            SummaryRow {
                key: "🧾 Output Format".to_string(),
                value: mode_value.to_string(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "📄 Files Included".to_string(),
                value: self.format_number(report.files_included),
            },
        ];

        if report.read_errors > 0 {
            rows.push(SummaryRow {
                key: "⚠️ Read Errors".to_string(),
                value: self.format_number(report.read_errors),
            });
        }

        rows.push(SummaryRow {
            key: "📝 Total Lines".to_string(),
            value: self.format_number(report.total_lines),
        });

        rows.push(SummaryRow {
            key: "📦 LLM Tokens".to_string(),
            value: format!("{} tokens (estimated)", self.format_number(report.total_chars / 4)),
        });

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    // Create a files table using the tabled crate
    fn create_files_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Est. Tokens")]
            tokens: String,
        }

        // Largest files first
        let mut files: Vec<_> = report.file_details.iter().collect();
        files.sort_by(|(_, a), (_, b)| b.chars.cmp(&a.chars));

        let files_to_show = if files.len() > 15 { &files[0..10] } else { &files[..] };

        let rows: Vec<FileRow> = files_to_show
            .iter()
            .map(|(path, info)| FileRow {
                path: self.format_path(path, 60),
                lines: if info.failed {
                    "unreadable".to_string()
                } else {
                    self.format_number(info.lines)
                },
                tokens: self.format_number(info.chars / 4),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    // Generate a console table report
    fn generate_console_report(&self, report: &ScanReport) -> String {
        let summary_table = self.create_summary_table(report);
        let summary_title = "✅  EXPORT COMPLETE";

        if report.file_details.is_empty() {
            return format!("{}\n{}", summary_title, summary_table);
        }

        let files_table = self.create_files_table(report);
        let files_title = if report.file_details.len() > 15 {
            "📋  TOP 10 LARGEST FILES BY CHARACTER COUNT  📋"
        } else {
            "📋  EXPORTED FILES"
        };

        format!(
            "{}\n{}\n\n{}\n{}",
            files_title, files_table, summary_title, summary_table
        )
    }
}
