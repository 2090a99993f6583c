/*!
 * Directory and file scanning functionality
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::Config;
use crate::error::Result;
use crate::settings::FilterConfig;
use crate::types::{ExportDocument, FileRecord};
use crate::utils::{decode_lossy, normalize_newlines, to_posix_path};

/// Scanner for project source files
pub struct Scanner {
    /// Scanner configuration
    config: Config,
    /// Inclusion and pruning rules
    filter: FilterConfig,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
    /// Absolute output path, never exported itself
    output_path: Option<PathBuf>,
}

impl Scanner {
    /// Create a new scanner
    pub fn new(config: Config, filter: FilterConfig, progress: Arc<ProgressBar>) -> Self {
        let output_path = config.output_path();
        Self {
            config,
            filter,
            progress,
            output_path,
        }
    }

    /// Scan the project directory and return the export document
    pub fn scan(&self) -> Result<ExportDocument> {
        let root = self.config.project_root()?;
        let project_name = self.config.project_name();

        let candidates = self.collect_files(&root);
        self.progress.set_length(candidates.len() as u64);

        let mut document = ExportDocument::new(project_name);
        for path in candidates {
            document.files.push(self.process_file(&root, &path));
        }

        Ok(document)
    }

    /// List every file that will be exported, in traversal order
    pub fn collect_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        self.visit_directory(root, &mut files);
        files
    }

    /// Record the matching files of one directory, then descend into its subdirectories
    fn visit_directory(&self, dir: &Path, files: &mut Vec<PathBuf>) {
        let entries: Vec<DirEntry> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    self.progress
                        .suspend(|| warn!("Skipping unreadable entry in {}: {}", dir.display(), e));
                    None
                }
            })
            .collect();

        // Split into directories and files
        let (dirs, others): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(|e| e.file_type().is_dir());

        for entry in others {
            // Symlinked directories are listed but never walked
            if entry.path_is_symlink() && entry.path().is_dir() {
                debug!("Not following directory symlink {}", entry.path().display());
                continue;
            }
            if self.should_include(entry.path()) {
                files.push(entry.into_path());
            }
        }

        for entry in dirs {
            let name = entry.file_name().to_string_lossy();
            if self.filter.should_prune_directory(&name) {
                debug!("Pruning {}", entry.path().display());
                continue;
            }
            self.visit_directory(entry.path(), files);
        }
    }

    /// Check if a file passes the omit and source rules
    pub fn should_include(&self, path: &Path) -> bool {
        if self.output_path.as_deref() == Some(path) {
            return false;
        }

        let file_name = path.file_name().unwrap_or_default().to_string_lossy();
        if self.filter.should_skip_file(&file_name) {
            return false;
        }
        self.filter.is_source_file(&file_name)
    }

    /// Read a single file into a record, keeping read failures as content
    fn process_file(&self, root: &Path, abs_path: &Path) -> FileRecord {
        let rel_path = to_posix_path(abs_path.strip_prefix(root).unwrap_or(abs_path));

        self.progress.inc(1);
        self.progress.set_message(rel_path.clone());
        self.progress.suspend(|| info!("  Adding: {}", rel_path));

        match fs::read(abs_path) {
            Ok(bytes) => FileRecord::new(rel_path, normalize_newlines(decode_lossy(&bytes))),
            Err(e) => {
                self.progress
                    .suspend(|| warn!("    Warning: Could not read file {}: {}", rel_path, e));
                FileRecord::unreadable(rel_path, e)
            }
        }
    }
}
