/*!
 * Configuration handling for srcdump
 */

use std::fs;
use std::path::{Component, Path, PathBuf};

use clap::Parser;
use clap_complete::Shell;

use crate::error::Result;

/// Command-line arguments for srcdump
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "srcdump",
    version = env!("CARGO_PKG_VERSION"),
    about = "Create an XML representation of a project's source files",
    long_about = "Walks a project directory, keeps the files matching the configured source extensions and file names, and writes their paths and contents into a single XML document."
)]
pub struct Args {
    /// Path to the project directory
    #[clap(required_unless_present = "generate")]
    pub project_dir: Option<String>,

    /// Name of the output XML file
    #[clap(short = 'o', long, default_value = "project_sources.xml")]
    pub output: String,

    /// Path to the YAML configuration file
    #[clap(short = 'c', long, default_value = "configs/config.yaml")]
    pub config: String,

    /// Additional file extensions to include
    #[clap(short = 'a', long = "additional_include", num_args = 0..)]
    pub additional_include: Vec<String>,

    /// Additional directory/file names or patterns (*.log) to omit
    #[clap(long, num_args = 0..)]
    pub omit: Vec<String>,

    /// Enable debug logging
    #[clap(long)]
    pub debug: bool,

    /// Hide the progress bar and the final report
    #[clap(short = 'q', long)]
    pub quiet: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Project directory to export
    pub target_dir: PathBuf,

    /// Output XML file path
    pub output_file: PathBuf,

    /// Settings file path
    pub config_path: PathBuf,

    /// Extra extensions for this run
    pub additional_include: Vec<String>,

    /// Extra omit patterns for this run
    pub omit: Vec<String>,

    /// Verbose logging
    pub debug: bool,

    /// Suppress progress and report output
    pub quiet: bool,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            target_dir: PathBuf::from(args.project_dir.unwrap_or_else(|| ".".to_string())),
            output_file: PathBuf::from(args.output),
            config_path: PathBuf::from(args.config),
            additional_include: args.additional_include,
            omit: args.omit,
            debug: args.debug,
            quiet: args.quiet,
        }
    }

    /// Create a configuration with default settings for a project directory
    pub fn new(target_dir: impl Into<PathBuf>, output_file: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            output_file: output_file.into(),
            config_path: PathBuf::from("configs/config.yaml"),
            additional_include: Vec::new(),
            omit: Vec::new(),
            debug: false,
            quiet: true,
        }
    }

    /// Absolute, symlink-free path of the project directory
    pub fn project_root(&self) -> Result<PathBuf> {
        let root = fs::canonicalize(&self.target_dir)
            .map_err(|_| crate::error!(DirectoryNotFound, "{}", self.target_dir.display()))?;
        crate::ensure!(root.is_dir(), DirectoryNotFound, "{}", self.target_dir.display());
        Ok(root)
    }

    /// Base name of the project directory as given, without resolving symlinks
    pub fn project_name(&self) -> String {
        let absolute = std::path::absolute(&self.target_dir).unwrap_or_else(|_| self.target_dir.clone());

        let mut normalized = PathBuf::new();
        for component in absolute.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    normalized.pop();
                }
                other => normalized.push(other),
            }
        }

        normalized
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    /// Absolute path the output file will have, whether or not it exists yet
    pub fn output_path(&self) -> Option<PathBuf> {
        if let Ok(path) = fs::canonicalize(&self.output_file) {
            return Some(path);
        }
        let name = self.output_file.file_name()?;
        let parent = match self.output_file.parent() {
            Some(p) if p != Path::new("") => fs::canonicalize(p).ok()?,
            _ => std::env::current_dir().ok()?,
        };
        Some(parent.join(name))
    }

    /// Validate the configuration and return the project root
    pub fn validate(&self) -> Result<PathBuf> {
        let root = self.project_root()?;

        // Check if output file directory exists
        if let Some(parent) = self.output_file.parent() {
            crate::ensure!(
                parent == Path::new("") || parent.is_dir(),
                Config,
                "Output directory not found: {}",
                parent.display()
            );
        }

        Ok(root)
    }
}
