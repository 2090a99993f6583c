/*!
 * Core types and data structures for the srcdump application
 */

/// A single exported source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path relative to the project root, always `/`-separated
    pub relative_path: String,
    /// Decoded file text, or a human-readable error message
    pub content: String,
    /// Set when the file could not be read
    pub read_error: Option<String>,
}

impl FileRecord {
    /// Create a record for a successfully read file
    pub fn new(relative_path: String, content: String) -> Self {
        Self {
            relative_path,
            content,
            read_error: None,
        }
    }

    /// Create a record for a file that failed to read
    pub fn unreadable(relative_path: String, error: impl std::fmt::Display) -> Self {
        let error = error.to_string();
        Self {
            relative_path,
            content: format!("Error reading file: {}", error),
            read_error: Some(error),
        }
    }

    /// Whether the file was read successfully
    pub fn is_ok(&self) -> bool {
        self.read_error.is_none()
    }
}

/// Everything that ends up in one output document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportDocument {
    /// Base name of the scanned project directory
    pub project_name: String,
    /// Files in traversal order
    pub files: Vec<FileRecord>,
}

impl ExportDocument {
    /// Create an empty document for a project
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            files: Vec::new(),
        }
    }

    /// Number of files that were read successfully
    pub fn included_count(&self) -> usize {
        self.files.iter().filter(|f| f.is_ok()).count()
    }

    /// Number of files recorded with a read error
    pub fn error_count(&self) -> usize {
        self.files.len() - self.included_count()
    }
}

/// How the document ended up being serialized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Indented output with CDATA content
    Pretty,
    /// Compact output with escaped text content
    Raw,
}
