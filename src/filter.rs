/*!
 * File inclusion and directory pruning rules
 */

use std::collections::BTreeSet;

/// Returns true if `name` is a configured filename or ends with a configured extension
pub fn is_source_file(name: &str, extensions: &BTreeSet<String>, filenames: &BTreeSet<String>) -> bool {
    let name = name.to_lowercase();
    if filenames.contains(&name) {
        return true;
    }
    extensions.iter().any(|ext| name.ends_with(ext.as_str()))
}

/// Returns true if a directory named `name` must not be descended into
pub fn should_prune_directory(name: &str, omit_patterns: &BTreeSet<String>) -> bool {
    let name = name.to_lowercase();
    if omit_patterns.contains(&name) {
        return true;
    }
    omit_patterns
        .iter()
        .filter(|pattern| pattern.starts_with('*') || pattern.ends_with('*'))
        .any(|pattern| name.ends_with(pattern.trim_matches('*')))
}

/// Returns true if a file named `name` must be left out of the export
///
/// Only patterns with a wildcard on one end are honored here; patterns
/// wrapped in `*` on both sides apply to directories alone.
pub fn should_skip_file(name: &str, omit_patterns: &BTreeSet<String>) -> bool {
    let name = name.to_lowercase();
    if omit_patterns.contains(&name) {
        return true;
    }
    omit_patterns
        .iter()
        .filter(|pattern| pattern.starts_with('*') != pattern.ends_with('*'))
        .any(|pattern| name.ends_with(pattern.trim_matches('*')))
}
