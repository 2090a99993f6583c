/*!
 * Tests for srcdump export functionality
 */

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use indicatif::ProgressBar;
use quick_xml::events::Event;
use quick_xml::Reader;
use tempfile::tempdir;

use crate::config::Config;
use crate::error::SrcDumpError;
use crate::exporter::export;
use crate::settings::{FilterConfig, SettingsCache};
use crate::types::WriteMode;

// Helper function to create a test project structure
fn setup_test_project() -> io::Result<tempfile::TempDir> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path().join("demo");

    fs::create_dir_all(root.join("src").join("util"))?;
    fs::create_dir_all(root.join("node_modules").join("left-pad"))?;
    fs::create_dir_all(root.join("web").join("node_modules").join("deep"))?;
    fs::create_dir_all(root.join(".git"))?;

    let mut main = File::create(root.join("src").join("Main.PY"))?;
    writeln!(main, "print('hello')")?;

    let mut util = File::create(root.join("src").join("util").join("helpers.go"))?;
    writeln!(util, "package util")?;

    let mut makefile = File::create(root.join("Makefile"))?;
    writeln!(makefile, "all:\n\tgo build")?;

    File::create(root.join("node_modules").join("left-pad").join("index.py"))?;
    File::create(root.join("web").join("node_modules").join("deep").join("x.py"))?;
    File::create(root.join(".git").join("HEAD.py"))?;

    let mut log = File::create(root.join("build.log"))?;
    writeln!(log, "build output")?;

    File::create(root.join("notes.txt"))?;

    Ok(temp_dir)
}

fn write_settings(dir: &Path, body: &str) -> io::Result<std::path::PathBuf> {
    let path = dir.join("config.yaml");
    fs::write(&path, body)?;
    Ok(path)
}

fn default_filter() -> FilterConfig {
    FilterConfig::from_entries([".py", ".go", ".log", "Makefile"], ["node_modules", ".git", "*.log"])
}

fn run(config: &Config, filter: &FilterConfig) -> crate::error::Result<crate::exporter::Export> {
    export(config, filter, Arc::new(ProgressBar::hidden()))
}

// Collect (path, content) pairs from an output document
fn read_records(xml: &str) -> Vec<(String, String)> {
    let mut reader = Reader::from_str(xml);
    let mut records = Vec::new();
    let mut path = String::new();
    let mut content = String::new();
    let mut in_path = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"file" => {
                path.clear();
                content.clear();
            }
            Ok(Event::Start(e)) if e.name().as_ref() == b"path" => in_path = true,
            Ok(Event::End(e)) if e.name().as_ref() == b"path" => in_path = false,
            Ok(Event::Text(e)) if in_path => path.push_str(&e.unescape().unwrap()),
            Ok(Event::CData(e)) => {
                content.push_str(&String::from_utf8(e.into_inner().into_owned()).unwrap())
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"file" => {
                records.push((path.clone(), content.clone()));
            }
            Ok(Event::Eof) => break,
            Err(e) => panic!("Error parsing XML: {}", e),
            _ => (),
        }
    }

    records
}

// Test basic export functionality
#[test]
fn test_basic_export() -> io::Result<()> {
    let temp_dir = setup_test_project()?;
    let root = temp_dir.path().join("demo");
    let output_file = temp_dir.path().join("output.xml");

    let config = Config::new(&root, &output_file);
    let exported = run(&config, &default_filter())?;

    assert_eq!(exported.write_mode, WriteMode::Pretty);
    assert!(output_file.exists());

    let xml = fs::read_to_string(&output_file)?;
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<project name=\"demo\">"));

    let mut paths: Vec<String> = read_records(&xml).into_iter().map(|(p, _)| p).collect();
    paths.sort();
    assert_eq!(paths, vec!["Makefile", "src/Main.PY", "src/util/helpers.go"]);

    Ok(())
}

// Pruned directories never show up at any depth
#[test]
fn test_omitted_directories_are_pruned() -> io::Result<()> {
    let temp_dir = setup_test_project()?;
    let root = temp_dir.path().join("demo");
    let output_file = temp_dir.path().join("output.xml");

    let config = Config::new(&root, &output_file);
    let exported = run(&config, &default_filter())?;

    for file in &exported.document.files {
        assert!(!file.relative_path.contains("node_modules"), "{}", file.relative_path);
        assert!(!file.relative_path.starts_with(".git"), "{}", file.relative_path);
    }

    let xml = fs::read_to_string(&output_file)?;
    assert!(!xml.contains("node_modules"));
    assert!(!xml.contains("HEAD.py"));

    Ok(())
}

// Omit patterns win over matching extensions
#[test]
fn test_log_files_skipped_by_pattern() -> io::Result<()> {
    let temp_dir = setup_test_project()?;
    let root = temp_dir.path().join("demo");

    let config = Config::new(&root, temp_dir.path().join("output.xml"));
    let exported = run(&config, &default_filter())?;

    assert!(exported
        .document
        .files
        .iter()
        .all(|f| f.relative_path != "build.log"));

    Ok(())
}

// Per-run additions extend the configured sets
#[test]
fn test_additional_include_and_omit() -> io::Result<()> {
    let temp_dir = setup_test_project()?;
    let root = temp_dir.path().join("demo");

    let mut config = Config::new(&root, temp_dir.path().join("output.xml"));
    config.additional_include = vec![".TXT".to_string()];
    config.omit = vec!["util".to_string()];

    let exported = run(&config, &default_filter())?;
    let mut paths: Vec<&str> = exported
        .document
        .files
        .iter()
        .map(|f| f.relative_path.as_str())
        .collect();
    paths.sort();

    assert_eq!(paths, vec!["Makefile", "notes.txt", "src/Main.PY"]);

    Ok(())
}

// CDATA keeps markup characters verbatim
#[test]
fn test_markup_content_round_trip() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path().join("project");
    fs::create_dir(&root)?;
    fs::write(root.join("hello.txt"), "a&b<c>")?;
    let output_file = temp_dir.path().join("output.xml");

    let config = Config::new(&root, &output_file);
    run(&config, &FilterConfig::from_entries([".txt"], Vec::<String>::new()))?;

    let xml = fs::read_to_string(&output_file)?;
    assert_eq!(
        read_records(&xml),
        vec![("hello.txt".to_string(), "a&b<c>".to_string())]
    );

    Ok(())
}

// Invalid UTF-8 is dropped rather than failing the run
#[test]
fn test_invalid_utf8_is_dropped() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path().join("project");
    fs::create_dir(&root)?;
    fs::write(root.join("latin1.py"), b"caf\xe9 = 1\n")?;

    let config = Config::new(&root, temp_dir.path().join("output.xml"));
    let exported = run(&config, &FilterConfig::from_entries([".py"], Vec::<String>::new()))?;

    assert_eq!(exported.document.files[0].content, "caf = 1\n");
    assert!(exported.document.files[0].read_error.is_none());

    Ok(())
}

// XML-illegal characters force the raw writer
#[test]
fn test_control_characters_use_raw_fallback() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path().join("project");
    fs::create_dir(&root)?;
    fs::write(root.join("odd.txt"), "bell\u{7} & <tag>")?;
    let output_file = temp_dir.path().join("output.xml");

    let config = Config::new(&root, &output_file);
    let exported = run(&config, &FilterConfig::from_entries([".txt"], Vec::<String>::new()))?;

    assert_eq!(exported.write_mode, WriteMode::Raw);
    let xml = fs::read_to_string(&output_file)?;
    assert!(!xml.contains("CDATA"));
    assert!(xml.contains("&amp; &lt;tag&gt;"));

    Ok(())
}

// Missing project directory produces nothing
#[test]
fn test_missing_project_directory() {
    let temp_dir = tempdir().unwrap();
    let output_file = temp_dir.path().join("output.xml");

    let config = Config::new("/no/such/dir", &output_file);
    let result = run(&config, &default_filter());

    assert!(matches!(result, Err(SrcDumpError::DirectoryNotFound(_))));
    assert!(!output_file.exists());
}

// Unwritable output is reported as an error
#[test]
fn test_output_write_failure() -> io::Result<()> {
    let temp_dir = setup_test_project()?;
    let root = temp_dir.path().join("demo");

    // The output path is an existing directory
    let config = Config::new(&root, temp_dir.path());
    let result = run(&config, &default_filter());

    assert!(matches!(result, Err(SrcDumpError::OutputWrite { .. })));

    Ok(())
}

// Running twice produces identical bytes, even with the output inside the project
#[test]
fn test_export_is_idempotent() -> io::Result<()> {
    let temp_dir = setup_test_project()?;
    let root = temp_dir.path().join("demo");
    let output_file = root.join("project_sources.xml");

    let filter = default_filter().with_additions([".xml"], Vec::<String>::new());
    let config = Config::new(&root, &output_file);

    run(&config, &filter)?;
    let first = fs::read(&output_file)?;
    run(&config, &filter)?;
    let second = fs::read(&output_file)?;

    assert_eq!(first, second);
    assert!(!String::from_utf8_lossy(&second).contains("<path>project_sources.xml</path>"));

    Ok(())
}

// Settings file drives the whole export
#[test]
fn test_export_with_settings_file() -> io::Result<()> {
    let temp_dir = setup_test_project()?;
    let root = temp_dir.path().join("demo");
    let settings_path = write_settings(
        temp_dir.path(),
        "default_settings:\n  source_extensions: ['.go']\n  omit_dirs: ['node_modules']\n",
    )?;

    let mut cache = SettingsCache::new();
    let filter = cache.resolve(&settings_path);
    let mut config = Config::new(&root, temp_dir.path().join("output.xml"));
    config.config_path = settings_path;

    let exported = run(&config, &filter)?;
    let paths: Vec<&str> = exported
        .document
        .files
        .iter()
        .map(|f| f.relative_path.as_str())
        .collect();

    assert_eq!(paths, vec!["src/util/helpers.go"]);

    Ok(())
}

// An empty filter exports an empty project element
#[test]
fn test_missing_settings_exports_nothing() -> io::Result<()> {
    let temp_dir = setup_test_project()?;
    let root = temp_dir.path().join("demo");
    let output_file = temp_dir.path().join("output.xml");

    let mut cache = SettingsCache::new();
    let filter = cache.resolve(&temp_dir.path().join("absent.yaml"));
    let config = Config::new(&root, &output_file);
    let exported = run(&config, &filter)?;

    assert!(exported.document.files.is_empty());
    let xml = fs::read_to_string(&output_file)?;
    assert!(xml.contains("<project name=\"demo\"/>"));

    Ok(())
}

// The project name follows the path as given, not a symlink's target
#[cfg(unix)]
#[test]
fn test_project_name_through_symlinked_root() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let real = temp_dir.path().join("real_dir");
    fs::create_dir(&real)?;
    fs::write(real.join("a.py"), "x = 1\n")?;
    let link = temp_dir.path().join("myproj");
    std::os::unix::fs::symlink(&real, &link)?;
    let output_file = temp_dir.path().join("output.xml");

    let config = Config::new(&link, &output_file);
    let exported = run(&config, &FilterConfig::from_entries([".py"], Vec::<String>::new()))?;

    assert_eq!(exported.document.project_name, "myproj");
    assert_eq!(exported.document.files.len(), 1);
    assert_eq!(exported.document.files[0].relative_path, "a.py");

    let xml = fs::read_to_string(&output_file)?;
    assert!(xml.contains("<project name=\"myproj\">"));

    Ok(())
}

// Line endings are written the way a text-mode read sees them
#[test]
fn test_crlf_content_is_normalized() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path().join("project");
    fs::create_dir(&root)?;
    fs::write(root.join("dos.txt"), "crlf\r\nline\r\n")?;
    let output_file = temp_dir.path().join("output.xml");

    let config = Config::new(&root, &output_file);
    let exported = run(&config, &FilterConfig::from_entries([".txt"], Vec::<String>::new()))?;

    assert_eq!(exported.document.files[0].content, "crlf\nline\n");
    let bytes = fs::read(&output_file)?;
    assert!(!bytes.contains(&b'\r'));
    assert!(String::from_utf8_lossy(&bytes).contains("<![CDATA[crlf\nline\n]]>"));

    Ok(())
}
