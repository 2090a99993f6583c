/*!
 * XML writer implementation for srcdump
 */

use std::fs::File;
use std::io::{self, BufWriter, Write};

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::warn;

use crate::config::Config;
use crate::error::{Result, SrcDumpError};
use crate::types::{ExportDocument, FileRecord, WriteMode};
use crate::utils::is_xml_char;

/// XML writer for export documents
pub struct XmlWriter {
    /// Writer configuration
    config: Config,
}

impl XmlWriter {
    /// Create a new XML writer
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Write the document to the configured output file
    ///
    /// Falls back to compact escaped output when some content cannot live
    /// in a CDATA section.
    pub fn write(&self, document: &ExportDocument) -> Result<WriteMode> {
        let mode = match check_cdata_safe(document) {
            Ok(()) => WriteMode::Pretty,
            Err(e) => {
                warn!("{}", e);
                warn!("Writing unformatted XML without CDATA sections instead.");
                WriteMode::Raw
            }
        };

        let output_error = |source: io::Error| SrcDumpError::OutputWrite {
            path: self.config.output_file.display().to_string(),
            source,
        };

        let file = File::create(&self.config.output_file).map_err(output_error)?;
        let mut writer = render(document, mode, BufWriter::new(file)).map_err(output_error)?;
        writer.flush().map_err(output_error)?;

        Ok(mode)
    }
}

/// Serialize a document into `inner` and hand it back
pub fn render<W: Write>(document: &ExportDocument, mode: WriteMode, inner: W) -> io::Result<W> {
    match mode {
        WriteMode::Pretty => {
            let mut xml_writer = Writer::new_with_indent(inner, b' ', 2);
            write_project(document, mode, &mut xml_writer)?;
            let mut inner = xml_writer.into_inner();
            inner.write_all(b"\n")?;
            Ok(inner)
        }
        WriteMode::Raw => {
            let mut xml_writer = Writer::new(inner);
            write_project(document, mode, &mut xml_writer)?;
            Ok(xml_writer.into_inner())
        }
    }
}

/// Render a document into an in-memory string
#[cfg(test)]
pub(crate) fn render_to_string(document: &ExportDocument, mode: WriteMode) -> io::Result<String> {
    let bytes = render(document, mode, Vec::new())?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Fail if any content holds characters XML 1.0 cannot represent
pub fn check_cdata_safe(document: &ExportDocument) -> Result<()> {
    for file in &document.files {
        if let Some(c) = file.content.chars().find(|&c| !is_xml_char(c)) {
            crate::bail!(
                Serialization,
                "{} contains character U+{:04X}, which is not allowed in XML",
                file.relative_path,
                c as u32
            );
        }
    }
    Ok(())
}

/// Split content so that no section contains the CDATA terminator
fn cdata_sections(content: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut start = 0;
    for (idx, _) in content.match_indices("]]>") {
        sections.push(&content[start..idx + 2]);
        start = idx + 2;
    }
    sections.push(&content[start..]);
    sections
}

fn write_project<W: Write>(
    document: &ExportDocument,
    mode: WriteMode,
    writer: &mut Writer<W>,
) -> io::Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut start_tag = BytesStart::new("project");
    start_tag.push_attribute(("name", document.project_name.as_str()));

    if document.files.is_empty() {
        return writer.write_event(Event::Empty(start_tag));
    }

    writer.write_event(Event::Start(start_tag))?;
    for file in &document.files {
        write_file(file, mode, writer)?;
    }
    writer.write_event(Event::End(BytesEnd::new("project")))?;

    Ok(())
}

/// Write a single file record
fn write_file<W: Write>(file: &FileRecord, mode: WriteMode, writer: &mut Writer<W>) -> io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new("file")))?;

    writer.write_event(Event::Start(BytesStart::new("path")))?;
    writer.write_event(Event::Text(BytesText::new(&file.relative_path)))?;
    writer.write_event(Event::End(BytesEnd::new("path")))?;

    if file.content.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new("content")))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new("content")))?;
        match mode {
            WriteMode::Pretty => {
                for section in cdata_sections(&file.content) {
                    writer.write_event(Event::CData(BytesCData::new(section)))?;
                }
            }
            WriteMode::Raw => {
                writer.write_event(Event::Text(BytesText::new(&file.content)))?;
            }
        }
        writer.write_event(Event::End(BytesEnd::new("content")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("file")))?;

    Ok(())
}
