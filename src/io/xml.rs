//! XML helpers: flattening metadata documents embedded in product archives,
//! and the small ordered-tree writer used to generate sidecar files.
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;
use zip::ZipArchive;

/// Errors encountered while reading or writing product XML.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Archive {0:?} is not a valid zip file")]
    BadArchive(PathBuf),
    #[error("No XML metadata found in archive {0:?}")]
    NoMetadata(PathBuf),
    #[error("Missing metadata field `{0}`")]
    MissingField(&'static str),
}

/// Flat tag -> text view of a metadata document.
///
/// The product sidecars are shallow documents with unique leaf tags
/// (`product_id`, `start_date`, ...); nested container elements contribute
/// their leaves to the same map.
pub type XmlMap = BTreeMap<String, String>;

/// Parse an XML document into a flat leaf map.
pub fn flatten_xml(text: &str) -> Result<XmlMap, XmlError> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);
    let mut buf = Vec::new();
    let mut curr = String::new();
    let mut map = XmlMap::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                curr = String::from_utf8_lossy(e.name().as_ref()).to_string();
            }
            Event::Text(e) => {
                let txt = e.unescape()?;
                if !curr.is_empty() {
                    map.insert(curr.clone(), txt.to_string());
                }
            }
            Event::End(_) => curr.clear(),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(map)
}

/// Extract and flatten every `*.xml` member of a zip archive.
pub fn extract_xml_from_zip(zip_path: &Path) -> Result<Vec<XmlMap>, XmlError> {
    let file = File::open(zip_path)?;
    let mut archive =
        ZipArchive::new(file).map_err(|_| XmlError::BadArchive(zip_path.to_path_buf()))?;

    let mut maps = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|_| XmlError::BadArchive(zip_path.to_path_buf()))?;
        if !entry.name().ends_with(".xml") {
            continue;
        }
        let mut text = String::new();
        entry.read_to_string(&mut text)?;
        maps.push(flatten_xml(&text)?);
    }
    if maps.is_empty() {
        return Err(XmlError::NoMetadata(zip_path.to_path_buf()));
    }
    Ok(maps)
}

/// Flattened metadata of the first XML member of an archive.
pub fn read_archive_metadata(zip_path: &Path) -> Result<XmlMap, XmlError> {
    let mut maps = extract_xml_from_zip(zip_path)?;
    Ok(maps.remove(0))
}

/// Fetch a required key from a flattened metadata map.
pub fn require<'a>(map: &'a XmlMap, key: &'static str) -> Result<&'a str, XmlError> {
    map.get(key)
        .map(String::as_str)
        .ok_or(XmlError::MissingField(key))
}

/// Ordered XML tree node used to build sidecar documents programmatically.
#[derive(Debug, Clone)]
pub struct XmlElement {
    pub name: String,
    pub text: Option<String>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: &str) -> Self {
        XmlElement {
            name: name.to_string(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_text(name: &str, text: impl Into<String>) -> Self {
        XmlElement {
            name: name.to_string(),
            text: Some(text.into()),
            children: Vec::new(),
        }
    }

    pub fn push(&mut self, child: XmlElement) -> &mut Self {
        self.children.push(child);
        self
    }

    /// Convenience for appending a leaf element.
    pub fn leaf(&mut self, name: &str, text: impl Into<String>) -> &mut Self {
        self.push(XmlElement::with_text(name, text))
    }
}

fn write_element<W: Write>(writer: &mut Writer<W>, el: &XmlElement) -> Result<(), XmlError> {
    if el.text.is_none() && el.children.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(el.name.as_str())))?;
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new(el.name.as_str())))?;
    if let Some(text) = &el.text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for child in &el.children {
        write_element(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(el.name.as_str())))?;
    Ok(())
}

/// Serialize a document to an indented XML string with declaration.
pub fn to_pretty_string(root: &XmlElement) -> Result<String, XmlError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    write_element(&mut writer, root)?;
    let bytes = writer.into_inner();
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write an indented XML document to `path`.
pub fn write_pretty(root: &XmlElement, path: &Path) -> Result<(), XmlError> {
    let text = to_pretty_string(root)?;
    std::fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn sample_archive(dir: &Path) -> PathBuf {
        let path = dir.join("product.zip");
        let file = File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::FileOptions::default();
        zip.start_file("product.xml", options).unwrap();
        zip.write_all(
            b"<GSP><product_id>S3-01-SNT-02</product_id>\
              <start_date>2022-01-01</start_date>\
              <end_date>2022-12-31</end_date>\
              <provider>TRE-A</provider></GSP>",
        )
        .unwrap();
        zip.start_file("product.csv", options).unwrap();
        zip.write_all(b"easting,northing\n1,2\n").unwrap();
        zip.finish().unwrap();
        path
    }

    #[test]
    fn flatten_collects_leaf_tags() {
        let map = flatten_xml(
            "<GSP><product_id>P</product_id><dataset><gsp><burst_id>B1</burst_id></gsp></dataset></GSP>",
        )
        .unwrap();
        assert_eq!(map.get("product_id").unwrap(), "P");
        assert_eq!(map.get("burst_id").unwrap(), "B1");
        assert!(!map.contains_key("dataset"));
    }

    #[test]
    fn extract_from_zip_skips_non_xml_members() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample_archive(dir.path());
        let maps = extract_xml_from_zip(&path).unwrap();
        assert_eq!(maps.len(), 1);
        assert_eq!(maps[0].get("provider").unwrap(), "TRE-A");
    }

    #[test]
    fn archive_without_metadata_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.zip");
        let mut zip = zip::ZipWriter::new(File::create(&path).unwrap());
        zip.start_file("data.csv", zip::write::FileOptions::default())
            .unwrap();
        zip.write_all(b"a,b\n").unwrap();
        zip.finish().unwrap();
        assert!(matches!(
            extract_xml_from_zip(&path),
            Err(XmlError::NoMetadata(_))
        ));
    }

    #[test]
    fn pretty_writer_round_trips() {
        let mut root = XmlElement::new("GSP");
        root.leaf("gsp_id", "S3-01-SNT-02");
        let mut dataset = XmlElement::new("dataset");
        dataset.leaf("input_id", "S3-NEO-I01");
        root.push(dataset);

        let text = to_pretty_string(&root).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(text.contains("<gsp_id>S3-01-SNT-02</gsp_id>"));

        let map = flatten_xml(&text).unwrap();
        assert_eq!(map.get("input_id").unwrap(), "S3-NEO-I01");
    }
}
