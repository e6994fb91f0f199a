//! WordprocessingML package writer.
//!
//! A `.docx` file is a ZIP archive of XML parts. Static parts are written from
//! templates; `word/document.xml` and `docProps/core.xml` are generated with
//! `quick-xml`, which handles text escaping.

use std::borrow::Cow;
use std::io::{Seek, Write};

use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{Error, Result};

use super::node::{Alignment, Block, DocxDocument, Paragraph, Run};

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// A4 in twentieths of a point.
const PAGE_WIDTH: u32 = 11906;
const PAGE_HEIGHT: u32 = 16838;
/// 20 mm in twentieths of a point.
const PAGE_MARGIN: u32 = 1134;

/// Write `doc` as a complete `.docx` package.
pub fn write_package<W: Write + Seek>(
    doc: &DocxDocument,
    created_at: DateTime<Utc>,
    compression_level: u32,
    writer: &mut W,
) -> Result<()> {
    let document_xml = document_xml(doc)?;
    let core_xml = core_xml(doc, created_at)?;

    let mut zip = ZipWriter::new(writer);
    let deflated = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(i64::from(compression_level)));

    let parts: [(&str, &[u8]); 7] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML),
        ("_rels/.rels", ROOT_RELS_XML),
        ("word/document.xml", &document_xml),
        ("word/styles.xml", STYLES_XML),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML),
        ("docProps/core.xml", &core_xml),
        ("docProps/app.xml", APP_XML),
    ];
    for (name, data) in parts {
        zip.start_file(name, deflated).map_err(docx_error)?;
        zip.write_all(data).map_err(docx_error)?;
    }

    zip.finish().map_err(docx_error)?;
    Ok(())
}

/// Convert any lower-level failure into a structured-format error.
fn docx_error<E: std::fmt::Display>(e: E) -> Error {
    Error::Docx(e.to_string())
}

/// Thin wrapper over `quick_xml::Writer` that maps failures to [`Error`].
struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    fn new() -> Result<Self> {
        let mut inner = Writer::new(Vec::new());
        inner
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(docx_error)?;
        Ok(Self { inner })
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let elem = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.inner.write_event(Event::Start(elem)).map_err(docx_error)
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let elem = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.inner.write_event(Event::Empty(elem)).map_err(docx_error)
    }

    fn text(&mut self, text: &str) -> Result<()> {
        let text = xml_safe(text);
        self.inner
            .write_event(Event::Text(BytesText::new(&text)))
            .map_err(docx_error)
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.inner
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(docx_error)
    }

    /// `<name attrs>text</name>`
    fn element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    fn finish(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

/// Replace characters XML 1.0 cannot carry with a space.
///
/// Allowed: tab, newline, carriage return, and everything from U+0020 up
/// except the noncharacters U+FFFE and U+FFFF.
fn xml_safe(text: &str) -> Cow<'_, str> {
    fn allowed(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
    }

    if text.chars().all(allowed) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(
            text.chars()
                .map(|c| if allowed(c) { c } else { ' ' })
                .collect(),
        )
    }
}

/// Generate `word/document.xml`.
pub fn document_xml(doc: &DocxDocument) -> Result<Vec<u8>> {
    let mut xml = XmlWriter::new()?;
    xml.start("w:document", &[("xmlns:w", WORD_NS)])?;
    xml.start("w:body", &[])?;

    for block in &doc.blocks {
        match block {
            Block::Paragraph(p) => write_paragraph(&mut xml, p)?,
            Block::PageBreak => {
                xml.start("w:p", &[])?;
                xml.start("w:r", &[])?;
                xml.empty("w:br", &[("w:type", "page")])?;
                xml.end("w:r")?;
                xml.end("w:p")?;
            }
        }
    }

    let (width, height, margin) = (
        PAGE_WIDTH.to_string(),
        PAGE_HEIGHT.to_string(),
        PAGE_MARGIN.to_string(),
    );
    xml.start("w:sectPr", &[])?;
    xml.empty("w:pgSz", &[("w:w", &width), ("w:h", &height)])?;
    xml.empty(
        "w:pgMar",
        &[
            ("w:top", &margin),
            ("w:right", &margin),
            ("w:bottom", &margin),
            ("w:left", &margin),
            ("w:header", "708"),
            ("w:footer", "708"),
            ("w:gutter", "0"),
        ],
    )?;
    xml.end("w:sectPr")?;

    xml.end("w:body")?;
    xml.end("w:document")?;
    Ok(xml.finish())
}

fn write_paragraph(xml: &mut XmlWriter, p: &Paragraph) -> Result<()> {
    xml.start("w:p", &[])?;

    // Schema order inside pPr: pStyle, spacing, jc.
    xml.start("w:pPr", &[])?;
    xml.empty("w:pStyle", &[("w:val", p.style.style_id())])?;
    if let Some(after) = p.spacing_after {
        xml.empty("w:spacing", &[("w:after", &after.to_string())])?;
    }
    if p.alignment == Alignment::Center {
        xml.empty("w:jc", &[("w:val", "center")])?;
    }
    xml.end("w:pPr")?;

    for run in &p.runs {
        write_run(xml, run)?;
    }

    xml.end("w:p")
}

fn write_run(xml: &mut XmlWriter, run: &Run) -> Result<()> {
    xml.start("w:r", &[])?;

    if run.bold || run.size.is_some() {
        xml.start("w:rPr", &[])?;
        if run.bold {
            xml.empty("w:b", &[])?;
        }
        if let Some(size) = run.size {
            xml.empty("w:sz", &[("w:val", &size.to_string())])?;
        }
        xml.end("w:rPr")?;
    }

    for (i, line) in run.text.split('\n').enumerate() {
        if i > 0 {
            xml.empty("w:br", &[])?;
        }
        xml.element("w:t", &[("xml:space", "preserve")], line)?;
    }

    xml.end("w:r")
}

/// Generate `docProps/core.xml`.
pub fn core_xml(doc: &DocxDocument, created_at: DateTime<Utc>) -> Result<Vec<u8>> {
    let created = created_at.format("%Y-%m-%dT%H:%M:%SZ").to_string();

    let mut xml = XmlWriter::new()?;
    xml.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    xml.element("dc:title", &[], &doc.title)?;
    xml.element("dc:description", &[], &doc.description)?;
    xml.element("dc:creator", &[], &doc.creator)?;
    xml.element("cp:lastModifiedBy", &[], &doc.creator)?;
    xml.element("dcterms:created", &[("xsi:type", "dcterms:W3CDTF")], &created)?;
    xml.element("dcterms:modified", &[("xsi:type", "dcterms:W3CDTF")], &created)?;
    xml.end("cp:coreProperties")?;
    Ok(xml.finish())
}

const CONTENT_TYPES_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
  <Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
</Types>
"#;

const ROOT_RELS_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>
"#;

const DOCUMENT_RELS_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>
"#;

const APP_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">
  <Application>Folio</Application>
</Properties>
"#;

const STYLES_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:docDefaults>
    <w:rPrDefault>
      <w:rPr>
        <w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:eastAsia="Calibri" w:cs="Calibri"/>
        <w:sz w:val="22"/>
        <w:szCs w:val="22"/>
      </w:rPr>
    </w:rPrDefault>
    <w:pPrDefault>
      <w:pPr>
        <w:spacing w:after="0" w:line="276" w:lineRule="auto"/>
      </w:pPr>
    </w:pPrDefault>
  </w:docDefaults>
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
    <w:qFormat/>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Title">
    <w:name w:val="Title"/>
    <w:basedOn w:val="Normal"/>
    <w:next w:val="Normal"/>
    <w:qFormat/>
    <w:rPr>
      <w:b/>
      <w:sz w:val="56"/>
    </w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading1">
    <w:name w:val="heading 1"/>
    <w:basedOn w:val="Normal"/>
    <w:next w:val="Normal"/>
    <w:qFormat/>
    <w:pPr>
      <w:keepNext/>
      <w:spacing w:before="240"/>
      <w:outlineLvl w:val="0"/>
    </w:pPr>
    <w:rPr>
      <w:b/>
      <w:sz w:val="32"/>
    </w:rPr>
  </w:style>
</w:styles>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::{ParagraphStyle, Run};
    use chrono::TimeZone;
    use std::io::{Cursor, Read};

    fn doc() -> DocxDocument {
        DocxDocument {
            title: "R&D <Notes>".to_string(),
            description: "Generated by Folio".to_string(),
            creator: "Folio".to_string(),
            blocks: vec![
                Block::Paragraph(
                    Paragraph::new(ParagraphStyle::Title)
                        .centered()
                        .with_run(Run::new("R&D <Notes>").bold().size_pt(32)),
                ),
                Block::PageBreak,
                Block::Paragraph(
                    Paragraph::new(ParagraphStyle::Normal)
                        .with_spacing_after(200)
                        .with_run(Run::new("line one\nline two")),
                ),
            ],
        }
    }

    #[test]
    fn test_document_xml_escapes_and_structures() {
        let xml = String::from_utf8(document_xml(&doc()).unwrap()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>"));
        assert!(xml.contains("R&amp;D &lt;Notes&gt;"));
        assert!(xml.contains("<w:pStyle w:val=\"Title\"/><w:jc w:val=\"center\"/>"));
        assert!(xml.contains("<w:b/><w:sz w:val=\"64\"/>"));
        assert!(xml.contains("<w:br w:type=\"page\"/>"));
        assert!(xml.contains(
            "<w:t xml:space=\"preserve\">line one</w:t><w:br/><w:t xml:space=\"preserve\">line two</w:t>"
        ));
        assert!(xml.contains("<w:spacing w:after=\"200\"/>"));
        assert!(xml.contains("<w:pgSz w:w=\"11906\" w:h=\"16838\"/>"));
    }

    #[test]
    fn test_control_characters_are_replaced() {
        assert_eq!(xml_safe("plain\ttext\n"), "plain\ttext\n");
        assert!(matches!(xml_safe("plain"), Cow::Borrowed(_)));
        assert_eq!(xml_safe("a\u{0C}b\u{1}c\u{FFFF}"), "a b c ");

        let doc = DocxDocument {
            title: "Pasted\u{0B}Title".to_string(),
            description: String::new(),
            creator: String::new(),
            blocks: vec![Block::Paragraph(
                Paragraph::new(ParagraphStyle::Normal)
                    .with_run(Run::new("page one\u{0C}page two \u{1}x")),
            )],
        };

        let body = document_xml(&doc).unwrap();
        let core = core_xml(&doc, Utc::now()).unwrap();
        for xml in [&body, &core] {
            assert!(
                !xml.iter().any(|&b| b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r')),
                "illegal control byte in {}",
                String::from_utf8_lossy(xml)
            );
        }
        assert!(String::from_utf8_lossy(&body).contains(">page one page two  x<"));
    }

    #[test]
    fn test_core_xml_metadata() {
        let created = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let xml = String::from_utf8(core_xml(&doc(), created).unwrap()).unwrap();
        assert!(xml.contains("<dc:title>R&amp;D &lt;Notes&gt;</dc:title>"));
        assert!(xml.contains("<dc:creator>Folio</dc:creator>"));
        assert!(xml.contains("<dc:description>Generated by Folio</dc:description>"));
        assert!(xml.contains("2024-06-01T08:00:00Z"));
    }

    #[test]
    fn test_package_contains_all_parts() {
        let mut cursor = Cursor::new(Vec::new());
        write_package(&doc(), Utc::now(), 6, &mut cursor).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();
        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/document.xml",
            "word/styles.xml",
            "word/_rels/document.xml.rels",
            "docProps/core.xml",
            "docProps/app.xml",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing part {name}");
        }

        let mut body = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut body)
            .unwrap();
        assert!(body.contains("line two"));
    }
}
