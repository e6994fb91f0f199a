//! Page-stream serialization.
//!
//! Writes a minimal PDF 1.4 file: catalog, page tree, the two standard fonts,
//! an `Info` dictionary, one content stream per page, the cross-reference
//! table and trailer. Object numbers are fixed for the shared objects and
//! allocated in pairs (page, contents) after them.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use flate2::Compression;
use flate2::write::ZlibEncoder;

use super::font::{Font, PT_TO_MM, encode_win_ansi};
use super::layout::{DrawOp, Page, RuleOp, TextOp};

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const FONT_REGULAR_ID: usize = 3;
const FONT_BOLD_ID: usize = 4;
const INFO_ID: usize = 5;
const FIRST_PAGE_ID: usize = 6;

/// Gray level for horizontal rules.
const RULE_GRAY: f32 = 0.6;

/// Document-level metadata written to the `Info` dictionary.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    pub creator: String,
    pub created_at: DateTime<Utc>,
}

/// Serializes laid-out pages into PDF bytes.
pub struct PdfWriter {
    width_pt: f32,
    height_pt: f32,
    compress: bool,
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    /// `width` and `height` are the page size in millimetres.
    pub fn new(width: f32, height: f32, compress: bool) -> Self {
        Self {
            width_pt: mm_to_pt(width),
            height_pt: mm_to_pt(height),
            compress,
            buf: Vec::new(),
            offsets: Vec::new(),
        }
    }

    /// Serialize `pages` and return the finished file.
    pub fn write(mut self, pages: &[Page], info: &DocumentInfo) -> io::Result<Vec<u8>> {
        let object_count = INFO_ID + 2 * pages.len();
        self.offsets = vec![0; object_count + 1];

        self.buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        self.begin_object(CATALOG_ID)?;
        write!(self.buf, "<< /Type /Catalog /Pages {PAGES_ID} 0 R >>")?;
        self.end_object()?;

        let kids: Vec<String> = (0..pages.len())
            .map(|i| format!("{} 0 R", page_object_id(i)))
            .collect();
        self.begin_object(PAGES_ID)?;
        write!(
            self.buf,
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        )?;
        self.end_object()?;

        for (id, font) in [
            (FONT_REGULAR_ID, Font::Helvetica),
            (FONT_BOLD_ID, Font::HelveticaBold),
        ] {
            self.begin_object(id)?;
            write!(
                self.buf,
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.base_name()
            )?;
            self.end_object()?;
        }

        self.begin_object(INFO_ID)?;
        write!(
            self.buf,
            "<< /Title {} /Creator {} /Producer {} /CreationDate ({}) >>",
            text_string(&info.title),
            text_string(&info.creator),
            text_string(&info.creator),
            info.created_at.format("D:%Y%m%d%H%M%SZ")
        )?;
        self.end_object()?;

        for (i, page) in pages.iter().enumerate() {
            self.write_page(i, page)?;
        }

        self.write_trailer(object_count)?;
        Ok(self.buf)
    }

    fn write_page(&mut self, index: usize, page: &Page) -> io::Result<()> {
        let page_id = page_object_id(index);
        let contents_id = page_id + 1;

        self.begin_object(page_id)?;
        write!(
            self.buf,
            "<< /Type /Page /Parent {PAGES_ID} 0 R /MediaBox [0 0 {} {}] \
             /Resources << /Font << /{} {FONT_REGULAR_ID} 0 R /{} {FONT_BOLD_ID} 0 R >> >> \
             /Contents {contents_id} 0 R >>",
            fmt_num(self.width_pt),
            fmt_num(self.height_pt),
            Font::Helvetica.resource_name(),
            Font::HelveticaBold.resource_name(),
        )?;
        self.end_object()?;

        let content = self.content_stream(page)?;
        let (data, filter) = if self.compress {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&content)?;
            (encoder.finish()?, " /Filter /FlateDecode")
        } else {
            (content, "")
        };

        self.begin_object(contents_id)?;
        write!(self.buf, "<< /Length {}{filter} >>\nstream\n", data.len())?;
        self.buf.extend_from_slice(&data);
        self.buf.extend_from_slice(b"\nendstream");
        self.end_object()
    }

    fn content_stream(&self, page: &Page) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        for op in &page.ops {
            match op {
                DrawOp::Text(text) => self.write_text(&mut out, text)?,
                DrawOp::Rule(rule) => self.write_rule(&mut out, rule)?,
            }
        }
        Ok(out)
    }

    fn write_text(&self, out: &mut Vec<u8>, op: &TextOp) -> io::Result<()> {
        write!(
            out,
            "BT /{} {} Tf {} {} Td ",
            op.font.resource_name(),
            fmt_num(op.size),
            fmt_num(mm_to_pt(op.x)),
            fmt_num(self.height_pt - mm_to_pt(op.y))
        )?;
        out.push(b'(');
        escape_string(out, &encode_win_ansi(&op.text));
        out.extend_from_slice(b") Tj ET\n");
        Ok(())
    }

    fn write_rule(&self, out: &mut Vec<u8>, op: &RuleOp) -> io::Result<()> {
        let y = fmt_num(self.height_pt - mm_to_pt(op.y));
        writeln!(
            out,
            "q {} G {} w {} {y} m {} {y} l S Q",
            fmt_num(RULE_GRAY),
            fmt_num(mm_to_pt(op.thickness)),
            fmt_num(mm_to_pt(op.x1)),
            fmt_num(mm_to_pt(op.x2)),
        )
    }

    fn begin_object(&mut self, id: usize) -> io::Result<()> {
        self.offsets[id] = self.buf.len();
        write!(self.buf, "{id} 0 obj\n")
    }

    fn end_object(&mut self) -> io::Result<()> {
        self.buf.extend_from_slice(b"\nendobj\n");
        Ok(())
    }

    fn write_trailer(&mut self, object_count: usize) -> io::Result<()> {
        let xref_offset = self.buf.len();
        write!(self.buf, "xref\n0 {}\n", object_count + 1)?;
        self.buf.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &self.offsets[1..] {
            write!(self.buf, "{offset:010} 00000 n \n")?;
        }
        write!(
            self.buf,
            "trailer\n<< /Size {} /Root {CATALOG_ID} 0 R /Info {INFO_ID} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            object_count + 1
        )
    }
}

fn page_object_id(index: usize) -> usize {
    FIRST_PAGE_ID + 2 * index
}

fn mm_to_pt(mm: f32) -> f32 {
    mm / PT_TO_MM
}

/// Format a number for a content stream: at most two decimals, no trailing
/// zeros.
fn fmt_num(n: f32) -> String {
    let s = format!("{n:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// Escape a byte string for a literal `( )` string.
fn escape_string(out: &mut Vec<u8>, bytes: &[u8]) {
    for &b in bytes {
        match b {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(b);
            }
            0x20..=0x7E => out.push(b),
            _ => out.extend_from_slice(format!("\\{b:03o}").as_bytes()),
        }
    }
}

/// Encode an `Info` text string as UTF-16BE hex with a byte-order mark.
fn text_string(s: &str) -> String {
    let mut hex = String::from("<FEFF");
    for unit in s.encode_utf16() {
        hex.push_str(&format!("{unit:04X}"));
    }
    hex.push('>');
    hex
}
