//! Export integration tests.
//!
//! Exercise the public API across all three formats: heading counts and
//! ordering, empty-section handling, pagination, persistence, and errors.

use std::io::{Cursor, Read};

use chrono::{TimeZone, Utc};
use folio::export::{ExportOptions, Exporter, PdfConfig, TextExporter, export_with};
use folio::pdf::{Font, layout_project};
use folio::{Error, ExportSettings, Format, Project, Section, export, export_all};
use proptest::prelude::*;
use tempfile::TempDir;

// ============================================================================
// Helpers
// ============================================================================

fn report() -> Project {
    Project::new("My Report")
        .with_created_at(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap())
        .with_word_count(1234)
        .with_settings(ExportSettings::new("report", "formal", "neutral", "short"))
        .with_section(Section::new("Intro", "Hello world."))
        .with_section(Section::new("Skipped", ""))
        .with_section(Section::new("Findings", "**Growth** was strong.\n\n- north\n- south"))
}

fn uncompressed() -> ExportOptions {
    ExportOptions {
        pdf: PdfConfig {
            compress: false,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn text_of(project: &Project) -> String {
    let artifact = export(project, Format::Text).unwrap();
    String::from_utf8(artifact.bytes).unwrap()
}

fn docx_document_xml(project: &Project) -> String {
    let artifact = export(project, Format::Docx).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(artifact.bytes)).unwrap();
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    xml
}

/// Heading texts in document order, read back from the DOCX package.
fn docx_headings(project: &Project) -> Vec<String> {
    let xml = docx_document_xml(project);
    xml.split("<w:p>")
        .filter(|p| p.contains(r#"w:val="Heading1""#))
        .map(|p| {
            let start = p.find(r#"<w:t xml:space="preserve">"#).unwrap()
                + r#"<w:t xml:space="preserve">"#.len();
            let end = p[start..].find("</w:t>").unwrap() + start;
            p[start..end].to_string()
        })
        .collect()
}

/// Heading texts in document order, read from the PDF display list.
fn pdf_headings(project: &Project) -> Vec<String> {
    let config = PdfConfig::default();
    layout_project(project, &config, "%Y")
        .iter()
        .flat_map(|page| page.texts())
        .filter(|op| op.font == Font::HelveticaBold && op.size == config.heading_size)
        .map(|op| op.text.clone())
        .collect()
}

/// Numbered heading lines in the plain-text output.
fn text_headings(project: &Project) -> Vec<String> {
    let titles: Vec<&str> = project.sections.iter().map(|s| s.title.as_str()).collect();
    text_of(project)
        .lines()
        .filter(|line| {
            line.split_once(". ").is_some_and(|(n, rest)| {
                n.parse::<usize>().is_ok() && titles.contains(&rest)
            })
        })
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_text_heading_followed_by_body() {
    let project =
        Project::new("My Report").with_section(Section::new("Intro", "Hello world."));
    let text = text_of(&project);

    let heading = text.find("1. Intro").unwrap();
    let body = text.find("Hello world.").unwrap();
    assert!(heading < body);
}

#[test]
fn test_markdown_is_flattened_in_every_format() {
    let project = Project::new("Styles")
        .with_section(Section::new("Mixed", "**bold** and *italic* and `code`"));

    assert!(text_of(&project).contains("bold and italic and code"));
    assert!(docx_document_xml(&project).contains(">bold and italic and code<"));

    let pdf = export_with(&project, Format::Pdf, &uncompressed()).unwrap();
    assert!(String::from_utf8_lossy(&pdf.bytes).contains("(bold and italic and code) Tj"));
}

#[test]
fn test_filename_is_sanitized_title() {
    let project = Project::new("A/B Test: Report #1!").with_section(Section::new("S", "x"));
    for format in Format::all() {
        let artifact = export(&project, format).unwrap();
        assert_eq!(
            artifact.filename,
            format!("a_b_test_report_1.{}", format.extension())
        );
    }
}

#[test]
fn test_empty_second_section_emits_one_heading() {
    let project = Project::new("Two")
        .with_section(Section::new("First", "Some text."))
        .with_section(Section::new("Second", "   "));

    assert_eq!(text_headings(&project), ["1. First"]);
    assert_eq!(docx_headings(&project), ["1. First"]);
    assert_eq!(pdf_headings(&project), ["1. First"]);
}

#[test]
fn test_section_overflowing_page_breaks_once_without_loss() {
    let lines: Vec<String> = (1..=45).map(|i| format!("Line {i}.")).collect();
    let project = Project::new("Long").with_section(Section::new("Body", lines.join("\n\n")));

    let config = PdfConfig::default();
    let pages = layout_project(&project, &config, "%Y");

    // Title page, then the section spilling once onto a second content page.
    assert_eq!(pages.len(), 3);
    assert!(pages[1].texts().any(|op| op.text == "Line 1."));
    assert!(pages[2].texts().any(|op| op.text == "Line 45."));

    let body: Vec<String> = pages
        .iter()
        .skip(1)
        .flat_map(|page| page.texts())
        .filter(|op| op.font == Font::Helvetica && op.size == config.body_size)
        .map(|op| op.text.clone())
        .collect();
    assert_eq!(body, lines);
}

// ============================================================================
// Cross-format properties
// ============================================================================

#[test]
fn test_positional_numbering_matches_across_formats() {
    let project = report();
    let expected = ["1. Intro", "3. Findings"];

    assert_eq!(text_headings(&project), expected);
    assert_eq!(docx_headings(&project), expected);
    assert_eq!(pdf_headings(&project), expected);
}

#[test]
fn test_all_empty_sections_produce_header_only() {
    let project = Project::new("Blank Slate")
        .with_section(Section::new("A", ""))
        .with_section(Section::new("B", "\n\t "));

    let artifacts = export_all(&project).unwrap();
    assert_eq!(artifacts.len(), 3);

    let text = text_of(&project);
    assert!(text.starts_with("Blank Slate\nGenerated by Folio\n"));
    assert!(text_headings(&project).is_empty());

    assert!(docx_headings(&project).is_empty());
    assert!(docx_document_xml(&project).contains(">Blank Slate<"));

    let pages = layout_project(&project, &PdfConfig::default(), "%Y");
    assert_eq!(pages.len(), 2);
    assert!(pages[0].lines().any(|line| line == "Blank Slate"));
    assert!(pages[1].ops.is_empty());
    assert!(pdf_headings(&project).is_empty());
}

#[test]
fn test_metadata_header_in_text() {
    let text = text_of(&report());
    assert!(text.contains("Created: 6/1/2024\n"));
    assert!(text.contains("Word Count: 1,234\n"));
    assert!(text.contains("Estimated Pages: 5\n"));
    assert!(text.contains("Format: report | Style: formal | Tone: neutral | Target Length: short\n"));
}

#[test]
fn test_docx_metadata_parts() {
    let artifact = export(&report(), Format::Docx).unwrap();
    assert_eq!(
        artifact.media_type(),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );

    let mut archive = zip::ZipArchive::new(Cursor::new(artifact.bytes)).unwrap();
    let mut core = String::new();
    archive
        .by_name("docProps/core.xml")
        .unwrap()
        .read_to_string(&mut core)
        .unwrap();
    assert!(core.contains("<dc:title>My Report</dc:title>"));
    assert!(core.contains("Generated by Folio"));
}

#[test]
fn test_pdf_is_well_formed() {
    let artifact = export(&report(), Format::Pdf).unwrap();
    assert!(artifact.bytes.starts_with(b"%PDF-1.4"));
    assert!(artifact.bytes.ends_with(b"%%EOF\n"));
    assert_eq!(artifact.media_type(), "application/pdf");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_heading_counts_agree(
        bodies in prop::collection::vec(
            prop_oneof![
                Just(String::new()),
                Just("  \n ".to_string()),
                "[a-z]{1,8}( [a-z]{1,8}){0,20}",
            ],
            0..8,
        )
    ) {
        let mut project = Project::new("Generated");
        for (i, body) in bodies.iter().enumerate() {
            project = project.with_section(Section::new(format!("Part {}", i + 1), body.clone()));
        }

        let expected: Vec<String> = bodies
            .iter()
            .enumerate()
            .filter(|(_, body)| !body.trim().is_empty())
            .map(|(i, _)| format!("{}. Part {}", i + 1, i + 1))
            .collect();

        prop_assert_eq!(text_headings(&project), expected.clone());
        prop_assert_eq!(docx_headings(&project), expected.clone());
        prop_assert_eq!(pdf_headings(&project), expected);
    }
}

// ============================================================================
// Persistence, concurrency, and errors
// ============================================================================

#[test]
fn test_artifact_save_writes_file() {
    let dir = TempDir::new().unwrap();
    let artifact = export(&report(), Format::Text).unwrap();

    let path = artifact.save(dir.path()).unwrap();
    assert_eq!(path, dir.path().join("my_report.txt"));
    assert_eq!(std::fs::read(&path).unwrap(), artifact.bytes);
}

#[test]
fn test_artifact_save_missing_dir_is_io_error() {
    let dir = TempDir::new().unwrap();
    let artifact = export(&report(), Format::Text).unwrap();

    let err = artifact.save(dir.path().join("missing")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_exporter_writes_to_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.txt");
    let mut file = std::fs::File::create(&path).unwrap();

    TextExporter::new().export(&report(), &mut file).unwrap();
    drop(file);

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("My Report\n"));
}

#[test]
fn test_concurrent_exports_are_independent() {
    let project = report();
    let baseline: Vec<Vec<u8>> = Format::all()
        .into_iter()
        .map(|f| export(&project, f).unwrap().bytes)
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..6)
            .map(|i| {
                let project = &project;
                scope.spawn(move || {
                    let format = Format::all()[i % 3];
                    (i % 3, export(project, format).unwrap().bytes)
                })
            })
            .collect();

        for handle in handles {
            let (index, bytes) = handle.join().unwrap();
            assert_eq!(bytes, baseline[index]);
        }
    });
}

#[test]
fn test_invalid_project_json() {
    let err = Project::from_json(r#"{"title": "No sections here"}"#).unwrap_err();
    assert!(matches!(err, Error::InvalidProject(_)));

    let err = Project::from_json(r#"{"title": "", "sections": []}"#).unwrap_err();
    assert!(matches!(err, Error::InvalidProject(_)));
}

#[test]
fn test_unknown_format_string() {
    let err = "epub".parse::<Format>().unwrap_err();
    assert_eq!(err.to_string(), "Unsupported format: epub");
}
