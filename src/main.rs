//! folio - Export AI-authored projects to PDF, DOCX, and text

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use folio::export::{ExportOptions, PageSize, export_with};
use folio::{Format, Project};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version, about = "Export AI-authored projects to PDF, DOCX, and text", long_about = None)]
#[command(after_help = "EXAMPLES:
    folio report.json                 Export PDF, DOCX, and TXT
    folio report.json -f pdf -o out   Export only the PDF into out/
    folio -i report.json              Show project summary")]
struct Cli {
    /// Project file (JSON)
    #[arg(value_name = "PROJECT")]
    input: PathBuf,

    /// Output format (pdf, docx, txt); repeat for several. Defaults to all.
    #[arg(short, long = "format", value_name = "FORMAT")]
    formats: Vec<Format>,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output: PathBuf,

    /// Page size for PDF output
    #[arg(long, value_enum, default_value_t = PageSizeArg::A4)]
    page_size: PageSizeArg,

    /// strftime pattern for the created date
    #[arg(long, value_name = "FMT")]
    date_format: Option<String>,

    /// Show project summary without exporting
    #[arg(short, long)]
    info: bool,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PageSizeArg {
    A4,
    Letter,
}

impl From<PageSizeArg> for PageSize {
    fn from(arg: PageSizeArg) -> Self {
        match arg {
            PageSizeArg::A4 => PageSize::A4,
            PageSizeArg::Letter => PageSize::Letter,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let result = if cli.info {
        show_info(&cli.input)
    } else {
        run_export(&cli)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load(path: &Path) -> folio::Result<Project> {
    let json = std::fs::read_to_string(path)?;
    Project::from_json(&json)
}

fn show_info(path: &Path) -> folio::Result<()> {
    let project = load(path)?;

    println!("File: {}", path.display());
    println!("Title: {}", project.title);
    println!("Created: {}", project.created_at.to_rfc3339());
    println!("Sections: {}", project.sections.len());
    println!("Emitted sections: {}", project.emitted_sections().count());
    println!("Word count: {}", folio::model::format_count(project.word_count));
    println!("Estimated pages: {}", project.estimated_pages());

    let settings = &project.settings;
    if !settings.format.is_empty() {
        println!("Format: {}", settings.format);
    }
    if !settings.style.is_empty() {
        println!("Style: {}", settings.style);
    }
    if !settings.tone.is_empty() {
        println!("Tone: {}", settings.tone);
    }

    Ok(())
}

fn run_export(cli: &Cli) -> folio::Result<()> {
    let project = load(&cli.input)?;

    let mut options = ExportOptions::default();
    options.pdf.page_size = cli.page_size.into();
    if let Some(pattern) = &cli.date_format {
        options.date_format = pattern.clone();
    }

    let formats = if cli.formats.is_empty() {
        Format::all().to_vec()
    } else {
        cli.formats.clone()
    };

    std::fs::create_dir_all(&cli.output)?;
    for format in formats {
        let artifact = export_with(&project, format, &options)?;
        let path = artifact.save(&cli.output)?;
        if !cli.quiet {
            println!("{}", path.display());
        }
    }

    Ok(())
}
