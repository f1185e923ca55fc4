//! CLI parsing and orchestration. Reads chapter files, lays them out under the
//! reader settings, and prints page counts, page lines, or page-request URLs.
//! Maps errors to exit codes.

use crate::config::{self, Config};
use crate::layout::{FontFamily, FontSize, UnmappedGlyph};
use crate::settings::{parse_font, parse_font_size, Color, ReaderSettings, SettingsError};
use crate::source::{page_urls, paginate_paragraphs, render_page, PageRender, PageRequest, SourceError};
use crate::text;
use clap::Parser;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// CLI error carrying exit code and message.
#[derive(Debug, Error)]
pub enum CliRunError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Settings(#[from] SettingsError),

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("Cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output: {0}")]
    Write(#[from] std::io::Error),

    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliRunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliRunError::InvalidInput(_) | CliRunError::Settings(_) => 1,
            CliRunError::Source(_) => 2,
            CliRunError::Read { .. } | CliRunError::Write(_) | CliRunError::Json(_) => 3,
        }
    }
}

/// Output format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "ttipage")]
#[command(about = "Lay out web novel chapter text as fixed-size image pages")]
#[command(
    after_help = "Config file keys (text_color, background_color, font, font_size, horizontal_padding, vertical_padding, image_width, lines_per_page, unmapped_glyph_width, log_level) are read from ./ttipage.toml or the user config dir. A --settings stamp overrides config; individual flags override both."
)]
pub struct Args {
    /// Chapter files. .html/.htm files are parsed for <p> paragraphs; anything else is plain text.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Parse every input as chapter HTML regardless of extension.
    #[arg(long)]
    pub html: bool,

    /// Font: Arial, Georgia, San Francisco, or Times New Roman.
    #[arg(long, value_parser = parse_font_arg)]
    pub font: Option<FontFamily>,

    /// Font size in points: 18, 24, 30, or 36.
    #[arg(long, value_parser = parse_font_size_arg)]
    pub font_size: Option<FontSize>,

    /// Text color: White, Light Gray, Brown, Dark Gray, or Black.
    #[arg(long, value_parser = parse_color_arg)]
    pub text_color: Option<Color>,

    /// Background color: White, Sepia, Dark Gray, or Black.
    #[arg(long, value_parser = parse_color_arg)]
    pub background_color: Option<Color>,

    /// Horizontal padding in pixels (0-100).
    #[arg(long)]
    pub horizontal_padding: Option<u32>,

    /// Vertical padding in pixels (0-100).
    #[arg(long)]
    pub vertical_padding: Option<u32>,

    /// Rendered image width in pixels (800-1600).
    #[arg(long)]
    pub image_width: Option<u32>,

    /// Lines per page (1-100).
    #[arg(long)]
    pub lines_per_page: Option<u32>,

    /// Full settings stamp, e.g. "Black,White,18,San Francisco,20,20,800,60".
    #[arg(long, value_parser = parse_stamp_arg)]
    pub settings: Option<ReaderSettings>,

    /// Print the lines of this page (1-based).
    #[arg(long, conflicts_with = "page_url")]
    pub page: Option<usize>,

    /// Print the page named by a page-request URL, using the settings it carries.
    #[arg(long)]
    pub page_url: Option<String>,

    /// Print a page-request URL for every page of the chapter at this URL.
    #[arg(long)]
    pub chapter_url: Option<String>,

    /// Output format: text or json.
    #[arg(long, default_value = "text", value_parser = parse_format)]
    pub format: OutputFormat,

    /// Suppress progress output (errors only).
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug logging and full error chain.
    #[arg(long)]
    pub verbose: bool,
}

fn parse_font_arg(s: &str) -> Result<FontFamily, String> {
    parse_font(s).map_err(|e| e.to_string())
}

fn parse_font_size_arg(s: &str) -> Result<FontSize, String> {
    parse_font_size(s).map_err(|e| e.to_string())
}

fn parse_color_arg(s: &str) -> Result<Color, String> {
    Color::from_name(s).map_err(|e| e.to_string())
}

fn parse_stamp_arg(s: &str) -> Result<ReaderSettings, String> {
    ReaderSettings::from_stamp(s).map_err(|e| e.to_string())
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    match s.to_lowercase().as_str() {
        "text" | "txt" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        _ => Err(format!(
            "Invalid --format value: '{}'. Use text or json.",
            s
        )),
    }
}

/// Defaults, then config file, then --settings stamp, then individual flags. Validated.
fn resolve_settings(args: &Args, config: Option<&Config>) -> Result<ReaderSettings, CliRunError> {
    let mut s = match config {
        Some(c) => c.apply(ReaderSettings::default())?,
        None => ReaderSettings::default(),
    };
    if let Some(stamp) = args.settings {
        s = stamp;
    }
    if let Some(f) = args.font {
        s.font = f;
    }
    if let Some(size) = args.font_size {
        s.font_size = size;
    }
    if let Some(c) = args.text_color {
        s.text_color = c;
    }
    if let Some(c) = args.background_color {
        s.background_color = c;
    }
    if let Some(p) = args.horizontal_padding {
        s.horizontal_padding = p;
    }
    if let Some(p) = args.vertical_padding {
        s.vertical_padding = p;
    }
    if let Some(w) = args.image_width {
        s.image_width = w;
    }
    if let Some(n) = args.lines_per_page {
        s.lines_per_page = n;
    }
    s.validate()?;
    Ok(s)
}

fn is_html_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
        .unwrap_or(false)
}

/// Read one chapter file into paragraphs. Plain text is kept as a single block.
fn read_chapter(path: &Path, force_html: bool) -> Result<Vec<String>, CliRunError> {
    let content = std::fs::read_to_string(path).map_err(|e| CliRunError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    if force_html || is_html_path(path) {
        Ok(text::paragraphs_from_html(&content))
    } else if content.trim().is_empty() {
        Ok(Vec::new())
    } else {
        Ok(vec![content.trim_end().to_string()])
    }
}

/// Result for one input file.
#[derive(Debug, Serialize)]
pub struct ChapterReport {
    pub input: String,
    pub lines: usize,
    pub pages: usize,
    pub lines_per_page: usize,
    pub font: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageRender>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub page_urls: Vec<String>,
}

fn report_for(
    path: &Path,
    args: &Args,
    settings: &ReaderSettings,
    unmapped: UnmappedGlyph,
    request: Option<&PageRequest>,
) -> Result<ChapterReport, CliRunError> {
    let paragraphs = read_chapter(path, args.html)?;
    let settings = request.map(|r| &r.settings).unwrap_or(settings);
    let pagination = paginate_paragraphs(&paragraphs, settings, unmapped);
    let page = match request {
        Some(r) => Some(render_page(&paragraphs, r, unmapped)?),
        None => None,
    };
    let urls = match args.chapter_url {
        Some(ref url) => page_urls(url, pagination.page_count(), settings)?,
        None => Vec::new(),
    };
    debug!(input = %path.display(), lines = pagination.line_count(), "laid out input");
    Ok(ChapterReport {
        input: path.display().to_string(),
        lines: pagination.line_count(),
        pages: pagination.page_count(),
        lines_per_page: pagination.lines_per_page(),
        font: settings.variant().key(),
        page,
        page_urls: urls,
    })
}

fn write_reports<W: Write>(
    out: &mut W,
    reports: &[ChapterReport],
    format: OutputFormat,
) -> Result<(), CliRunError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, reports)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            for r in reports {
                writeln!(
                    out,
                    "{}: {} lines, {} pages ({}, {} lines/page)",
                    r.input, r.lines, r.pages, r.font, r.lines_per_page
                )?;
                if let Some(ref page) = r.page {
                    writeln!(out, "--- page {}/{} ---", page.page, page.page_count)?;
                    for line in &page.lines {
                        writeln!(out, "{}", line.text)?;
                    }
                }
                for url in &r.page_urls {
                    writeln!(out, "{}", url)?;
                }
            }
        }
    }
    Ok(())
}

/// Install the stderr subscriber. RUST_LOG wins; otherwise `ttipage=<level>`.
pub fn init_logging(verbose: bool, config_level: Option<&str>) {
    let level = if verbose {
        "debug"
    } else {
        config_level.unwrap_or("warn")
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), level)));
    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Entry point for the CLI. Returns Ok(()) on success; Err with exit code and message on failure.
pub fn run(args: &Args) -> Result<(), CliRunError> {
    let config = config::load_config().map_err(CliRunError::InvalidInput)?;
    init_logging(
        args.verbose,
        config.as_ref().and_then(|c| c.log_level.as_deref()),
    );

    let settings = resolve_settings(args, config.as_ref())?;
    let unmapped = config
        .as_ref()
        .map(Config::unmapped_glyph)
        .unwrap_or_default();

    let request = match (&args.page_url, args.page) {
        (Some(url), _) => Some(PageRequest::parse(url)?),
        (None, Some(page)) => Some(PageRequest {
            chapter_url: args.chapter_url.clone().unwrap_or_default(),
            page,
            settings,
        }),
        (None, None) => None,
    };
    if let Some(PageRequest { page: 0, .. }) = request {
        return Err(CliRunError::InvalidInput(
            "Invalid --page: pages are numbered from 1.".to_string(),
        ));
    }
    info!(settings = %settings, inputs = args.inputs.len(), "laying out chapters");

    let progress = if args.quiet || args.inputs.len() < 2 {
        None
    } else {
        let bar = indicatif::ProgressBar::new(args.inputs.len() as u64);
        if let Ok(style) = indicatif::ProgressStyle::default_bar()
            .template("{spinner} {msg} [{bar:40}] {pos}/{len} ({elapsed})")
        {
            bar.set_style(style.progress_chars("█▉▊▋▌▍▎▏ "));
        }
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    };

    let mut reports = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        if let Some(ref bar) = progress {
            bar.set_message(path.display().to_string());
        }
        reports.push(report_for(path, args, &settings, unmapped, request.as_ref())?);
        if let Some(ref bar) = progress {
            bar.inc(1);
        }
    }
    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_reports(&mut out, &reports, args.format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Width;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["ttipage", "chapter.txt"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn parse_format_all() {
        assert_eq!(parse_format("text").unwrap(), OutputFormat::Text);
        assert_eq!(parse_format("TXT").unwrap(), OutputFormat::Text);
        assert_eq!(parse_format("json").unwrap(), OutputFormat::Json);
        assert!(parse_format("pdf").is_err());
    }

    #[test]
    fn args_parse_style_flags() {
        let a = args(&[
            "--font",
            "Times New Roman",
            "--font-size",
            "30",
            "--text-color",
            "light gray",
            "--lines-per-page",
            "40",
        ]);
        assert_eq!(a.font, Some(FontFamily::TimesNewRoman));
        assert_eq!(a.font_size, Some(FontSize::Pt30));
        assert_eq!(a.text_color, Some(Color::LightGray));
        assert_eq!(a.lines_per_page, Some(40));
    }

    #[test]
    fn args_reject_bad_values() {
        assert!(Args::try_parse_from(["ttipage", "a.txt", "--font", "Papyrus"]).is_err());
        assert!(Args::try_parse_from(["ttipage", "a.txt", "--font-size", "12"]).is_err());
        assert!(Args::try_parse_from(["ttipage", "a.txt", "--settings", "Black"]).is_err());
        assert!(Args::try_parse_from(["ttipage"]).is_err());
    }

    #[test]
    fn page_conflicts_with_page_url() {
        assert!(Args::try_parse_from([
            "ttipage",
            "a.txt",
            "--page",
            "1",
            "--page-url",
            "https://x.example/a?ttiparse"
        ])
        .is_err());
    }

    #[test]
    fn resolve_settings_precedence() -> Result<(), CliRunError> {
        let config: Config = toml::from_str("font = \"Georgia\"\nlines_per_page = 30\nimage_width = 1000")
            .map_err(|e| CliRunError::InvalidInput(e.to_string()))?;
        let a = args(&["--settings", "White,Black,24,Arial,10,10,900,50", "--lines-per-page", "25"]);
        let s = resolve_settings(&a, Some(&config))?;
        // Stamp replaces config, flag replaces stamp.
        assert_eq!(s.font, FontFamily::Arial);
        assert_eq!(s.image_width, 900);
        assert_eq!(s.lines_per_page, 25);

        let s = resolve_settings(&args(&[]), Some(&config))?;
        assert_eq!(s.font, FontFamily::Georgia);
        assert_eq!(s.lines_per_page, 30);
        assert_eq!(s.image_width, 1000);

        assert_eq!(resolve_settings(&args(&[]), None)?, ReaderSettings::default());
        Ok(())
    }

    #[test]
    fn resolve_settings_validates_flags() {
        let a = args(&["--image-width", "200"]);
        assert!(matches!(
            resolve_settings(&a, None),
            Err(CliRunError::Settings(SettingsError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn is_html_path_by_extension() {
        assert!(is_html_path(Path::new("ch1.html")));
        assert!(is_html_path(Path::new("ch1.HTM")));
        assert!(!is_html_path(Path::new("ch1.txt")));
        assert!(!is_html_path(Path::new("ch1")));
    }

    #[test]
    fn read_chapter_plain_and_html() -> Result<(), CliRunError> {
        let txt = temp_file("ttipage_cli_read.txt", "First line.\n\nSecond line.\n");
        assert_eq!(read_chapter(&txt, false)?, vec!["First line.\n\nSecond line."]);
        let html = temp_file("ttipage_cli_read.html", "<p>One</p><p>Two</p>");
        assert_eq!(read_chapter(&html, false)?, vec!["One", "Two"]);
        let empty = temp_file("ttipage_cli_read_empty.txt", "  \n");
        assert!(read_chapter(&empty, false)?.is_empty());
        for p in [txt, html, empty] {
            std::fs::remove_file(p).ok();
        }
        Ok(())
    }

    #[test]
    fn read_chapter_missing_file() {
        let result = read_chapter(Path::new("/nonexistent_dir_ttipage_xyz/ch.txt"), false);
        assert!(matches!(result, Err(CliRunError::Read { .. })));
        if let Err(e) = result {
            assert_eq!(e.exit_code(), 3);
        }
    }

    #[test]
    fn report_counts_pages_and_builds_urls() -> Result<(), CliRunError> {
        let body: Vec<String> = (1..=70).map(|i| format!("Line {}.", i)).collect();
        let path = temp_file("ttipage_cli_report.txt", &body.join("\n"));
        let mut a = args(&["--chapter-url", "https://novels.example/n/c-1"]);
        a.inputs = vec![path.clone()];
        let settings = ReaderSettings::default();
        let report = report_for(&path, &a, &settings, UnmappedGlyph::default(), None)?;
        std::fs::remove_file(&path).ok();
        assert_eq!(report.lines, 70);
        assert_eq!(report.pages, 2);
        assert_eq!(report.page_urls.len(), 2);
        assert!(report.page_urls[1].contains("ttipage=2"));
        assert!(report.page.is_none());
        Ok(())
    }

    #[test]
    fn report_renders_requested_page_with_url_settings() -> Result<(), CliRunError> {
        let body: Vec<String> = (1..=70).map(|i| format!("Line {}.", i)).collect();
        let path = temp_file("ttipage_cli_page.txt", &body.join("\n"));
        let a = args(&[]);
        let request = PageRequest::parse(
            "https://novels.example/n/c-1?ttiparse&ttipage=3&ttisettings=Black,White,18,Arial,20,20,800,30",
        )?;
        let report = report_for(
            &path,
            &a,
            &ReaderSettings::default(),
            UnmappedGlyph::default(),
            Some(&request),
        )?;
        std::fs::remove_file(&path).ok();
        assert_eq!(report.pages, 3);
        assert_eq!(report.font, "arial18");
        let page = report.page.ok_or_else(|| CliRunError::InvalidInput("no page".into()))?;
        assert_eq!(page.lines.len(), 10);
        assert_eq!(page.lines[0].text, "Line 61.");
        assert_eq!(page.available_width, Width::from_px(760));
        Ok(())
    }

    #[test]
    fn write_reports_text_and_json() -> Result<(), CliRunError> {
        let reports = vec![ChapterReport {
            input: "ch1.txt".to_string(),
            lines: 137,
            pages: 3,
            lines_per_page: 60,
            font: "sanfrancisco18".to_string(),
            page: None,
            page_urls: vec!["https://x.example/c?ttiparse&ttipage=1".to_string()],
        }];
        let mut text_out = Vec::new();
        write_reports(&mut text_out, &reports, OutputFormat::Text)?;
        let text_out = String::from_utf8_lossy(&text_out);
        assert!(text_out.starts_with("ch1.txt: 137 lines, 3 pages (sanfrancisco18, 60 lines/page)"));
        assert!(text_out.contains("ttipage=1"));

        let mut json_out = Vec::new();
        write_reports(&mut json_out, &reports, OutputFormat::Json)?;
        let value: serde_json::Value = serde_json::from_slice(&json_out)?;
        assert_eq!(value[0]["pages"].as_u64(), Some(3));
        assert!(value[0].get("page").is_none());
        Ok(())
    }

    #[test]
    fn cli_run_error_exit_codes() {
        assert_eq!(CliRunError::InvalidInput("x".into()).exit_code(), 1);
        assert_eq!(
            CliRunError::Settings(SettingsError::UnknownFont("x".into())).exit_code(),
            1
        );
        assert_eq!(
            CliRunError::Source(SourceError::NotFound("x".into())).exit_code(),
            2
        );
        assert_eq!(
            CliRunError::Write(std::io::Error::new(std::io::ErrorKind::Other, "x")).exit_code(),
            3
        );
    }
}
