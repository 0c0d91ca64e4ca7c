//! CLI binary for service-directory.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use service_directory::{
    extract, inspect, save_csv, CategoryDenylist, ExtractionConfig, ExtractionOutput,
    ExtractionProgressCallback, FrontMatter, PageRange, ProgressCallback,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner while pdfium renders, then a bar
/// over the category blocks with one log line per category.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Rendering");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_render_complete(&self, pages: usize, chars: usize) {
        self.bar.println(format!(
            "{} {}  {}",
            cyan("◆"),
            bold(&format!("Rendered {pages} pages")),
            dim(&format!("{chars} chars")),
        ));
    }

    fn on_extraction_start(&self, total_blocks: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} categories  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total_blocks as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Extracting");
    }

    fn on_block_start(&self, _index: usize, _total: usize, label: &str) {
        self.bar.set_message(label.to_string());
    }

    fn on_block_complete(&self, _index: usize, _total: usize, label: &str, records: usize) {
        let label = if label.is_empty() { "(front matter)" } else { label };
        self.bar.println(format!(
            "  {} {:<40}  {}",
            green("✓"),
            label,
            dim(&format!("{records:>3} records")),
        ));
        self.bar.inc(1);
    }

    fn on_extraction_complete(&self, total_records: usize, warnings: usize) {
        self.bar.finish_and_clear();
        if warnings == 0 {
            eprintln!("{} {} records extracted", green("✔"), bold(&total_records.to_string()));
        } else {
            eprintln!(
                "{} {} records extracted  ({} warnings)",
                cyan("⚠"),
                bold(&total_records.to_string()),
                warnings
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Default page range (1-12), CSV to stdout
  svc2csv directory.pdf

  # Write to a file
  svc2csv directory.pdf -o listings.csv

  # Different page range (0-based, inclusive)
  svc2csv --pages 2-30 directory.pdf -o listings.csv

  # Extra false-positive header tokens
  svc2csv --deny "HUD " --deny "VA " directory.pdf

  # Replace the denylist from a JSON file: [{"token": "FL ", "reason": "state"}]
  svc2csv --denylist tokens.json directory.pdf

  # Records, warnings and stats as JSON
  svc2csv --json directory.pdf > listings.json

  # PDF metadata only
  svc2csv --inspect-only directory.pdf

OUTPUT FORMAT:
  title, category, address, phone, email, description,
  Every field is followed by ", " and each row ends with ",". Fields are not
  quoted; commas inside extracted values are replaced with periods.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to the pdfium shared library
  RUST_LOG          Log filter, overrides -v / -q
"#;

/// Extract organization listings from a PDF service directory into CSV.
#[derive(Parser, Debug)]
#[command(
    name = "svc2csv",
    version,
    about = "Extract organization listings from a PDF service directory into CSV",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the directory PDF.
    input: PathBuf,

    /// Write CSV to this file instead of stdout.
    #[arg(short, long, env = "SVC2CSV_OUTPUT")]
    output: Option<PathBuf>,

    /// Inclusive, 0-based page range: 5 or 1-12.
    #[arg(long, env = "SVC2CSV_PAGES", default_value = "1-12")]
    pages: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "SVC2CSV_PASSWORD")]
    password: Option<String>,

    /// Emit entries found before the first category header, with an empty category.
    #[arg(long, env = "SVC2CSV_KEEP_FRONT_MATTER")]
    keep_front_matter: bool,

    /// Minimum line breaks for a paragraph to count as an entry.
    #[arg(long, env = "SVC2CSV_MIN_LINE_BREAKS", default_value_t = 3)]
    min_line_breaks: usize,

    /// Extra token that must not start or appear inside a category header (repeatable).
    #[arg(long = "deny", value_name = "TOKEN")]
    deny: Vec<String>,

    /// JSON file replacing the built-in header denylist.
    #[arg(long, env = "SVC2CSV_DENYLIST")]
    denylist: Option<PathBuf>,

    /// Drop paragraphs with neither a title nor a description.
    #[arg(long, env = "SVC2CSV_SKIP_MALFORMED")]
    skip_malformed: bool,

    /// Path to the pdfium shared library.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Output structured JSON (records, warnings, stats) instead of CSV.
    #[arg(long, env = "SVC2CSV_JSON")]
    json: bool,

    /// Print PDF metadata only, no extraction.
    #[arg(long)]
    inspect_only: bool,

    /// Disable progress bar.
    #[arg(long, env = "SVC2CSV_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SVC2CSV_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "SVC2CSV_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the progress bar is drawn.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.inspect_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ExtractionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(&cli.input, &config).context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
            );
        } else {
            println!("File:         {}", cli.input.display());
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref d) = meta.creation_date {
                println!("Created:      {}", d);
            }
        }
        return Ok(());
    }

    // ── Run extraction ───────────────────────────────────────────────────
    let output = extract(&cli.input, &config).context("Extraction failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        match cli.output {
            Some(ref path) => std::fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write {}", path.display()))?,
            None => println!("{json}"),
        }
    } else if let Some(ref path) = cli.output {
        save_csv(&output.records, path).context("Failed to write CSV")?;
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.to_csv().as_bytes())
            .context("Failed to write to stdout")?;
    }

    if !cli.quiet {
        print_summary(&output, cli.output.as_ref(), show_progress);
    }

    Ok(())
}

fn print_summary(output: &ExtractionOutput, path: Option<&PathBuf>, show_progress: bool) {
    let stats = &output.stats;
    if !show_progress {
        eprintln!(
            "Extracted {} records from {} categories ({} pages) in {}ms",
            stats.records, stats.categories, stats.rendered_pages, stats.total_duration_ms
        );
    }
    for warning in &output.warnings {
        eprintln!("  {} {}", cyan("⚠"), warning);
    }
    if let Some(path) = path {
        eprintln!(
            "{}  {} records  →  {}",
            green("✔"),
            stats.records,
            bold(&path.display().to_string())
        );
    }
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let pages = parse_pages(&cli.pages)?;

    let mut builder = ExtractionConfig::builder()
        .pages(pages)
        .min_line_breaks(cli.min_line_breaks)
        .skip_malformed(cli.skip_malformed);

    if cli.keep_front_matter {
        builder = builder.front_matter(FrontMatter::Keep);
    }
    if let Some(ref path) = cli.denylist {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read denylist from {:?}", path))?;
        builder = builder.denylist(CategoryDenylist::from_json(&json)?);
    }
    for token in &cli.deny {
        builder = builder.deny_token(token.as_str(), "command line");
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.as_str());
    }
    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_library(lib);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pages` into a `PageRange`: `"5"` or `"1-12"`.
fn parse_pages(s: &str) -> Result<PageRange> {
    let s = s.trim();

    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start
            .trim()
            .parse()
            .context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;
        return PageRange::new(start, end)
            .with_context(|| format!("Invalid page range '{s}'"));
    }

    let page: usize = s.parse().context("Invalid page number")?;
    Ok(PageRange::single(page))
}
