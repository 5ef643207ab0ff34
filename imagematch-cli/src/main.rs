//! imagematch CLI - pixel-level image comparison
//!
//! Compare two images, count the differing pixels and optionally save a
//! diff image.

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Instant;

use clap::error::ErrorKind;
use clap::{ColorChoice, Parser};
use colored::Colorize;
use imagematch::{imagematch, ImagematchError, Options, RGB8};
use log::{debug, info};
use serde::Serialize;

/// No differences found.
const EXIT_MATCH: u8 = 0;
/// Error loading or saving an image.
const EXIT_IO: u8 = 2;
/// Bad command-line arguments.
const EXIT_USAGE: u8 = 64;
/// Input images have different dimensions.
const EXIT_DIMENSIONS: u8 = 65;
/// Differences found.
const EXIT_DIFFERENT: u8 = 66;

/// Pixel-level image comparison
///
/// Compares two images pixel by pixel using a perceptual color metric and
/// reports how many pixels differ. Pixels that only differ because of
/// anti-aliasing are detected and not counted unless --include-aa is given.
#[derive(Parser, Debug)]
#[command(name = "imagematch")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    Compare two screenshots:
        imagematch expected.png actual.png

    Save a diff image, more sensitive threshold:
        imagematch -t 0.05 expected.png actual.png diff.png

    Only paint the differences (transparent background):
        imagematch --diff-mask expected.png actual.png mask.png

    Output JSON for scripting:
        imagematch --json expected.png actual.png

EXIT CODES:
    0  - No differences
    2  - Error (file not found, invalid image, etc.)
    64 - Usage error
    65 - Image dimensions do not match
    66 - Differences found")]
struct Cli {
    /// First image (baseline)
    #[arg(value_name = "IMAGE1")]
    image1: PathBuf,

    /// Second image (candidate)
    #[arg(value_name = "IMAGE2")]
    image2: PathBuf,

    /// Save the diff image to this file
    #[arg(value_name = "DIFF")]
    diff: Option<PathBuf>,

    /// Matching threshold (0 to 1); smaller is more sensitive
    #[arg(short, long, default_value = "0.1", value_name = "T")]
    threshold: f64,

    /// Count anti-aliased pixels as differences
    #[arg(long)]
    include_aa: bool,

    /// Opacity of the first image in the diff background
    #[arg(long, default_value = "0.1", value_name = "A")]
    alpha: f64,

    /// Color of anti-aliased pixels in the diff image
    #[arg(long, default_value = "255,255,0", value_name = "R,G,B")]
    aa_color: Rgb,

    /// Color of differing pixels in the diff image
    #[arg(long, default_value = "255,0,0", value_name = "R,G,B")]
    diff_color: Rgb,

    /// Color of pixels that got darker in IMAGE2 (defaults to --diff-color)
    #[arg(long, value_name = "R,G,B")]
    diff_color_alt: Option<Rgb>,

    /// Paint differences over a transparent background
    #[arg(long)]
    diff_mask: bool,

    /// Output JSON
    #[arg(long)]
    json: bool,

    /// Quiet mode - only output the number of different pixels
    #[arg(long, short = 's')]
    quiet: bool,

    /// Control color output
    #[arg(long, value_enum, default_value = "auto")]
    color: ColorChoice,
}

/// `R,G,B` color argument.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Rgb(RGB8);

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [r, g, b] = parts.as_slice() else {
            return Err(format!("expected R,G,B, got '{s}'"));
        };
        let channel = |c: &str| {
            c.parse::<u8>()
                .map_err(|e| format!("invalid color channel '{c}': {e}"))
        };
        Ok(Self(RGB8::new(channel(*r)?, channel(*g)?, channel(*b)?)))
    }
}

#[derive(Serialize)]
struct JsonOutput {
    image1: String,
    image2: String,
    width: u32,
    height: u32,
    different_pixels: usize,
    error_percent: f64,
    elapsed_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    diff: Option<String>,
    options: JsonOptions,
}

#[derive(Serialize)]
struct JsonOptions {
    threshold: f64,
    include_aa: bool,
    alpha: f64,
    diff_mask: bool,
}

/// Errors that end the run, each with its own exit code.
#[derive(Debug)]
enum RunError {
    Io(String),
    Dimensions { w1: u32, h1: u32, w2: u32, h2: u32 },
}

impl RunError {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Io(_) => EXIT_IO,
            Self::Dimensions { .. } => EXIT_DIMENSIONS,
        }
    }
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(msg) => f.write_str(msg),
            Self::Dimensions { w1, h1, w2, h2 } => {
                write!(f, "Image dimensions do not match: {w1}x{h1} vs {w2}x{h2}")
            }
        }
    }
}

impl From<ImagematchError> for RunError {
    fn from(e: ImagematchError) -> Self {
        Self::Io(format!("comparison failed: {e}"))
    }
}

struct Comparison {
    width: u32,
    height: u32,
    mismatched: usize,
    elapsed_ms: f64,
}

impl Comparison {
    /// Share of differing pixels in percent, rounded to two decimals.
    fn error_percent(&self) -> f64 {
        let total = f64::from(self.width) * f64::from(self.height);
        if total == 0.0 {
            return 0.0;
        }
        (100.0 * 100.0 * self.mismatched as f64 / total).round() / 100.0
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            e.print().ok();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(EXIT_USAGE),
            };
        }
    };

    setup_colors(&cli);

    match run(&cli) {
        Ok(comparison) => {
            if let Err(e) = output_result(&cli, &comparison) {
                eprintln!("{}: {}", "error".red().bold(), e);
                return ExitCode::from(EXIT_IO);
            }
            if comparison.mismatched > 0 {
                ExitCode::from(EXIT_DIFFERENT)
            } else {
                ExitCode::from(EXIT_MATCH)
            }
        }
        Err(e) => {
            if !cli.quiet {
                eprintln!("{}: {}", "error".red().bold(), e);
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn setup_colors(cli: &Cli) {
    match cli.color {
        ColorChoice::Always => colored::control::set_override(true),
        ColorChoice::Never => colored::control::set_override(false),
        ColorChoice::Auto => {
            // Disable colors if not a terminal
            if !io::stdout().is_terminal() {
                colored::control::set_override(false);
            }
        }
    }
}

fn build_options(cli: &Cli) -> Options {
    Options::default()
        .with_threshold(cli.threshold)
        .with_include_aa(cli.include_aa)
        .with_alpha(cli.alpha)
        .with_aa_color(cli.aa_color.0)
        .with_diff_color(cli.diff_color.0)
        .with_diff_color_alt(cli.diff_color_alt.map(|c| c.0))
        .with_diff_mask(cli.diff_mask)
}

fn load_rgba(path: &Path) -> Result<image::RgbaImage, RunError> {
    let img = image::open(path)
        .map_err(|e| RunError::Io(format!("failed to load '{}': {}", path.display(), e)))?;
    debug!(
        "loaded '{}': {}x{} {:?}",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );
    Ok(img.to_rgba8())
}

fn run(cli: &Cli) -> Result<Comparison, RunError> {
    let img1 = load_rgba(&cli.image1)?;
    let img2 = load_rgba(&cli.image2)?;

    let (width, height) = img1.dimensions();
    if img2.dimensions() != (width, height) {
        let (w2, h2) = img2.dimensions();
        return Err(RunError::Dimensions {
            w1: width,
            h1: height,
            w2,
            h2,
        });
    }

    let options = build_options(cli);
    let mut diff = cli.diff.as_ref().map(|_| vec![0u8; img1.as_raw().len()]);

    let start = Instant::now();
    let mismatched = imagematch(
        img1.as_raw(),
        img2.as_raw(),
        diff.as_mut(),
        width as usize,
        height as usize,
        &options,
    )?;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    info!("matched {width}x{height} in {elapsed_ms:.3}ms: {mismatched} different pixels");

    if let (Some(path), Some(buf)) = (&cli.diff, diff) {
        save_diff(path, buf, width, height)?;
        if !cli.quiet && !cli.json {
            eprintln!("Diff saved to: {}", path.display());
        }
    }

    Ok(Comparison {
        width,
        height,
        mismatched,
        elapsed_ms,
    })
}

fn save_diff(path: &Path, buf: Vec<u8>, width: u32, height: u32) -> Result<(), RunError> {
    let img = image::RgbaImage::from_raw(width, height, buf)
        .ok_or_else(|| RunError::Io("diff buffer does not match image size".to_string()))?;
    img.save(path)
        .map_err(|e| RunError::Io(format!("failed to save '{}': {}", path.display(), e)))
}

fn output_result(cli: &Cli, comparison: &Comparison) -> Result<(), String> {
    if cli.json {
        let output = JsonOutput {
            image1: cli.image1.display().to_string(),
            image2: cli.image2.display().to_string(),
            width: comparison.width,
            height: comparison.height,
            different_pixels: comparison.mismatched,
            error_percent: comparison.error_percent(),
            elapsed_ms: comparison.elapsed_ms,
            diff: cli.diff.as_ref().map(|p| p.display().to_string()),
            options: JsonOptions {
                threshold: cli.threshold,
                include_aa: cli.include_aa,
                alpha: cli.alpha,
                diff_mask: cli.diff_mask,
            },
        };
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| format!("failed to serialize JSON: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    if cli.quiet {
        println!("{}", comparison.mismatched);
        return Ok(());
    }

    let count = comparison.mismatched.to_string();
    let count = if comparison.mismatched > 0 {
        count.red().bold()
    } else {
        count.green().bold()
    };
    println!("matched in: {:.3}ms", comparison.elapsed_ms);
    println!("different pixels: {count}");
    println!("error: {}%", comparison.error_percent());

    Ok(())
}
