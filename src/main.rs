//! ascii-art CLI - Convert an image to ASCII art interactively

use ascii_art::charset::parse_range;
use ascii_art::output::HtmlOutput;
use ascii_art::shell::{Shell, INITIAL_COLUMNS};
use ascii_art::{AsciiArtError, BrightnessMatcher, CharSet, FontRasterizer};
use clap::Parser;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ascii-art", about = "Convert images to ASCII art by glyph brightness")]
struct Args {
    /// Input image file
    input: PathBuf,
    /// Font used to measure character densities
    #[arg(short, long, default_value = "assets/DejaVuSansMono.ttf")]
    font: PathBuf,
    /// Initial character range (e.g. "0-9", "a-z", "all")
    #[arg(short, long, default_value = "0-9")]
    chars: String,
    /// Initial characters per row
    #[arg(short, long, default_value_t = INITIAL_COLUMNS)]
    width: u32,
    /// HTML output file
    #[arg(short, long, default_value = "out.html")]
    output: PathBuf,
    /// Font family named in the HTML output
    #[arg(long, default_value = "Courier New")]
    html_font: String,
    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: log::LevelFilter,
}

fn main() -> Result<(), AsciiArtError> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level)
        .init();

    let mut chars = CharSet::new();
    match parse_range(&args.chars) {
        Some(range) => chars.add_range(range),
        None => {
            log::warn!("invalid character range {:?}, using 0-9", args.chars);
            chars = CharSet::digits();
        }
    }

    let image = ascii_art::load_and_normalize(&args.input)?;
    let matcher = BrightnessMatcher::new(FontRasterizer::from_file(&args.font)?);
    let html = HtmlOutput::new(args.output, args.html_font);

    let stdout = io::stdout();
    let mut shell = Shell::new(image, matcher, html, stdout.lock())
        .with_columns(args.width)
        .with_chars(chars);
    shell.run(io::stdin().lock())
}
