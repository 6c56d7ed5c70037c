//! Display or download an image in the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Display a file inline, downsampled to fit 1024x1024.
//! tensorcat photo.png
//!
//! # Keep the original resolution and request an 80-cell render width.
//! tensorcat --orig-res --render-width 80 photo.png
//!
//! # Write the encoded PNG to a file instead of the terminal.
//! tensorcat --download --name out.png photo.jpg
//! ```
//!
//! Diagnostics are controlled through `RUST_LOG` (e.g. `RUST_LOG=debug`).

use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

use tensorcat::core::init_tracing;
use tensorcat::pipeline::{encoder, Dimension, RenderConfig};
use tensorcat::utils::load_image;
use tensorcat::RenderResult;

#[derive(Parser, Debug)]
#[command(name = "tensorcat")]
#[command(about = "Display or download an image in the terminal")]
struct Args {
    /// Path to the image file.
    image: PathBuf,

    /// Write the encoded PNG bytes to a file instead of displaying inline.
    #[arg(long, short = 'd')]
    download: bool,

    /// Keep the original resolution, ignoring the size limits.
    #[arg(long)]
    orig_res: bool,

    /// Downsample the image so its width does not exceed this many pixels.
    #[arg(long, default_value_t = 1024)]
    max_width: u32,

    /// Downsample the image so its height does not exceed this many pixels.
    #[arg(long, default_value_t = 1024)]
    max_height: u32,

    /// Name carried in the control sequence, and the output file name in
    /// download mode. Defaults to the input file name.
    #[arg(long, short = 'n')]
    name: Option<String>,

    /// Render width: character cells ("80"), pixels ("640px"), percent of
    /// the viewport ("50%"), or "auto".
    #[arg(long, default_value = "auto")]
    render_width: String,

    /// Render height, same token grammar as --render-width.
    #[arg(long, default_value = "auto")]
    render_height: String,

    /// Fill the requested render box without preserving aspect ratio.
    #[arg(long, short = 's')]
    stretch: bool,

    /// File type hint carried in the control sequence.
    #[arg(long, short = 't')]
    file_type: Option<String>,
}

/// Returns true when the session sits behind a terminal multiplexer that
/// needs the passthrough envelope.
fn needs_passthrough() -> bool {
    std::env::var("TERM")
        .map(|term| term.starts_with("tmux") || term.starts_with("screen"))
        .unwrap_or(false)
}

fn run(args: &Args) -> RenderResult<()> {
    let name = match &args.name {
        Some(name) => name.clone(),
        None => args
            .image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };

    let config = RenderConfig {
        max_w: args.max_width,
        max_h: args.max_height,
        orig_res: args.orig_res,
        render_w: args.render_width.parse::<Dimension>()?,
        render_h: args.render_height.parse::<Dimension>()?,
        stretch: args.stretch,
        name: name.clone(),
        file_type: args.file_type.clone().unwrap_or_default(),
        passthrough: needs_passthrough(),
        ..RenderConfig::default()
    };

    let img = load_image(&args.image)?;
    debug!(width = img.width(), height = img.height(), "loaded image");

    if args.download {
        let fitted =
            tensorcat::processors::fit_within(img, config.max_w, config.max_h, config.orig_res)?;
        let png = encoder::encode_png(&fitted)?;
        std::fs::write(&name, png)?;
        info!(file = %name, "wrote encoded image");
    } else {
        let mut stdout = std::io::stdout().lock();
        tensorcat::pipeline::render_image_to(&mut stdout, img, &config)?;
    }

    Ok(())
}

fn main() {
    init_tracing();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        eprintln!("tensorcat: {err}");
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        std::process::exit(1);
    }
}
