mod app;

use app::{AsciifyApp, setup_ctrlc_handler};
use asciify::AsciifyConfig;
use asciify::config::DEFAULT_SIZE_LIMIT;
use clap::Parser;
use imageproc::rect::Rect;
use std::path::PathBuf;
use std::process::ExitCode;

/// Redraw an image as a mosaic of coloured characters
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input image path
    input: PathBuf,

    /// Output image path
    output: PathBuf,

    /// Cell edge in pixels (clamped to 2-16)
    #[arg(short = 's', long, default_value_t = 8)]
    cell_size: u32,

    /// Colour budget; each cell uses at most sqrt(colors) colours (clamped to 4-128)
    #[arg(short, long, default_value_t = 16)]
    colors: u32,

    /// Candidate characters, in priority order
    #[arg(short = 'm', long, default_value = "01")]
    charset: String,

    /// Reject jobs whose width * height * colors * characters exceeds this
    #[arg(long, default_value_t = DEFAULT_SIZE_LIMIT)]
    size_limit: u64,

    /// Keep the edge-replicated padding instead of cropping it
    #[arg(long)]
    keep_padding: bool,

    /// Only process this selection, given as X,Y,WIDTH,HEIGHT
    #[arg(short, long, value_parser = parse_region)]
    region: Option<Rect>,
}

fn parse_region(s: &str) -> Result<Rect, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, w, h] = parts.as_slice() else {
        return Err(format!("expected X,Y,WIDTH,HEIGHT, got {:?}", s));
    };

    let x: i32 = x.parse().map_err(|e| format!("bad x: {}", e))?;
    let y: i32 = y.parse().map_err(|e| format!("bad y: {}", e))?;
    let w: u32 = w.parse().map_err(|e| format!("bad width: {}", e))?;
    let h: u32 = h.parse().map_err(|e| format!("bad height: {}", e))?;
    if w == 0 || h == 0 {
        return Err("selection width and height must be positive".to_string());
    }
    Ok(Rect::at(x, y).of_size(w, h))
}

fn main() -> ExitCode {
    // Configure logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Err(e) = setup_ctrlc_handler() {
        log::warn!("Ctrl+C handler unavailable: {}", e);
    }

    let config = AsciifyConfig {
        cell_size: args.cell_size,
        color_budget: args.colors,
        charset: args.charset,
        size_limit: args.size_limit,
        keep_padding: args.keep_padding,
    };

    let app = AsciifyApp::new(config, args.region);
    match app.run(&args.input, &args.output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}: {:#}", args.input.display(), e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_region() {
        let rect = parse_region("4, -2,10,20").unwrap();
        assert_eq!(rect, Rect::at(4, -2).of_size(10, 20));
    }

    #[test]
    fn test_parse_region_rejects_bad_input() {
        assert!(parse_region("1,2,3").is_err());
        assert!(parse_region("1,2,0,4").is_err());
        assert!(parse_region("a,2,3,4").is_err());
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["asciify", "in.png", "out.png"]);
        assert_eq!(args.cell_size, 8);
        assert_eq!(args.colors, 16);
        assert_eq!(args.charset, "01");
        assert_eq!(args.region, None);
    }
}
