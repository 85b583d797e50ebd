//! dctsweep CLI - compress a grayscale image at several quality factors.
//!
//! Reads an 8-bit grayscale image (binary PGM or raw bytes), runs the block
//! DCT codec once per quality factor, writes every reconstruction and prints
//! the coefficient entropy of each run.

use clap::{Parser, Subcommand, ValueEnum};
use dctsweep_rs::constants::DEFAULT_QUALITY_FACTORS;
use dctsweep_rs::jpeg1::dct::BLOCK_SIZE;
use dctsweep_rs::{Codec, CodecConfig, Grid, QuantizationTable};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Baseline-JPEG style DCT codec with entropy estimation
#[derive(Parser)]
#[command(name = "dctsweep")]
#[command(author = "dctsweep-rs contributors")]
#[command(version)]
#[command(about = "Block DCT compression sweeps over quality factors", long_about = None)]
#[command(after_help = "EXAMPLES:
    dctsweep sweep -i image.pgm -o out/
    dctsweep sweep -i pixels.raw -W 512 -H 512 -o out/ -q 0.5,2,8 -f raw
    dctsweep table

Input must be 8-bit grayscale with dimensions that are multiples of 8.
Set RUST_LOG=debug for per-run diagnostics.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress and reconstruct an image at each quality factor
    ///
    /// Writes one reconstruction per quality factor (recon_<index>.<ext>)
    /// and prints the entropy of the quantized coefficients.
    #[command(visible_alias = "s")]
    Sweep {
        /// Input file: binary PGM (P5), or raw 8-bit samples with --width/--height
        #[arg(short, long, help = "Path to the input image file")]
        input: PathBuf,

        /// Output directory for reconstructions
        #[arg(short, long, help = "Directory for the reconstructed images")]
        output: PathBuf,

        /// Image width in pixels (raw input only)
        #[arg(short = 'W', long)]
        width: Option<usize>,

        /// Image height in pixels (raw input only)
        #[arg(short = 'H', long)]
        height: Option<usize>,

        /// Comma-separated quality factors (greater than zero)
        #[arg(short, long, value_delimiter = ',')]
        quality: Vec<f64>,

        /// Output format for reconstructions
        #[arg(short, long, default_value = "pgm", value_enum)]
        format: OutputFormat,

        /// Process blocks and runs on a single thread
        #[arg(long)]
        sequential: bool,
    },

    /// Print the standard luminance quantization table
    #[command(visible_alias = "t")]
    Table,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Raw binary pixel data
    Raw,
    /// Portable GrayMap (P5) format
    Pgm,
}

impl OutputFormat {
    fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Raw => "raw",
            OutputFormat::Pgm => "pgm",
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sweep {
            input,
            output,
            width,
            height,
            quality,
            format,
            sequential,
        } => sweep_image(&input, &output, width, height, quality, &format, sequential),
        Commands::Table => print_table(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn sweep_image(
    input: &Path,
    output: &Path,
    width: Option<usize>,
    height: Option<usize>,
    quality: Vec<f64>,
    format: &OutputFormat,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let (pixels, width, height) = if data.starts_with(b"P5") {
        read_pgm(&data)?
    } else {
        match (width, height) {
            (Some(w), Some(h)) => (data, w, h),
            _ => return Err("raw input requires --width and --height".into()),
        }
    };
    let image = Grid::from_pixels(width, height, &pixels)?;

    let qualities = if quality.is_empty() {
        DEFAULT_QUALITY_FACTORS.to_vec()
    } else {
        quality
    };

    let config = CodecConfig {
        parallel: !sequential,
        ..CodecConfig::default()
    };
    let codec = Codec::with_config(QuantizationTable::standard_luminance(), config);
    let sweep = codec.run(&image, &qualities)?;
    let total = sweep.len();
    info!(
        "{} runs over {}x{} image (parallel: {})",
        total,
        width,
        height,
        codec.config().parallel
    );

    fs::create_dir_all(output)?;
    println!(
        "{:>5}  {:>10}  {:>10}  {:>9}  {:>7}  {:>8}",
        "run", "quality", "entropy", "nonzero", "ratio", "psnr"
    );

    let mut failures = 0;
    for (index, (run, q)) in sweep.into_runs().into_iter().zip(&qualities).enumerate() {
        match run {
            Ok(run) => {
                let path = output.join(format!("recon_{}.{}", index, format.extension()));
                let recon = run.reconstruction.to_pixels();
                match format {
                    OutputFormat::Raw => fs::write(&path, &recon)?,
                    OutputFormat::Pgm => write_pgm(&path, &recon, width, height)?,
                }
                let psnr = image.psnr(&run.reconstruction)?;
                println!(
                    "{:>5}  {:>10}  {:>10.4}  {:>9}  {:>7.4}  {:>8.2}",
                    index,
                    q,
                    run.entropy,
                    run.stats.nonzero,
                    run.stats.nonzero_ratio(),
                    psnr
                );
            }
            Err(e) => {
                failures += 1;
                println!("{:>5}  {:>10}  rejected: {}", index, q, e);
            }
        }
    }

    println!(
        "✓ Wrote {} reconstructions to {:?}",
        total - failures,
        output
    );
    if failures > 0 {
        return Err(format!("{} quality factor(s) rejected", failures).into());
    }
    Ok(())
}

fn print_table() -> Result<(), Box<dyn std::error::Error>> {
    let table = QuantizationTable::standard_luminance();
    println!("Standard luminance quantization table:");
    for row in table.values().chunks(BLOCK_SIZE) {
        let line: Vec<String> = row.iter().map(|v| format!("{:>4}", v)).collect();
        println!("{}", line.join(""));
    }
    Ok(())
}

// Internal helpers

fn read_pgm(data: &[u8]) -> Result<(Vec<u8>, usize, usize), Box<dyn std::error::Error>> {
    // Header: magic, width, height, maxval, separated by whitespace, with
    // optional '#' comments, followed by a single whitespace byte.
    let mut fields = Vec::with_capacity(4);
    let mut pos = 0;
    while fields.len() < 4 {
        while pos < data.len() && data[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos < data.len() && data[pos] == b'#' {
            while pos < data.len() && data[pos] != b'\n' {
                pos += 1;
            }
            continue;
        }
        let start = pos;
        while pos < data.len() && !data[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if start == pos {
            return Err("truncated PGM header".into());
        }
        fields.push(std::str::from_utf8(&data[start..pos])?);
    }
    pos += 1;

    let width: usize = fields[1].parse()?;
    let height: usize = fields[2].parse()?;
    let maxval: usize = fields[3].parse()?;
    if maxval > 255 {
        return Err(format!("unsupported PGM maxval {}", maxval).into());
    }

    let end = width
        .checked_mul(height)
        .and_then(|len| len.checked_add(pos))
        .ok_or_else(|| format!("PGM dimensions {}x{} are too large", width, height))?;
    if data.len() < end {
        return Err("truncated PGM pixel data".into());
    }
    Ok((data[pos..end].to_vec(), width, height))
}

fn write_pgm(
    path: &Path,
    pixels: &[u8],
    width: usize,
    height: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    use std::io::Write;
    let mut file = fs::File::create(path)?;

    writeln!(file, "P5")?;
    writeln!(file, "{} {}", width, height)?;
    writeln!(file, "255")?;
    file.write_all(pixels)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_pgm_parses_header_and_comments() {
        let mut data = b"P5\n# made by hand\n8 2\n255\n".to_vec();
        data.extend(0..16u8);
        let (pixels, width, height) = read_pgm(&data).unwrap();
        assert_eq!((width, height), (8, 2));
        assert_eq!(pixels, (0..16u8).collect::<Vec<_>>());
    }

    #[test]
    fn test_read_pgm_rejects_truncated_data() {
        let data = b"P5 8 8 255\n\x00\x01".to_vec();
        assert!(read_pgm(&data).is_err());
    }

    #[test]
    fn test_read_pgm_rejects_overflowing_dimensions() {
        let header = format!("P5 {} {} 255\n", 1usize << 32, 1usize << 32);
        let err = read_pgm(header.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("too large"), "{}", err);

        let header = format!("P5 {} 1 255\n", usize::MAX);
        assert!(read_pgm(header.as_bytes()).is_err());
    }
}
