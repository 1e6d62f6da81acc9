//! crunch-cli - Command-line interface for crunchkit
//!
//! A command-line tool for unpacking PowerPacker crunched files and byte-run
//! packed resources, and for inspecting crunch headers.

use clap::{Parser, Subcommand};
use crunchkit::crunch::{read_signature, CrunchType};
use crunchkit::{decrunch, CrunchHeader, RunLengthDecoder};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "crunch-cli")]
#[command(about = "A CLI tool for unpacking legacy crunched and byte-run packed resources")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decrunch a PP20 file
    Decrunch {
        /// Input crunched file
        input: PathBuf,

        /// Output file
        output: PathBuf,

        /// Force overwrite of output file
        #[arg(short, long)]
        force: bool,
    },

    /// Expand byte-run packed data
    Unrle {
        /// Input packed file
        input: PathBuf,

        /// Output file
        output: PathBuf,

        /// Number of bytes to produce
        #[arg(short, long)]
        size: usize,

        /// Header bytes to skip before the packed data
        #[arg(long, default_value_t = 0)]
        skip: usize,

        /// Force overwrite of output file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the crunch header of a file
    Info {
        /// File to analyze
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decrunch {
            input,
            output,
            force,
        } => decrunch_file(&input, &output, force, cli.verbose, cli.quiet),
        Commands::Unrle {
            input,
            output,
            size,
            skip,
            force,
        } => unrle_file(&input, &output, size, skip, force, cli.verbose, cli.quiet),
        Commands::Info { input } => show_file_info(&input, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn check_paths(input: &Path, output: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    if output.exists() && !force {
        return Err(format!(
            "Output file '{}' already exists. Use --force to overwrite",
            output.display()
        )
        .into());
    }

    Ok(())
}

fn progress_bar(quiet: bool, input_size: usize, message: &'static str) -> Option<ProgressBar> {
    if quiet || input_size <= 1024 * 1024 {
        return None;
    }

    let pb = ProgressBar::new(2);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
        .map(|s| s.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(message);
    pb.inc(1);
    Some(pb)
}

fn decrunch_file(
    input: &Path,
    output: &Path,
    force: bool,
    verbose: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    check_paths(input, output, force)?;

    if verbose {
        println!(
            "Decrunching '{}' to '{}'",
            input.display(),
            output.display()
        );
    }

    let start_time = Instant::now();

    let crunched = fs::read(input)?;
    let input_size = crunched.len();

    if verbose {
        println!("Crunched size: {} bytes", input_size);
    }

    let progress = progress_bar(quiet, input_size, "Decrunching...");

    let data = decrunch(&crunched).map_err(|e| format!("Decrunch failed: {}", e))?;

    if let Some(ref pb) = progress {
        pb.inc(1);
        pb.finish_with_message("Decrunch complete");
    }

    fs::write(output, &data)?;

    if !quiet {
        println!("✓ Decrunch successful!");
        println!("  Input:  {} bytes", input_size);
        println!("  Output: {} bytes", data.len());
        println!("  Time:   {:.2?}", start_time.elapsed());
    }

    Ok(())
}

fn unrle_file(
    input: &Path,
    output: &Path,
    size: usize,
    skip: usize,
    force: bool,
    verbose: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    check_paths(input, output, force)?;

    let packed = fs::read(input)?;
    let body = packed
        .get(skip..)
        .ok_or_else(|| format!("Cannot skip {} bytes of a {} byte file", skip, packed.len()))?;

    if verbose {
        println!(
            "Expanding '{}' to '{}' ({} bytes after skipping {})",
            input.display(),
            output.display(),
            size,
            skip
        );
    }

    let progress = progress_bar(quiet, packed.len(), "Expanding...");

    let mut data = vec![0u8; size];
    RunLengthDecoder::new(body)
        .fill(&mut data)
        .map_err(|e| format!("Expansion failed: {}", e))?;

    if let Some(ref pb) = progress {
        pb.inc(1);
        pb.finish_with_message("Expansion complete");
    }

    fs::write(output, &data)?;

    if !quiet {
        println!("✓ Expansion successful!");
        println!("  Input:  {} bytes", packed.len());
        println!("  Output: {} bytes", data.len());
    }

    Ok(())
}

fn show_file_info(input: &Path, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("Input file '{}' does not exist", input.display()).into());
    }

    let data = fs::read(input)?;

    let signature =
        read_signature(&data).ok_or("File too small to carry a crunch signature")?;

    println!("Crunch Information:");
    println!("  File: {}", input.display());
    println!("  Size: {} bytes", data.len());

    match CrunchType::detect(signature) {
        Some(kind) if kind.is_supported() => {}
        Some(kind) => {
            println!("  Format: {:?} (not supported)", kind);
            return Ok(());
        }
        None => {
            println!("  Format: not crunched (signature {:08X})", signature);
            return Ok(());
        }
    }

    let header = CrunchHeader::parse(&data)?;
    println!("  Format: {:?}", header.crunch_type);
    println!("  Offset widths: {:?}", header.offset_widths);
    println!("  Decrunched Size: {} bytes", header.decompressed_len);

    if verbose {
        println!("  Payload: {} bytes", header.payload_len);
        println!("  Skip bits: {}", header.skip_bits);
    }

    match decrunch(&data) {
        Ok(_) => println!("  Status: ✓ Valid crunched file"),
        Err(e) => {
            println!("  Status: ✗ Invalid or corrupted crunched file");
            if verbose {
                println!("  Error: {}", e);
            }
        }
    }

    Ok(())
}
