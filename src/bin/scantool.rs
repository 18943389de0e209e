use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use codescan::classify::signal::SignalStats;
use codescan::classify::CLASSIFY_THRESHOLDS;
use codescan::{ScanError, Scanner};

#[derive(Parser)]
#[command(name = "scantool", version, about = "codescan CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan an image and print the single best code as JSON
    Scan {
        #[arg(long)]
        image: PathBuf,
    },
    /// Scan an image and print every distinct code as JSON
    ScanAll {
        #[arg(long)]
        image: PathBuf,
    },
    /// Print the classifier's signal statistics for an image
    ClassifyStats {
        #[arg(long)]
        image: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Scan { image } => scan_cmd(&image),
        Command::ScanAll { image } => scan_all_cmd(&image),
        Command::ClassifyStats { image } => classify_stats_cmd(&image),
    }
}

fn read_bytes(path: &Path) -> Option<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            eprintln!("failed to read {}: {}", path.display(), err);
            None
        }
    }
}

fn scan_cmd(path: &Path) -> ExitCode {
    let Some(bytes) = read_bytes(path) else {
        return ExitCode::FAILURE;
    };

    match Scanner::new().scan(&bytes) {
        Ok(code) => {
            println!("{}", serde_json::to_string_pretty(&code).expect("serializable result"));
            ExitCode::SUCCESS
        }
        Err(ScanError::NoCodeDetected) => {
            eprintln!("no code detected in {}", path.display());
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("scan failed: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn scan_all_cmd(path: &Path) -> ExitCode {
    let Some(bytes) = read_bytes(path) else {
        return ExitCode::FAILURE;
    };

    match Scanner::new().scan_all(&bytes) {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report).expect("serializable report"));
            let verified = report.results.iter().filter(|c| c.is_verified()).count();
            eprintln!(
                "{} code(s): {} verified, {} inferred",
                report.count,
                verified,
                report.count - verified
            );
            ExitCode::SUCCESS
        }
        Err(ScanError::NoCodeDetected) => {
            eprintln!("no code detected in {}", path.display());
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("scan failed: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn classify_stats_cmd(path: &Path) -> ExitCode {
    let image = match image::open(path) {
        Ok(image) => image,
        Err(err) => {
            eprintln!("failed to open {}: {}", path.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let gray = image.to_luma8();
    println!("Image: {} ({}x{})", path.display(), gray.width(), gray.height());
    for &threshold in CLASSIFY_THRESHOLDS {
        let stats = SignalStats::measure(&gray, threshold);
        println!(
            "  threshold {:3}: black={:.3} h_trans={:3} v_trans={:3} ar={:.2} density={:.3}",
            threshold,
            stats.black_ratio,
            stats.h_transitions,
            stats.v_transitions,
            stats.aspect_ratio,
            stats.transition_density()
        );
    }

    match codescan::classify::classify(&image) {
        Some(code) => println!(
            "Classification: {} at {:.2}",
            code.symbology, code.confidence
        ),
        None => println!("Classification: none"),
    }
    ExitCode::SUCCESS
}
