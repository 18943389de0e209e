// Diagnostic tool that traces every stage of the scan pipeline for an image
use std::path::Path;

use codescan::classify::signal::SignalStats;
use codescan::classify::CLASSIFY_THRESHOLDS;
use codescan::decode::DecoderAdapter;
use codescan::models::region;
use codescan::normalize::variant::DEFAULT_CASCADE;
use codescan::normalize::{decode_image, normalize};
use codescan::Scanner;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("usage: diagnose_pipeline <image> [<image> ...]");
        std::process::exit(2);
    }

    for img_path in &args {
        if !Path::new(img_path).exists() {
            println!("Image not found: {}", img_path);
            continue;
        }

        println!("\n============================================================");
        println!("DIAGNOSING: {}", img_path);
        println!("============================================================\n");

        diagnose_image(img_path);
    }
}

fn diagnose_image(img_path: &str) {
    let bytes = match std::fs::read(img_path) {
        Ok(bytes) => bytes,
        Err(err) => {
            println!("Failed to read file: {}", err);
            return;
        }
    };

    // Step 1: boundary decode
    let source = match decode_image(&bytes) {
        Ok(source) => source,
        Err(err) => {
            println!("Step 1: FAILED to decode image: {}", err);
            return;
        }
    };
    println!(
        "Step 1: Image decoded - {}x{} pixels",
        source.width(),
        source.height()
    );

    // Step 2: variant cascade, one decode attempt per recipe
    println!("\nStep 2: Preprocessing cascade");
    let adapter = DecoderAdapter::new();
    let mut first_hit: Option<&str> = None;
    for variant in DEFAULT_CASCADE {
        match normalize(&source, variant) {
            Ok(buffer) => {
                let verdict = match adapter.decode(&buffer) {
                    Some(code) => {
                        if first_hit.is_none() {
                            first_hit = Some(variant.name);
                        }
                        format!("DECODED {} ({})", code.symbology, code.value)
                    }
                    None => "no decode".to_string(),
                };
                println!(
                    "  [{:14}] {}x{} -> {}",
                    variant.name,
                    buffer.width(),
                    buffer.height(),
                    verdict
                );
            }
            Err(err) => {
                println!("  [{:14}] normalize failed: {}", variant.name, err);
            }
        }
    }
    match first_hit {
        Some(name) => println!("  First hit: {}", name),
        None => println!("  No variant produced a decode"),
    }

    // Step 3: region rescan
    println!("\nStep 3: Region rescan");
    for region in region::partition(source.width(), source.height()) {
        let cropped = source.crop_imm(region.x, region.y, region.width, region.height);
        let mut verdict = "no decode".to_string();
        for variant in DEFAULT_CASCADE {
            if let Ok(buffer) = normalize(&cropped, variant) {
                if let Some(code) = adapter.decode(&buffer) {
                    verdict = format!("DECODED {} via {}", code.symbology, variant.name);
                    break;
                }
            }
        }
        println!(
            "  [{:12}] ({},{}) {}x{} -> {}",
            region.label, region.x, region.y, region.width, region.height, verdict
        );
    }

    // Step 4: classifier signal
    println!("\nStep 4: Classifier signal statistics");
    let gray = source.to_luma8();
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
    match codescan::classify::classify(&source) {
        Some(code) => println!("  Classification: {} at {:.2}", code.symbology, code.confidence),
        None => println!("  Classification: none"),
    }

    // Step 5: full service result
    println!("\nStep 5: Full scan");
    match Scanner::new().scan_all(&bytes) {
        Ok(report) => {
            println!("  {} code(s) found:", report.count);
            for (i, code) in report.results.iter().enumerate() {
                println!(
                    "    [{}] {} conf={:.2} value={}",
                    i, code.symbology, code.confidence, code.value
                );
            }
        }
        Err(err) => println!("  {}", err),
    }
}
