use std::path::PathBuf;

use clap::Parser;
use plate_nester::ingest;
use plate_nester::labels::labels;
use plate_nester::render;
use plate_nester::stock::FULL_SHEET;
use plate_nester::types::total_waste_percent;
use plate_nester::{Plate, Rect, StockConfig, Strategy, nest};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "plate_nester",
    about = "Nest rectangular plates onto stock sheets and offcuts"
)]
struct Cli {
    /// Plates as LABEL:WxH, with an optional :grain suffix to lock rotation
    /// (e.g. D01:300x800 D02:300x800:grain)
    #[arg(long = "plate", num_args = 1.., required_unless_present = "csv")]
    plates: Vec<String>,

    /// CSV file with door, width, height and grain columns; header names
    /// are matched loosely and combined with any --plate entries
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Number of full sheets available
    #[arg(long, default_value_t = 2)]
    sheets: u32,

    /// Full sheet dimensions (WxH)
    #[arg(long, default_value_t = FULL_SHEET, value_parser = parse_dimensions)]
    sheet_size: Rect,

    /// Offcuts as WxH; used before full sheets, in the order given
    #[arg(long = "offcut", num_args = 1.., value_parser = parse_dimensions)]
    offcuts: Vec<Rect>,

    /// Placement strategy: rectangle-split or shelf
    #[arg(long, default_value = "rectangle-split", value_parser = parse_strategy)]
    strategy: Strategy,

    /// Refuse to run with more plates than this
    #[arg(long, default_value_t = 1000)]
    max_plates: usize,

    /// Show ASCII layout of each used sheet
    #[arg(long)]
    layout: bool,

    /// Print a label for every placed plate
    #[arg(long)]
    labels: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Log each placement decision to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_strategy(s: &str) -> Result<Strategy, String> {
    match s {
        "rectangle-split" => Ok(Strategy::RectangleSplit),
        "shelf" => Ok(Strategy::ShelfPacking),
        _ => Err(format!(
            "invalid strategy '{}', expected: rectangle-split or shelf",
            s
        )),
    }
}

fn parse_dimensions(s: &str) -> Result<Rect, String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!("invalid dimensions '{}', expected WxH", s));
    }
    let w = parts[0]
        .parse::<u32>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    let h = parts[1]
        .parse::<u32>()
        .map_err(|_| format!("invalid height in '{}'", s))?;
    if w == 0 || h == 0 {
        return Err(format!("dimensions must be non-zero in '{}'", s));
    }
    Ok(Rect::new(w, h))
}

fn parse_grain(s: &str) -> Result<bool, String> {
    match s.trim().to_lowercase().as_str() {
        "grain" | "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        _ => Err(format!("invalid grain flag '{}'", s)),
    }
}

fn parse_plate(s: &str) -> Result<Plate, String> {
    let parts: Vec<&str> = s.split(':').collect();
    let (label, dims, grain) = match parts.as_slice() {
        [label, dims] => (*label, *dims, false),
        [label, dims, grain] => (*label, *dims, parse_grain(grain)?),
        _ => return Err(format!("invalid plate '{}', expected LABEL:WxH[:grain]", s)),
    };
    let size = parse_dimensions(dims)?;
    Plate::new(label, size.w, size.h, grain).map_err(|e| e.to_string())
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let mut plates: Vec<Plate> = match &cli.csv {
        Some(path) => ingest::load_plates(path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }),
        None => Vec::new(),
    };
    let manual = cli
        .plates
        .iter()
        .map(|p| parse_plate(p))
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });
    plates.extend(manual);

    if plates.len() > cli.max_plates {
        eprintln!(
            "Error: {} plates exceeds the limit of {}",
            plates.len(),
            cli.max_plates
        );
        std::process::exit(1);
    }

    let stock = StockConfig {
        full_sheets: cli.sheets,
        sheet_size: cli.sheet_size,
        offcuts: cli.offcuts,
    };
    if let Err(e) = stock.check_limit() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    let mut sheets = stock.build_sheets().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let report = nest(&plates, &mut sheets, cli.strategy).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    if cli.json {
        let output = serde_json::json!({
            "strategy": cli.strategy,
            "sheets": sheets.iter().filter(|s| s.is_used()).collect::<Vec<_>>(),
            "unplaced": &report.unplaced,
            "extra_sheets_needed": report.extra_sheets_needed(),
            "waste_percent": total_waste_percent(&sheets),
        });
        match serde_json::to_string_pretty(&output) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    for sheet in sheets.iter().filter(|s| s.is_used()) {
        println!("{} ({}x{}):", sheet.name(), sheet.width(), sheet.height());
        for p in sheet.placements() {
            let rot = if p.rotated { " [rotated]" } else { "" };
            println!(
                "  {} {}x{} @ ({}, {}){}",
                p.source_label, p.width, p.height, p.x, p.y, rot
            );
        }
        if cli.layout {
            print!("{}", render::render_sheet(sheet));
        }
        println!();
    }

    if !report.all_placed() {
        println!("Out of stock. These plates did not fit:");
        for p in &report.unplaced {
            println!("  - {} ({})", p.label(), p.size());
        }
        println!(
            "You need {} extra sheet{}.",
            report.extra_sheets_needed(),
            if report.extra_sheets_needed() == 1 { "" } else { "s" }
        );
        println!();
    }

    if cli.labels {
        for label in labels(&sheets) {
            println!("{label}\n");
        }
    }

    let used = sheets.iter().filter(|s| s.is_used()).count();
    println!(
        "Summary: {} plate{} placed on {} sheet{}, {:.1}% waste",
        report.placed,
        if report.placed == 1 { "" } else { "s" },
        used,
        if used == 1 { "" } else { "s" },
        total_waste_percent(&sheets),
    );
}
