use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use resort_core::{DayBucket, DecasRoomType, Season};
use resort_data::{AllInclusiveRateLoader, DecasRateLoader};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

/// Validate resort rate files and print a per-hotel summary.
///
/// The Decas file needs the columns `Hotel`, `Dias de la Semana`, `Doble`,
/// `Triple` and `Cuádruple`. The All-Inclusive file needs `Hotel`,
/// `Tipo de Habitacion`, `Dias de la Semana`, `Tarifa Baja`, `Tarifa Media`
/// and `Tarifa Alta`.
#[derive(Parser, Debug)]
#[command(name = "resort-rates")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the Decas rate CSV
    #[arg(short, long, required_unless_present = "all_inclusive")]
    decas: Option<PathBuf>,

    /// Path to the All-Inclusive rate CSV
    #[arg(short, long)]
    all_inclusive: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

fn cell(price: Option<Decimal>) -> String {
    price.map_or_else(|| "-".to_string(), |p| p.normalize().to_string())
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    if let Some(path) = &args.decas {
        println!("Loading Decas rates from: {}", path.display());
        let table = DecasRateLoader::load_from_file(path)
            .with_context(|| format!("Failed to load Decas rates: {}", path.display()))?;
        println!(
            "{} rows across {} hotels",
            table.len(),
            table.hotels().len()
        );

        for hotel in table.hotels() {
            println!("  {hotel}");
            for bucket in [DayBucket::Weekday, DayBucket::Weekend] {
                let Some(entry) = table.get(hotel, bucket) else {
                    println!("    {:<14} missing", bucket.as_str());
                    continue;
                };
                let prices: Vec<_> = DecasRoomType::all()
                    .iter()
                    .map(|room_type| format!("{room_type} {}", cell(entry.price(*room_type))))
                    .collect();
                println!("    {:<14} {}", bucket.as_str(), prices.join(", "));
            }
        }
    }

    if let Some(path) = &args.all_inclusive {
        println!("Loading All-Inclusive rates from: {}", path.display());
        let table = AllInclusiveRateLoader::load_from_file(path)
            .with_context(|| format!("Failed to load All-Inclusive rates: {}", path.display()))?;
        println!(
            "{} rows across {} hotels",
            table.len(),
            table.hotels().len()
        );

        for hotel in table.hotels() {
            println!("  {hotel}");
            for room_type in table.room_types(hotel) {
                println!("    {room_type}");
                for bucket in [DayBucket::Weekday, DayBucket::Weekend] {
                    let Some(entry) = table.get(hotel, room_type, bucket) else {
                        println!("      {:<14} missing", bucket.as_str());
                        continue;
                    };
                    let prices: Vec<_> = Season::all()
                        .iter()
                        .map(|season| format!("{season} {}", cell(entry.price(*season))))
                        .collect();
                    println!("      {:<14} {}", bucket.as_str(), prices.join(", "));
                }
            }
        }
    }

    Ok(())
}
