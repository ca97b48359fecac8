use std::path::PathBuf;

use anyhow::{Context, bail, ensure};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::debug;

use resort_cli::config::DEFAULT_CONFIG_FILE;
use resort_cli::utils::{parse_date, parse_decimal};
use resort_cli::views::{MAX_ADULTS, MAX_CHILDREN, MIN_ADULTS};
use resort_cli::{PricingConfig, PricingSession, RateBook, logging};
use resort_core::{DecasRoomType, RoomCounts, Season};

const MAX_ROOMS: i64 = RoomCounts::MAX_PER_TYPE as i64;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Resort stay pricing for the Decas and All-Inclusive plans.
///
/// Loads both rate files, then prices a stay under the requested plan.
#[derive(Debug, Parser)]
#[command(name = "resort-pricer", version, about)]
struct Cli {
    /// TOML configuration file. Defaults apply when it does not exist.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Decas rate CSV (overrides the config file).
    #[arg(long)]
    decas_rates: Option<PathBuf>,

    /// All-Inclusive rate CSV (overrides the config file).
    #[arg(long)]
    all_inclusive_rates: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `resort_core=trace`. `RUST_LOG` wins.
    #[arg(long)]
    log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List hotels found in the rate files.
    Hotels {
        /// Also list each hotel's All-Inclusive room types.
        #[arg(long)]
        rooms: bool,
    },

    /// Price a stay under the Decas plan.
    Decas(DecasArgs),

    /// Price a stay under the All-Inclusive plan.
    AllInclusive(AllInclusiveArgs),
}

#[derive(Debug, Args)]
struct StayArgs {
    /// Hotel name; defaults to the configured hotel.
    #[arg(long)]
    hotel: Option<String>,

    /// First night of the stay (YYYY-MM-DD or DD/MM/YYYY).
    #[arg(long, value_parser = parse_date)]
    check_in: NaiveDate,

    /// Departure day; not charged.
    #[arg(long, value_parser = parse_date)]
    check_out: NaiveDate,
}

#[derive(Debug, Args)]
struct DecasArgs {
    #[command(flatten)]
    stay: StayArgs,

    #[arg(
        long,
        default_value_t = 0,
        value_parser = clap::value_parser!(u32).range(0..=MAX_ROOMS)
    )]
    double: u32,

    #[arg(
        long,
        default_value_t = 0,
        value_parser = clap::value_parser!(u32).range(0..=MAX_ROOMS)
    )]
    triple: u32,

    #[arg(
        long,
        default_value_t = 0,
        value_parser = clap::value_parser!(u32).range(0..=MAX_ROOMS)
    )]
    quadruple: u32,
}

#[derive(Debug, Args)]
struct AllInclusiveArgs {
    #[command(flatten)]
    stay: StayArgs,

    /// Room type; defaults to the hotel's first room type.
    #[arg(long)]
    room: Option<String>,

    /// Baja/Media/Alta (or low/medium/high).
    #[arg(long, value_parser = parse_season, default_value = "Baja")]
    season: Season,

    #[arg(
        long,
        default_value_t = 2,
        value_parser = clap::value_parser!(u32).range(i64::from(MIN_ADULTS)..=i64::from(MAX_ADULTS))
    )]
    adults: u32,

    /// Age of one child; repeat per child.
    #[arg(long = "child-age", value_parser = clap::value_parser!(u32).range(0..=17))]
    child_ages: Vec<u32>,

    /// Adults pay half.
    #[arg(long, conflicts_with = "discount")]
    two_for_one: bool,

    /// Percentage taken off the adult price (1-100).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    discount: Option<u32>,

    /// Local currency per USD; defaults to the configured rate.
    #[arg(long, value_parser = parse_decimal)]
    currency_rate: Option<Decimal>,

    /// Print the full breakdown instead of the summary.
    #[arg(long)]
    details: bool,
}

fn parse_season(s: &str) -> Result<Season, String> {
    Season::parse(s).ok_or_else(|| format!("unknown season '{s}': expected Baja, Media or Alta"))
}

// ─── commands ────────────────────────────────────────────────────────────────

fn list_hotels(
    rates: &RateBook,
    rooms: bool,
) {
    for hotel in rates.hotels() {
        println!("{hotel}");
        if rooms {
            for room_type in rates.all_inclusive.room_types(hotel) {
                println!("  {room_type}");
            }
        }
    }
}

fn select_stay(
    session: &mut PricingSession,
    stay: &StayArgs,
) -> anyhow::Result<()> {
    if let Some(hotel) = &stay.hotel {
        ensure!(
            session.rates().hotels().contains(&hotel.as_str()),
            "unknown hotel '{hotel}'"
        );
        session.set_hotel(hotel);
    }
    // The selection would silently move an inverted check-out; report it instead.
    ensure!(
        stay.check_out > stay.check_in,
        "please select valid dates: check-out {} must be after check-in {}",
        stay.check_out,
        stay.check_in
    );
    session.set_stay(stay.check_in, stay.check_out);
    Ok(())
}

fn price_decas(
    session: &mut PricingSession,
    args: &DecasArgs,
) -> anyhow::Result<()> {
    select_stay(session, &args.stay)?;

    let mut view = session.decas_mut();
    for (room_type, count) in [
        (DecasRoomType::Double, args.double),
        (DecasRoomType::Triple, args.triple),
        (DecasRoomType::Quadruple, args.quadruple),
    ] {
        view.set_room_count(room_type, count);
    }

    match view.result() {
        Ok(quote) => {
            println!("{quote}");
            Ok(())
        }
        Err(err) => bail!("{err}"),
    }
}

fn price_all_inclusive(
    session: &mut PricingSession,
    args: &AllInclusiveArgs,
) -> anyhow::Result<()> {
    ensure!(
        args.child_ages.len() <= MAX_CHILDREN,
        "at most {MAX_CHILDREN} children per booking"
    );

    session.set_season(args.season);
    select_stay(session, &args.stay)?;

    let mut view = session.all_inclusive_mut();
    if let Some(room) = &args.room {
        ensure!(
            view.room_types().contains(&room.as_str()),
            "hotel '{}' has no room type '{room}'",
            session.selection().hotel()
        );
        view.set_room_type(room.as_str());
    }
    view.set_adults(args.adults);
    view.set_child_ages(args.child_ages.clone());
    if args.two_for_one {
        view.set_two_for_one(true);
    } else if let Some(percent) = args.discount {
        view.set_percent(percent);
        view.set_percent_enabled(true);
    }
    if let Some(rate) = args.currency_rate {
        view.set_currency_rate(rate);
    }

    match view.result() {
        Ok(quote) if args.details => println!("{quote}"),
        Ok(quote) => println!("{}", quote.summary()),
        Err(err) => bail!("{err}"),
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = PricingConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;
    config.apply_overrides(
        cli.decas_rates.clone(),
        cli.all_inclusive_rates.clone(),
        cli.log_level.clone(),
    );

    logging::init_logging(&config.log_level);
    if let Some(path) = &cli.log_file {
        logging::enable_file_logging(path)?;
    }
    debug!(?config, "configuration resolved");

    let rates = RateBook::load(&config)?;
    let today = Local::now().date_naive();

    match &cli.command {
        Command::Hotels { rooms } => {
            list_hotels(&rates, *rooms);
            Ok(())
        }
        Command::Decas(args) => {
            let mut session = PricingSession::new(rates, &config, today);
            price_decas(&mut session, args)
        }
        Command::AllInclusive(args) => {
            let mut session = PricingSession::new(rates, &config, today);
            price_all_inclusive(&mut session, args)
        }
    }
}
