use anyhow::Context;
use clap::{Parser, builder::PossibleValuesParser};
use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::PathBuf,
};
use tracing::Level;

use crate::{
    errors::InputError,
    input::{OrderLines, StreamMode, read_header},
    market::{Market, MarketConfig},
    orders::OrderRequest,
    report::{self, Sections},
    simulate::OrderGenerator,
};

/// Replays an order stream through one limit order book per stock
#[derive(Parser, Debug)]
#[command(name = "market-replay")]
#[command(
    version,
    about = "Replays a timestamped order stream and reports trades, medians and time travelers"
)]
pub struct Cli {
    /// Print a line for every trade
    #[arg(short, long)]
    pub verbose: bool,

    /// Print each stock's median match price whenever the timestamp changes
    #[arg(short, long)]
    pub median: bool,

    /// Print per-trader totals at end of day
    #[arg(short = 'i', long = "trader-info", alias = "trader_info")]
    pub trader_info: bool,

    /// Print each stock's best time-traveler trade at end of day
    #[arg(short = 't', long = "time-travelers", alias = "time_travelers")]
    pub time_travelers: bool,

    /// Read the stream from a file instead of stdin
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Print the end-of-day report as JSON
    #[arg(long, conflicts_with_all = ["verbose", "median"])]
    pub json: bool,

    /// Log verbosity (logs go to stderr)
    #[arg(
        long,
        default_value = "warn",
        value_parser = PossibleValuesParser::new(["error", "warn", "info", "debug", "trace"])
    )]
    pub log_level: String,
}

impl Cli {
    fn sections(&self) -> Sections {
        Sections {
            trader_info: self.trader_info,
            time_travelers: self.time_travelers,
        }
    }
}

/// Reads the header from `input`, replays every order and writes the report to `out`.
///
/// Stops at the first invalid header, order line or order; whatever was already written
/// stays written.
pub fn run<R: BufRead, W: Write>(cli: &Cli, mut input: R, out: &mut W) -> anyhow::Result<()> {
    let header = read_header(&mut input).context("reading stream header")?;
    tracing::info!(comment = %header.comment, mode = ?header.mode, "stream header");

    let mut market = Market::new(MarketConfig {
        num_traders: header.num_traders,
        num_instruments: header.num_instruments,
        track_medians: cli.median,
    });

    if !cli.json {
        writeln!(out, "Processing orders...")?;
    }

    match header.mode {
        StreamMode::TradeList => replay(cli, &mut market, OrderLines::new(input), out)?,
        StreamMode::PseudoRandom(config) => {
            let generator = OrderGenerator::new(config)?;
            replay(cli, &mut market, generator.map(Ok), out)?
        }
    }

    let eod = market.finish();
    if cli.json {
        report::write_json(out, &eod)?;
    } else {
        report::write_end_of_day(out, &eod, cli.sections())?;
    }
    out.flush()?;
    Ok(())
}

fn replay<I, W>(cli: &Cli, market: &mut Market, orders: I, out: &mut W) -> anyhow::Result<()>
where
    I: Iterator<Item = Result<OrderRequest, InputError>>,
    W: Write,
{
    for order in orders {
        let submission = market.submit(order?)?;
        if cli.median {
            for median in &submission.medians {
                report::write_median(out, median)?;
            }
        }
        if cli.verbose {
            for trade in &submission.trades {
                report::write_trade(out, trade)?;
            }
        }
    }
    Ok(())
}

fn init_tracing(level: &str) {
    let level = level.parse::<Level>().unwrap_or(Level::WARN);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match &cli.input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("opening {}", path.display()))?;
            run(&cli, BufReader::new(file), &mut out)
        }
        None => run(&cli, io::stdin().lock(), &mut out),
    }
}
