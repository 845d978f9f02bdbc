//! Text and JSON rendering of market facts.

use std::io::{self, Write};

use crate::{
    ledger::TraderAccount,
    market::{EndOfDay, TravelerReport},
    median::MedianQuote,
    trade::Trade,
};

/// Which end-of-day sections to print after the summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sections {
    pub trader_info: bool,
    pub time_travelers: bool,
}

pub fn write_trade<W: Write>(out: &mut W, trade: &Trade) -> io::Result<()> {
    writeln!(
        out,
        "Trader {} purchased {} shares of Stock {} from Trader {} for ${}/share",
        trade.buyer, trade.quantity, trade.instrument, trade.seller, trade.price
    )
}

pub fn write_median<W: Write>(out: &mut W, median: &MedianQuote) -> io::Result<()> {
    writeln!(
        out,
        "Median match price of Stock {} at time {} is ${}",
        median.instrument, median.timestamp, median.price
    )
}

fn write_trader<W: Write>(out: &mut W, trader: usize, account: &TraderAccount) -> io::Result<()> {
    writeln!(
        out,
        "Trader {} bought {} and sold {} for a net transfer of ${}",
        trader, account.bought, account.sold, account.net_transfer
    )
}

fn write_traveler<W: Write>(out: &mut W, report: &TravelerReport) -> io::Result<()> {
    match report.opportunity {
        Some(best) => writeln!(
            out,
            "A time traveler would buy Stock {} at time {} for ${} and sell it at time {} for ${}",
            report.instrument, best.buy.timestamp, best.buy.price, best.sell.timestamp, best.sell.price
        ),
        None => writeln!(
            out,
            "A time traveler could not make a profit on Stock {}",
            report.instrument
        ),
    }
}

/// Final medians, the summary, then the enabled sections.
pub fn write_end_of_day<W: Write>(
    out: &mut W,
    eod: &EndOfDay,
    sections: Sections,
) -> io::Result<()> {
    for median in &eod.final_medians {
        write_median(out, median)?;
    }

    writeln!(out, "---End of Day---")?;
    writeln!(out, "Trades Completed: {}", eod.trades_completed)?;

    if sections.trader_info {
        writeln!(out, "---Trader Info---")?;
        for (trader, account) in eod.traders.iter().enumerate() {
            write_trader(out, trader, account)?;
        }
    }

    if sections.time_travelers {
        writeln!(out, "---Time Travelers---")?;
        for report in &eod.time_travelers {
            write_traveler(out, report)?;
        }
    }
    Ok(())
}

pub fn write_json<W: Write>(out: &mut W, eod: &EndOfDay) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut *out, eod)?;
    writeln!(out).map_err(serde_json::Error::io)
}
