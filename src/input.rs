//! Reader for the order-stream text format.
//!
//! ```text
//! COMMENT: anything
//! MODE: TL
//! NUM_TRADERS: 3
//! NUM_STOCKS: 2
//! 0 SELL T1 S0 $10 #5
//! 0 BUY T0 S0 $10 #5
//! ```
//!
//! In `PR` mode the header continues with `RANDOM_SEED`, `NUMBER_OF_ORDERS` and
//! `ARRIVAL_RATE` and carries no order lines; orders come from the generator instead.
//! Each of the last four order fields starts with one delimiter character that is discarded.

use std::io::BufRead;

use crate::{
    errors::InputError,
    orders::{OrderRequest, Side},
    simulate::GeneratorConfig,
};

/// Where the orders of a stream come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMode {
    /// `TL`: order lines follow the header.
    TradeList,
    /// `PR`: orders are generated from the header's parameters.
    PseudoRandom(GeneratorConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHeader {
    pub comment: String,
    pub mode: StreamMode,
    pub num_traders: usize,
    pub num_instruments: usize,
}

/// Reads the header lines, leaving `reader` positioned at the first order line.
pub fn read_header<R: BufRead>(reader: &mut R) -> Result<StreamHeader, InputError> {
    let comment = header_value(reader, "COMMENT")?;
    let mode = header_value(reader, "MODE")?;
    let num_traders = read_count(reader, "NUM_TRADERS")?;
    let num_instruments = read_count(reader, "NUM_STOCKS")?;

    let mode = match mode.as_str() {
        "TL" => StreamMode::TradeList,
        "PR" => {
            let seed = read_param(reader, "RANDOM_SEED")?;
            let num_orders = read_param(reader, "NUMBER_OF_ORDERS")?;
            let arrival_rate = read_param(reader, "ARRIVAL_RATE")?;
            StreamMode::PseudoRandom(GeneratorConfig {
                seed,
                num_orders,
                arrival_rate,
                num_traders,
                num_instruments,
            })
        }
        _ => return Err(InputError::UnknownMode(mode)),
    };

    Ok(StreamHeader {
        comment,
        mode,
        num_traders,
        num_instruments,
    })
}

/// Text after the first `:` of the next line, trimmed.
fn header_value<R: BufRead>(reader: &mut R, field: &'static str) -> Result<String, InputError> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(InputError::MissingHeader(field));
    }
    let value = match line.split_once(':') {
        Some((_, value)) => value,
        None => line.as_str(),
    };
    Ok(value.trim().to_string())
}

fn read_count<R: BufRead>(reader: &mut R, field: &'static str) -> Result<usize, InputError> {
    let value = header_value(reader, field)?;
    let count: i64 = value
        .parse()
        .map_err(|_| InputError::BadHeader { field, value })?;
    usize::try_from(count).map_err(|_| InputError::NegativeCount { field })
}

fn read_param<R: BufRead>(reader: &mut R, field: &'static str) -> Result<u32, InputError> {
    let value = header_value(reader, field)?;
    let wide: u64 = value
        .parse()
        .map_err(|_| InputError::BadHeader { field, value })?;
    u32::try_from(wide).map_err(|_| InputError::ParameterOutOfRange { field, value: wide })
}

/// Iterator over the order lines that follow the header.
///
/// Line numbers in errors count from the first order line. Blank lines are skipped.
pub struct OrderLines<R> {
    reader: R,
    line_no: usize,
    buf: String,
}

impl<R: BufRead> OrderLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> Iterator for OrderLines<R> {
    type Item = Result<OrderRequest, InputError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(err) => return Some(Err(err.into())),
            }
            self.line_no += 1;
            if self.buf.trim().is_empty() {
                continue;
            }
            return Some(parse_order_line(&self.buf, self.line_no));
        }
    }
}

/// Parses `<timestamp> <BUY|SELL> T<trader> S<stock> $<price> #<quantity>`.
pub fn parse_order_line(line: &str, line_no: usize) -> Result<OrderRequest, InputError> {
    let mut fields = line.split_whitespace();
    let mut next = |name: &str| {
        fields.next().ok_or_else(|| InputError::Malformed {
            line: line_no,
            reason: format!("missing {name}"),
        })
    };

    let timestamp = number(next("timestamp")?, line_no, "timestamp")?;
    let intent = next("intent")?;
    let trader = delimited(next("trader id")?, line_no, "trader id")?;
    let instrument = delimited(next("stock id")?, line_no, "stock id")?;
    let price = delimited(next("price")?, line_no, "price")?;
    let quantity = delimited(next("quantity")?, line_no, "quantity")?;

    let side = match intent {
        "BUY" => Side::Buy,
        "SELL" => Side::Sell,
        other => {
            return Err(InputError::UnknownIntent {
                line: line_no,
                intent: other.to_string(),
            });
        }
    };

    let timestamp =
        u64::try_from(timestamp).map_err(|_| InputError::NegativeTimestamp { line: line_no })?;
    let trader = id(trader, line_no, "trader id")?;
    let instrument = id(instrument, line_no, "stock id")?;
    let price = positive(price, line_no, "price")?;
    let quantity = positive(quantity, line_no, "quantity")?;

    Ok(OrderRequest {
        timestamp,
        trader,
        instrument,
        side,
        price,
        quantity,
    })
}

fn number(token: &str, line: usize, field: &str) -> Result<i64, InputError> {
    token.parse().map_err(|_| InputError::Malformed {
        line,
        reason: format!("invalid {field} `{token}`"),
    })
}

/// Drops the single leading delimiter character, then parses the rest.
fn delimited(token: &str, line: usize, field: &str) -> Result<i64, InputError> {
    let mut chars = token.chars();
    chars.next();
    number(chars.as_str(), line, field)
}

fn id(value: i64, line: usize, field: &'static str) -> Result<usize, InputError> {
    usize::try_from(value).map_err(|_| InputError::NegativeId { line, field, value })
}

/// Positive and within `u32`.
fn positive(value: i64, line: usize, field: &'static str) -> Result<u64, InputError> {
    if value <= 0 {
        return Err(InputError::NonPositive { line, field });
    }
    u32::try_from(value)
        .map(u64::from)
        .map_err(|_| InputError::ValueOutOfRange { line, field, value })
}
