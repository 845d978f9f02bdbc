use thiserror::Error;

/// An order the market refuses to accept. Every variant is fatal for the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    #[error("timestamps must be non-decreasing: got {got} after {last}")]
    TimestampRegression { last: u64, got: u64 },

    #[error("trader id {trader} out of range (expected < {num_traders})")]
    TraderOutOfRange { trader: usize, num_traders: usize },

    #[error("stock id {instrument} out of range (expected < {num_instruments})")]
    InstrumentOutOfRange {
        instrument: usize,
        num_instruments: usize,
    },

    #[error("non-positive price encountered")]
    NonPositivePrice,

    #[error("non-positive quantity encountered")]
    NonPositiveQuantity,

    #[error("price {price} out of range (at most {max})")]
    PriceOutOfRange { price: u64, max: u64 },

    #[error("quantity {quantity} out of range (at most {max})")]
    QuantityOutOfRange { quantity: u64, max: u64 },
}

/// Errors from reading the order stream
#[derive(Error, Debug)]
pub enum InputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing header line `{0}`")]
    MissingHeader(&'static str),

    #[error("header `{field}` has invalid value `{value}`")]
    BadHeader { field: &'static str, value: String },

    #[error("{field} cannot be negative")]
    NegativeCount { field: &'static str },

    #[error("{field} value {value} out of range for unsigned int")]
    ParameterOutOfRange { field: &'static str, value: u64 },

    #[error("invalid mode `{0}`")]
    UnknownMode(String),

    #[error("line {line}: negative timestamp encountered")]
    NegativeTimestamp { line: usize },

    #[error("line {line}: {field} {value} out of range")]
    NegativeId {
        line: usize,
        field: &'static str,
        value: i64,
    },

    #[error("line {line}: non-positive {field} encountered")]
    NonPositive { line: usize, field: &'static str },

    #[error("line {line}: {field} {value} out of range for unsigned int")]
    ValueOutOfRange {
        line: usize,
        field: &'static str,
        value: i64,
    },

    #[error("line {line}: unknown intent `{intent}`")]
    UnknownIntent { line: usize, intent: String },

    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

/// Invalid settings for the synthetic order generator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneratorError {
    #[error("cannot generate orders without at least one trader and one stock")]
    EmptyMarket,

    #[error("arrival rate must be positive, got {0}")]
    ArrivalRate(u32),

    #[error("distribution setup failed: {0}")]
    Distribution(String),
}
