use serde::Serialize;

/// Represents which side of the market the order is on.
///
/// # Intuition
/// - `Buy` (Bid): the trader wants to purchase shares. Resting buys are ranked from **highest to
///   lowest price**, since a higher bid is more aggressive.
/// - `Sell` (Ask): the trader wants to sell shares. Resting sells are ranked from **lowest to
///   highest price**, since a lower ask is more aggressive.
///
/// Ties at the same price fall back to the earlier timestamp, then to the earlier sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    Buy,  // Bid
    Sell, // Ask
}

impl Side {
    /// Whether an incoming order on this side, limited at `incoming`, crosses a resting
    /// order on the opposite side priced at `resting`.
    pub fn crosses(self, incoming: u64, resting: u64) -> bool {
        match self {
            Side::Buy => incoming >= resting,
            Side::Sell => incoming <= resting,
        }
    }
}

/// Largest accepted limit price. With [`MAX_QUANTITY`] this keeps every `price × quantity`
/// below 2^64.
pub const MAX_PRICE: u64 = u32::MAX as u64;

/// Largest accepted order quantity.
pub const MAX_QUANTITY: u64 = u32::MAX as u64;

/// An order as read from the stream, before the engine has accepted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderRequest {
    pub timestamp: u64,
    pub trader: usize,
    pub instrument: usize,
    pub side: Side,
    pub price: u64,
    pub quantity: u64,
}

/// An order accepted by the engine.
///
/// - `quantity` is the **remaining** quantity and shrinks as fills occur
/// - `sequence` is assigned once at ingestion and is only used to break priority ties
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub sequence: u64,
    pub timestamp: u64,
    pub trader: usize,
    pub instrument: usize,
    pub side: Side,
    pub price: u64,
    pub quantity: u64,
}

impl Order {
    pub fn from_request(request: OrderRequest, sequence: u64) -> Self {
        Self {
            sequence,
            timestamp: request.timestamp,
            trader: request.trader,
            instrument: request.instrument,
            side: request.side,
            price: request.price,
            quantity: request.quantity,
        }
    }
}
