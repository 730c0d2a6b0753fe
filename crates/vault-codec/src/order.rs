//! trading order model and pre-encryption validation
//!
//! every value handed to the encrypted-input builder must fit in 32 bits.
//! validation runs before any encryption call, so a bad order never produces
//! a partial submission.

use crate::error::{Error, Result};
use crate::symbol::{decode_symbol, encode_symbol};
use serde::{Deserialize, Serialize};

/// currency values are stored as integer cents
pub const CENTS_PER_UNIT: f64 = 100.0;

/// number of encrypted fields in an order
pub const ORDER_FIELD_COUNT: usize = 5;

/// encrypted fields in submission order. the contract stores handles in the
/// same positions.
pub const ORDER_FIELDS: [&str; ORDER_FIELD_COUNT] =
    ["orderId", "orderType", "quantity", "price", "stockSymbol"];

/// number of encrypted fields in a portfolio snapshot
pub const PORTFOLIO_FIELD_COUNT: usize = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum OrderType {
    #[default]
    Buy = 1,
    Sell = 2,
}

impl OrderType {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Buy),
            2 => Some(Self::Sell),
            _ => None,
        }
    }

    pub fn is_buy(self) -> bool {
        matches!(self, Self::Buy)
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => f.write_str("buy"),
            Self::Sell => f.write_str("sell"),
        }
    }
}

impl std::str::FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buy" | "1" => Ok(Self::Buy),
            "sell" | "2" => Ok(Self::Sell),
            other => Err(format!("unknown order type: {other}")),
        }
    }
}

/// plaintext order, built per submission and dropped after encryption
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingOrder {
    pub stock_symbol: String,
    pub quantity: u64,
    /// currency units, scaled to cents before encryption
    pub price: f64,
    pub order_type: OrderType,
    pub order_id: u64,
}

/// the order as 32-bit plaintexts, in [`ORDER_FIELDS`] order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderPlaintext {
    pub order_id: u32,
    pub order_type: u8,
    pub quantity: u32,
    pub price_cents: u32,
    pub symbol: u32,
}

impl TradingOrder {
    /// check every numeric field against the 32-bit ceiling and scale the
    /// price. fails on the first offending field.
    pub fn to_plaintext(&self) -> Result<OrderPlaintext> {
        Ok(OrderPlaintext {
            order_id: checked_u32("orderId", self.order_id)?,
            order_type: self.order_type.as_u8(),
            quantity: checked_u32("quantity", self.quantity)?,
            price_cents: to_cents("price", self.price)?,
            symbol: encode_symbol(&self.stock_symbol),
        })
    }
}

/// order revealed to its owner after user decryption
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptedOrder {
    pub order_id: String,
    pub order_type: u8,
    pub quantity: String,
    pub price: f64,
    pub stock_symbol: String,
}

impl DecryptedOrder {
    /// rebuild from decrypted field values in [`ORDER_FIELDS`] order
    pub fn from_values(values: [u128; ORDER_FIELD_COUNT]) -> Self {
        let [order_id, order_type, quantity, price_cents, symbol] = values;
        Self {
            order_id: order_id.to_string(),
            // anything wider than the euint8 reads as 0, an unknown side
            order_type: u8::try_from(order_type).unwrap_or(0),
            quantity: quantity.to_string(),
            price: from_cents(price_cents),
            stock_symbol: decode_symbol(u64::try_from(symbol).unwrap_or(u64::MAX)),
        }
    }

    pub fn order_type(&self) -> Option<OrderType> {
        OrderType::from_u8(self.order_type)
    }
}

/// aggregate portfolio figures, encrypted as a 4-field input
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioData {
    pub total_value: f64,
    pub total_pnl: f64,
    pub trade_count: u64,
    pub user_id: u64,
}

impl PortfolioData {
    /// plaintexts in submission order: value cents, pnl cents, trades, user
    pub fn to_plaintext(&self) -> Result<[u32; PORTFOLIO_FIELD_COUNT]> {
        Ok([
            to_cents("totalValue", self.total_value)?,
            to_cents("totalPnl", self.total_pnl)?,
            checked_u32("tradeCount", self.trade_count)?,
            checked_u32("userId", self.user_id)?,
        ])
    }
}

/// fail with the field name instead of truncating
pub fn checked_u32(field: &'static str, value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::FieldOverflow {
        field,
        value: value.into(),
    })
}

/// scale a currency amount to integer cents, rounding down
///
/// the floor is taken on the binary product, so amounts without an exact
/// `f64` form can lose a cent: `1.15`, `0.29` and `4.35` become 114, 28 and
/// 434 cents.
pub fn to_cents(field: &'static str, amount: f64) -> Result<u32> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { field, value: amount });
    }

    let cents = (amount * CENTS_PER_UNIT).floor();
    if cents > f64::from(u32::MAX) {
        return Err(Error::FieldOverflow {
            field,
            value: cents as u128,
        });
    }

    Ok(cents as u32)
}

pub fn from_cents(cents: u128) -> f64 {
    cents as f64 / CENTS_PER_UNIT
}
