//! vault-codec: plaintext side of fhe-encrypted trading orders
//!
//! everything here is synchronous and sdk-agnostic:
//! - symbol folding (ticker <-> bounded u32)
//! - ciphertext handle formatting (anything byte-like -> `bytes32` hex)
//! - order / portfolio model with 32-bit ceiling validation
//! - evm addresses
//!
//! ## field layout
//!
//! ```text
//! handle[0]  orderId      euint32
//! handle[1]  orderType    euint8   (1 = buy, 2 = sell)
//! handle[2]  quantity     euint32
//! handle[3]  price        euint32  (cents)
//! handle[4]  stockSymbol  euint32  (folded, clamped at 2_000_000_000)
//! ```

pub mod address;
pub mod error;
pub mod handle;
pub mod order;
pub mod symbol;

pub use address::Address;
pub use error::{Error, Result};
pub use handle::{format_handle, format_proof, CiphertextHandle, RawHandle, HANDLE_HEX_LEN};
pub use order::{DecryptedOrder, OrderPlaintext, OrderType, PortfolioData, TradingOrder};
pub use symbol::{decode_symbol, encode_symbol, SYMBOL_CLAMP};
