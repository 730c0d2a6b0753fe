//! vault-client: fhe-encrypted trading orders against an evm contract
//!
//! provides:
//! - encryption pipeline (order / portfolio -> `bytes32` handles + proof)
//! - single-value proofs (trading, portfolio, leaderboard) and encryption checks
//! - user decryption pipeline (stored handles -> [`DecryptedOrder`])
//! - the sdk and contract seams ([`FheInstance`], [`OrderContract`])
//! - a masking mock sdk and an in-memory contract for tests and demos
//!
//! ## flow
//!
//! ```text
//! TradingOrder ──validate──► builder.add32/add8 ×5 ──encrypt()──► raw handles + proof
//!                                                                   │ format
//!                                                                   ▼
//!                               placeOrder(symbol, type, bytes32[5], proof)
//!
//! getOrderEncryptedData(id) ──► 5 × (handle, contract) ──batch_user_decrypt──► DecryptedOrder
//! ```
//!
//! ## usage
//!
//! ```rust,ignore
//! let client = OrderClient::new(sdk, contract, user);
//! let placed = client.place_order(&order).await?;
//! let revealed = client.reveal_order(order_id).await?;
//! ```

pub mod client;
pub mod config;
pub mod contract;
pub mod decrypt;
pub mod encrypt;
pub mod error;
pub mod instance;
pub mod mock;

pub use client::{sample_order, OrderClient, PlacedOrder};
pub use config::ClientConfig;
pub use contract::{MemoryOrderBook, OrderContract};
pub use decrypt::decrypt_trading_data;
pub use encrypt::{
    encrypt_portfolio_data, encrypt_trading_order, generate_leaderboard_proof,
    generate_portfolio_proof, generate_trading_proof, validate_encryption, EncryptedOrderHandles,
    EncryptedPortfolio, LeaderboardProof, PortfolioProof, TradingProof,
};
pub use error::{Error, Result};
pub use instance::{DecryptedValues, EncryptedInput, EncryptedInputBuilder, FheInstance, HandleContractPair};
pub use mock::MockFheInstance;

pub use vault_codec::{Address, DecryptedOrder, OrderType, PortfolioData, TradingOrder};
