//! encryption pipeline
//!
//! validate -> add fields to one encrypted input -> encrypt once -> format.
//! validation runs first, so an out-of-range order never reaches the sdk.
//! sdk failures are logged and returned untouched, nothing is retried here.

use crate::error::{Error, Result};
use crate::instance::{EncryptedInput, EncryptedInputBuilder, FheInstance, HandleContractPair};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use vault_codec::order::{checked_u32, to_cents, ORDER_FIELD_COUNT, PORTFOLIO_FIELD_COUNT};
use vault_codec::{
    format_handle, format_proof, Address, CiphertextHandle, PortfolioData, TradingOrder,
};

/// encrypted order, ready for `placeOrder`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedOrderHandles {
    /// orderId, orderType, quantity, price, stockSymbol
    pub handles: [String; ORDER_FIELD_COUNT],
    pub proof: String,
}

/// encrypted portfolio snapshot
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPortfolio {
    /// totalValue, totalPnl, tradeCount, userId
    pub handles: [String; PORTFOLIO_FIELD_COUNT],
    pub proof: String,
}

/// quantity and price encrypted separately
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingProof {
    pub encrypted_quantity: String,
    pub encrypted_price: String,
    /// proof of the quantity input
    pub input_proof: String,
}

/// portfolio figures encrypted separately
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioProof {
    pub encrypted_value: String,
    pub encrypted_pnl: String,
    pub encrypted_count: String,
    /// proof of the value input
    pub input_proof: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardProof {
    pub encrypted_score: String,
    pub input_proof: String,
}

/// largest difference at which a decrypted value still matches
pub const VALIDATION_TOLERANCE: f64 = 0.001;

/// encrypt a trading order for submission to `contract_address`
pub async fn encrypt_trading_order<I: FheInstance>(
    instance: &I,
    contract_address: Address,
    user_address: Address,
    order: &TradingOrder,
) -> Result<EncryptedOrderHandles> {
    let plaintext = order.to_plaintext()?;

    info!(order_id = order.order_id, symbol = %order.stock_symbol, "creating encrypted trading order");

    let mut input = instance.build_encrypted_input(contract_address, user_address);
    input.add32(plaintext.order_id);
    input.add8(plaintext.order_type);
    input.add32(plaintext.quantity);
    input.add32(plaintext.price_cents);
    input.add32(plaintext.symbol);

    let encrypted = input.encrypt().await.map_err(|e| {
        error!(?order, contract = %contract_address, user = %user_address, "failed to encrypt trading order: {e:#}");
        Error::Encryption(e)
    })?;

    let (handles, proof) = format_output::<ORDER_FIELD_COUNT>(encrypted)?;
    info!(order_id = order.order_id, "order encrypted");

    Ok(EncryptedOrderHandles { handles, proof })
}

/// encrypt a portfolio snapshot, same pipeline with four 32-bit fields
pub async fn encrypt_portfolio_data<I: FheInstance>(
    instance: &I,
    contract_address: Address,
    user_address: Address,
    portfolio: &PortfolioData,
) -> Result<EncryptedPortfolio> {
    let plaintext = portfolio.to_plaintext()?;

    info!(user_id = portfolio.user_id, "creating encrypted portfolio data");

    let mut input = instance.build_encrypted_input(contract_address, user_address);
    for value in plaintext {
        input.add32(value);
    }

    let encrypted = input.encrypt().await.map_err(|e| {
        error!(?portfolio, contract = %contract_address, "failed to encrypt portfolio data: {e:#}");
        Error::Encryption(e)
    })?;

    let (handles, proof) = format_output::<PORTFOLIO_FIELD_COUNT>(encrypted)?;
    Ok(EncryptedPortfolio { handles, proof })
}

/// encrypt quantity and price as two independent inputs, concurrently
pub async fn generate_trading_proof<I: FheInstance>(
    instance: &I,
    contract_address: Address,
    user_address: Address,
    quantity: u64,
    price: f64,
) -> Result<TradingProof> {
    let quantity_value = checked_u32("quantity", quantity)?;
    let price_cents = to_cents("price", price)?;

    let (quantity_enc, price_enc) = futures::try_join!(
        encrypt_single(instance, contract_address, user_address, quantity_value),
        encrypt_single(instance, contract_address, user_address, price_cents),
    )
    .map_err(|e| {
        error!(quantity, price, contract = %contract_address, "failed to generate trading proof: {e}");
        e
    })?;

    let (encrypted_quantity, input_proof) = quantity_enc;
    let (encrypted_price, _) = price_enc;

    Ok(TradingProof {
        encrypted_quantity,
        encrypted_price,
        input_proof,
    })
}

/// encrypt value, pnl and trade count as three independent inputs, concurrently.
/// the user id is not part of the proof.
pub async fn generate_portfolio_proof<I: FheInstance>(
    instance: &I,
    contract_address: Address,
    user_address: Address,
    portfolio: &PortfolioData,
) -> Result<PortfolioProof> {
    let value_cents = to_cents("totalValue", portfolio.total_value)?;
    let pnl_cents = to_cents("totalPnl", portfolio.total_pnl)?;
    let trade_count = checked_u32("tradeCount", portfolio.trade_count)?;

    let (value_enc, pnl_enc, count_enc) = futures::try_join!(
        encrypt_single(instance, contract_address, user_address, value_cents),
        encrypt_single(instance, contract_address, user_address, pnl_cents),
        encrypt_single(instance, contract_address, user_address, trade_count),
    )
    .map_err(|e| {
        error!(?portfolio, contract = %contract_address, "failed to generate portfolio proof: {e}");
        e
    })?;

    let (encrypted_value, input_proof) = value_enc;
    let (encrypted_pnl, _) = pnl_enc;
    let (encrypted_count, _) = count_enc;

    Ok(PortfolioProof {
        encrypted_value,
        encrypted_pnl,
        encrypted_count,
        input_proof,
    })
}

/// encrypt a leaderboard score as a single 32-bit input
pub async fn generate_leaderboard_proof<I: FheInstance>(
    instance: &I,
    contract_address: Address,
    user_address: Address,
    score: u64,
) -> Result<LeaderboardProof> {
    let score_value = checked_u32("score", score)?;

    let (encrypted_score, input_proof) = encrypt_single(instance, contract_address, user_address, score_value)
        .await
        .map_err(|e| {
            error!(score, contract = %contract_address, "failed to generate leaderboard proof: {e}");
            e
        })?;

    Ok(LeaderboardProof {
        encrypted_score,
        input_proof,
    })
}

/// decrypt `handle` and compare it to `expected` within [`VALIDATION_TOLERANCE`].
/// any failure along the way (bad handle, decrypt error, missing value) is
/// logged and reported as `false`.
pub async fn validate_encryption<I: FheInstance>(
    instance: &I,
    contract_address: Address,
    handle: &str,
    expected: f64,
) -> bool {
    let handle = match CiphertextHandle::from_hex(handle) {
        Ok(handle) => handle,
        Err(e) => {
            warn!("cannot validate encryption: {e}");
            return false;
        }
    };

    let pair = HandleContractPair {
        handle,
        contract_address,
    };

    match instance.batch_user_decrypt(&[pair]).await {
        Ok(values) => match values.get(&handle) {
            Some(&value) => (value as f64 - expected).abs() < VALIDATION_TOLERANCE,
            None => {
                warn!(%handle, "handle missing from decryption result");
                false
            }
        },
        Err(e) => {
            error!(%handle, contract = %contract_address, "error validating encryption: {e:#}");
            false
        }
    }
}

async fn encrypt_single<I: FheInstance>(
    instance: &I,
    contract_address: Address,
    user_address: Address,
    value: u32,
) -> Result<(String, String)> {
    let mut input = instance.build_encrypted_input(contract_address, user_address);
    input.add32(value);

    let encrypted = input.encrypt().await.map_err(Error::Encryption)?;
    let ([handle], proof) = format_output::<1>(encrypted)?;
    Ok((handle, proof))
}

/// format every raw handle and the proof, checking the handle count
fn format_output<const N: usize>(encrypted: EncryptedInput) -> Result<([String; N], String)> {
    let got = encrypted.handles.len();
    let formatted: Vec<String> = encrypted.handles.iter().map(format_handle).collect();

    let handles: [String; N] = formatted
        .try_into()
        .map_err(|_| Error::HandleCount { expected: N, got })?;

    debug!(handles = N, proof_bytes = encrypted.input_proof.len(), "formatted encrypted input");
    Ok((handles, format_proof(&encrypted.input_proof)))
}
