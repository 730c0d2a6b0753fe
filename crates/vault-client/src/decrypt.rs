//! user decryption of a stored order
//!
//! fetch the five handles from the contract, decrypt them in one batch, map
//! the cleartexts back to order fields. any failure is returned as is, there
//! is no fallback plaintext and no partially rebuilt order.

use crate::contract::OrderContract;
use crate::error::{Error, Result};
use crate::instance::{FheInstance, HandleContractPair};
use tracing::{error, info, warn};
use vault_codec::order::{ORDER_FIELDS, ORDER_FIELD_COUNT};
use vault_codec::DecryptedOrder;

/// reveal order `order_id` to its owner
pub async fn decrypt_trading_data<I, C>(instance: &I, contract: &C, order_id: u64) -> Result<DecryptedOrder>
where
    I: FheInstance,
    C: OrderContract + ?Sized,
{
    info!(order_id, "decrypting trading data");

    let handles = contract.get_order_encrypted_data(order_id).await.map_err(|e| {
        error!(order_id, contract = %contract.address(), "failed to read encrypted order: {e:#}");
        Error::Contract(e)
    })?;

    let contract_address = contract.address();
    let pairs = handles.map(|handle| HandleContractPair {
        handle,
        contract_address,
    });

    let cleartexts = instance.batch_user_decrypt(&pairs).await.map_err(|e| {
        error!(order_id, ?handles, "failed to decrypt trading data: {e:#}");
        Error::Decryption(e)
    })?;

    let mut values = [0u128; ORDER_FIELD_COUNT];
    for (i, handle) in handles.iter().enumerate() {
        match cleartexts.get(handle) {
            Some(value) => values[i] = *value,
            None => warn!(order_id, field = ORDER_FIELDS[i], %handle, "no cleartext returned, reading as 0"),
        }
    }

    let order = DecryptedOrder::from_values(values);
    info!(order_id, symbol = %order.stock_symbol, "trading data decrypted");
    Ok(order)
}
