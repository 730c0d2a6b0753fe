//! order contract seam
//!
//! the subset of the trading contract the client talks to:
//!
//! ```text
//! placeOrder(string symbol, uint256 orderType, bytes32[5] encryptedData, bytes inputProof)
//! getOrderEncryptedData(uint256 orderId) -> bytes32[5]
//! getOrderCount() -> uint256
//! ```
//!
//! [`MemoryOrderBook`] keeps submitted handles in memory and stands in for the
//! deployed contract in tests and the demo binary.

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use vault_codec::{
    handle::HEX_PREFIX, order::ORDER_FIELD_COUNT, Address, CiphertextHandle,
};

/// on-chain order contract
#[async_trait]
pub trait OrderContract: Send + Sync {
    /// deployed address, also the acl target for user decryption
    fn address(&self) -> Address;

    /// the five stored ciphertext handles of an order
    async fn get_order_encrypted_data(
        &self,
        order_id: u64,
    ) -> anyhow::Result<[CiphertextHandle; ORDER_FIELD_COUNT]>;

    /// submit an encrypted order, returns the transaction hash
    async fn place_order(
        &self,
        symbol: &str,
        order_type: u8,
        encrypted_data: &[String; ORDER_FIELD_COUNT],
        input_proof: &str,
    ) -> anyhow::Result<String>;

    /// orders placed so far (also the id of the latest one)
    async fn get_order_count(&self) -> anyhow::Result<u64>;
}

/// order as stored by [`MemoryOrderBook`]
#[derive(Clone, Debug)]
pub struct StoredOrder {
    pub symbol: String,
    pub order_type: u8,
    pub handles: [CiphertextHandle; ORDER_FIELD_COUNT],
    pub input_proof: Vec<u8>,
}

/// in-memory order book with contract semantics
pub struct MemoryOrderBook {
    address: Address,
    orders: RwLock<Vec<StoredOrder>>,
}

impl MemoryOrderBook {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            orders: RwLock::new(Vec::new()),
        }
    }

    /// stored order by id (ids start at 1)
    pub async fn order(&self, order_id: u64) -> Option<StoredOrder> {
        let index = usize::try_from(order_id.checked_sub(1)?).ok()?;
        self.orders.read().await.get(index).cloned()
    }
}

#[async_trait]
impl OrderContract for MemoryOrderBook {
    fn address(&self) -> Address {
        self.address
    }

    async fn get_order_encrypted_data(
        &self,
        order_id: u64,
    ) -> anyhow::Result<[CiphertextHandle; ORDER_FIELD_COUNT]> {
        self.order(order_id)
            .await
            .map(|order| order.handles)
            .ok_or_else(|| anyhow!("order {} does not exist", order_id))
    }

    async fn place_order(
        &self,
        symbol: &str,
        order_type: u8,
        encrypted_data: &[String; ORDER_FIELD_COUNT],
        input_proof: &str,
    ) -> anyhow::Result<String> {
        // bytes32 abi encoding rejects anything that is not 32 bytes of hex
        let mut handles = [CiphertextHandle::default(); ORDER_FIELD_COUNT];
        for (slot, hex_handle) in handles.iter_mut().zip(encrypted_data) {
            *slot = CiphertextHandle::from_hex(hex_handle)?;
        }

        let proof_hex = input_proof
            .strip_prefix(HEX_PREFIX)
            .ok_or_else(|| anyhow!("input proof is not 0x-prefixed"))?;
        let input_proof = hex::decode(proof_hex).context("input proof is not hex")?;

        let mut orders = self.orders.write().await;
        let order_id = orders.len() as u64 + 1;

        let mut hasher = Sha256::new();
        hasher.update(self.address.as_bytes());
        hasher.update(order_id.to_be_bytes());
        for handle in &handles {
            hasher.update(handle.as_bytes());
        }
        let tx_hash = format!("{HEX_PREFIX}{}", hex::encode(hasher.finalize()));

        orders.push(StoredOrder {
            symbol: symbol.to_string(),
            order_type,
            handles,
            input_proof,
        });

        tracing::debug!(order_id, %tx_hash, "order stored");
        Ok(tx_hash)
    }

    async fn get_order_count(&self) -> anyhow::Result<u64> {
        Ok(self.orders.read().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handles(fill: u8) -> [String; ORDER_FIELD_COUNT] {
        std::array::from_fn(|i| CiphertextHandle([fill + i as u8; 32]).to_hex())
    }

    #[tokio::test]
    async fn test_place_and_read_back() {
        let book = MemoryOrderBook::new(Address([7u8; 20]));
        assert_eq!(book.get_order_count().await.unwrap(), 0);

        let tx = book.place_order("AAPL", 1, &handles(1), "0xdead").await.unwrap();
        assert!(tx.starts_with("0x"));
        assert_eq!(tx.len(), 66);
        assert_eq!(book.get_order_count().await.unwrap(), 1);

        let stored = book.get_order_encrypted_data(1).await.unwrap();
        assert_eq!(stored[0], CiphertextHandle([1u8; 32]));
        assert_eq!(stored[4], CiphertextHandle([5u8; 32]));

        let order = book.order(1).await.unwrap();
        assert_eq!(order.symbol, "AAPL");
        assert_eq!(order.input_proof, vec![0xde, 0xad]);
    }

    #[tokio::test]
    async fn test_unknown_order() {
        let book = MemoryOrderBook::new(Address::ZERO);
        assert!(book.get_order_encrypted_data(0).await.is_err());
        assert!(book.get_order_encrypted_data(1).await.is_err());
    }

    #[tokio::test]
    async fn test_rejects_malformed_handles() {
        let book = MemoryOrderBook::new(Address::ZERO);

        let mut bad = handles(1);
        bad[2] = "0x1234".into();
        assert!(book.place_order("AAPL", 1, &bad, "0x").await.is_err());
        assert!(book.place_order("AAPL", 1, &handles(1), "dead").await.is_err());
        assert_eq!(book.get_order_count().await.unwrap(), 0);
    }
}
