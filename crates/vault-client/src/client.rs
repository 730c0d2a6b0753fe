//! order client - the fhe instance, contract and caller bundled together
//!
//! everything is injected at construction; there is no process-wide instance.

use crate::contract::OrderContract;
use crate::decrypt::decrypt_trading_data;
use crate::encrypt::{
    encrypt_portfolio_data, encrypt_trading_order, generate_leaderboard_proof,
    generate_portfolio_proof, generate_trading_proof, validate_encryption, EncryptedOrderHandles,
    EncryptedPortfolio, LeaderboardProof, PortfolioProof, TradingProof,
};
use crate::error::{Error, Result};
use crate::instance::FheInstance;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use vault_codec::order::ORDER_FIELD_COUNT;
use vault_codec::{Address, DecryptedOrder, OrderType, PortfolioData, TradingOrder};

/// result of a successful `placeOrder`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    pub tx_hash: String,
    pub handles: [String; ORDER_FIELD_COUNT],
}

pub struct OrderClient<I, C> {
    instance: I,
    contract: C,
    user_address: Address,
}

impl<I: FheInstance, C: OrderContract> OrderClient<I, C> {
    pub fn new(instance: I, contract: C, user_address: Address) -> Self {
        Self {
            instance,
            contract,
            user_address,
        }
    }

    pub fn instance(&self) -> &I {
        &self.instance
    }

    pub fn contract(&self) -> &C {
        &self.contract
    }

    pub fn user_address(&self) -> Address {
        self.user_address
    }

    /// encrypt `order` for this contract and caller
    pub async fn encrypt_order(&self, order: &TradingOrder) -> Result<EncryptedOrderHandles> {
        encrypt_trading_order(&self.instance, self.contract.address(), self.user_address, order).await
    }

    /// encrypt then submit. nothing is sent if encryption fails.
    pub async fn place_order(&self, order: &TradingOrder) -> Result<PlacedOrder> {
        let encrypted = self.encrypt_order(order).await?;

        let tx_hash = self
            .contract
            .place_order(
                &order.stock_symbol,
                order.order_type.as_u8(),
                &encrypted.handles,
                &encrypted.proof,
            )
            .await
            .map_err(|e| {
                error!(order_id = order.order_id, symbol = %order.stock_symbol, "placeOrder rejected: {e:#}");
                Error::Contract(e)
            })?;

        info!(order_id = order.order_id, %tx_hash, "encrypted order placed");
        Ok(PlacedOrder {
            tx_hash,
            handles: encrypted.handles,
        })
    }

    /// fetch and decrypt an order owned by the caller
    pub async fn reveal_order(&self, order_id: u64) -> Result<DecryptedOrder> {
        decrypt_trading_data(&self.instance, &self.contract, order_id).await
    }

    pub async fn encrypt_portfolio(&self, portfolio: &PortfolioData) -> Result<EncryptedPortfolio> {
        encrypt_portfolio_data(&self.instance, self.contract.address(), self.user_address, portfolio).await
    }

    pub async fn trading_proof(&self, quantity: u64, price: f64) -> Result<TradingProof> {
        generate_trading_proof(&self.instance, self.contract.address(), self.user_address, quantity, price).await
    }

    pub async fn portfolio_proof(&self, portfolio: &PortfolioData) -> Result<PortfolioProof> {
        generate_portfolio_proof(&self.instance, self.contract.address(), self.user_address, portfolio).await
    }

    pub async fn leaderboard_proof(&self, score: u64) -> Result<LeaderboardProof> {
        generate_leaderboard_proof(&self.instance, self.contract.address(), self.user_address, score).await
    }

    /// whether `handle` decrypts to `expected` under this contract
    pub async fn validate_encryption(&self, handle: &str, expected: f64) -> bool {
        validate_encryption(&self.instance, self.contract.address(), handle, expected).await
    }

    pub async fn order_count(&self) -> Result<u64> {
        self.contract.get_order_count().await.map_err(Error::Contract)
    }

    /// encrypt a fixed sample order against the zero address. reports
    /// success as a bool, failures are only logged.
    pub async fn self_test(&self) -> bool {
        info!("testing fhe functionality");
        match encrypt_trading_order(&self.instance, Address::ZERO, Address::ZERO, &sample_order()).await {
            Ok(encrypted) => {
                info!(handles = encrypted.handles.len(), "fhe self-test passed");
                true
            }
            Err(e) => {
                error!("fhe self-test failed: {e}");
                false
            }
        }
    }
}

/// the order used by [`OrderClient::self_test`]
pub fn sample_order() -> TradingOrder {
    TradingOrder {
        stock_symbol: "AAPL".into(),
        quantity: 100,
        price: 50.25,
        order_type: OrderType::Buy,
        order_id: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::MemoryOrderBook;
    use crate::mock::MockFheInstance;
    use vault_codec::CiphertextHandle;

    fn client() -> OrderClient<MockFheInstance, MemoryOrderBook> {
        OrderClient::new(
            MockFheInstance::new(),
            MemoryOrderBook::new(Address([0xaa; 20])),
            Address([0xbb; 20]),
        )
    }

    #[tokio::test]
    async fn test_place_then_reveal() {
        let client = client();
        let placed = client.place_order(&sample_order()).await.unwrap();
        assert!(placed.tx_hash.starts_with("0x"));
        assert_eq!(client.order_count().await.unwrap(), 1);

        let revealed = client.reveal_order(1).await.unwrap();
        assert_eq!(revealed.quantity, "100");
        assert_eq!(revealed.price, 50.25);
        assert_eq!(revealed.stock_symbol, "AAPL");
    }

    #[tokio::test]
    async fn test_invalid_order_is_not_submitted() {
        let client = client();
        let order = TradingOrder {
            quantity: u64::MAX,
            ..sample_order()
        };

        assert!(client.place_order(&order).await.unwrap_err().is_validation());
        assert_eq!(client.order_count().await.unwrap(), 0);
        assert_eq!(client.instance().encrypt_calls(), 0);
    }

    #[tokio::test]
    async fn test_self_test() {
        assert!(client().self_test().await);

        let broken = OrderClient::new(
            MockFheInstance::failing("sdk not initialized"),
            MemoryOrderBook::new(Address::ZERO),
            Address::ZERO,
        );
        assert!(!broken.self_test().await);
    }

    #[tokio::test]
    async fn test_proofs_validate_against_contract() {
        let client = client();
        let portfolio = PortfolioData {
            total_value: 1_500.25,
            total_pnl: 12.0,
            trade_count: 4,
            user_id: 9,
        };

        let proof = client.portfolio_proof(&portfolio).await.unwrap();
        assert!(client.validate_encryption(&proof.encrypted_value, 150_025.0).await);
        assert!(client.validate_encryption(&proof.encrypted_pnl, 1_200.0).await);
        assert!(client.validate_encryption(&proof.encrypted_count, 4.0).await);

        let score = client.leaderboard_proof(77).await.unwrap();
        assert!(client.validate_encryption(&score.encrypted_score, 77.0).await);
        assert!(!client.validate_encryption(&score.encrypted_score, 78.0).await);

        let trade = client.trading_proof(5, 2.5).await.unwrap();
        assert!(client.validate_encryption(&trade.encrypted_price, 250.0).await);
        assert_eq!(client.instance().encrypt_calls(), 6);
    }

    #[tokio::test]
    async fn test_proofs_fail_with_broken_sdk() {
        let client = OrderClient::new(
            MockFheInstance::failing("sdk not initialized"),
            MemoryOrderBook::new(Address::ZERO),
            Address::ZERO,
        );

        assert!(client.leaderboard_proof(1).await.is_err());
        assert!(client.portfolio_proof(&PortfolioData::default()).await.is_err());
        assert!(!client.validate_encryption(&CiphertextHandle::default().to_hex(), 0.0).await);
    }
}
