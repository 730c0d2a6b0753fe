//! encryption sdk seam
//!
//! the relayer sdk is injected through these traits. the pipelines only ever
//! see [`FheInstance`], so the real sdk binding, [`crate::mock::MockFheInstance`]
//! and test doubles are interchangeable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vault_codec::{Address, CiphertextHandle, RawHandle};

/// output of one `encrypt()` call: one handle per added value plus a proof
/// covering all of them
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedInput {
    pub handles: Vec<RawHandle>,
    pub input_proof: Vec<u8>,
}

/// handle to decrypt and the contract that holds the acl for it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleContractPair {
    pub handle: CiphertextHandle,
    pub contract_address: Address,
}

/// cleartext per handle, as returned by user decryption
pub type DecryptedValues = HashMap<CiphertextHandle, u128>;

/// collects plaintexts for a single encrypted input
#[async_trait]
pub trait EncryptedInputBuilder: Send {
    /// append an 8-bit value
    fn add8(&mut self, value: u8);

    /// append a 32-bit value
    fn add32(&mut self, value: u32);

    /// encrypt everything added so far
    async fn encrypt(&mut self) -> anyhow::Result<EncryptedInput>;
}

/// fhe instance - the only sdk surface the client depends on
#[async_trait]
pub trait FheInstance: Send + Sync {
    type Builder: EncryptedInputBuilder;

    /// fresh input builder bound to `contract_address` and `user_address`
    fn build_encrypted_input(&self, contract_address: Address, user_address: Address) -> Self::Builder;

    /// decrypt several handles in one round trip
    async fn batch_user_decrypt(&self, pairs: &[HandleContractPair]) -> anyhow::Result<DecryptedValues>;
}
