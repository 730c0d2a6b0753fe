//! masking stand-in for the relayer sdk
//!
//! no real fhe: a "ciphertext" is the plaintext written into a 32-byte handle
//! and xor-masked, so it can be unmasked again by [`MockFheInstance`] alone.
//!
//! ```text
//! byte  0..4   value (little endian)
//! byte  30     fhe type (2 = euint8, 4 = euint32)
//! every byte i ^= i + 0x42
//! ```

use crate::instance::{
    DecryptedValues, EncryptedInput, EncryptedInputBuilder, FheInstance, HandleContractPair,
};
use anyhow::{anyhow, bail};
use async_trait::async_trait;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use vault_codec::handle::HANDLE_BYTES;
use vault_codec::{Address, CiphertextHandle, RawHandle};

const MASK_OFFSET: u8 = 0x42;
const TYPE_BYTE: usize = 30;
const PROOF_SALT_LEN: usize = 16;

/// fhe type tags as encoded in a handle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FheType {
    Euint8 = 2,
    Euint32 = 4,
}

impl FheType {
    fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            2 => Some(Self::Euint8),
            4 => Some(Self::Euint32),
            _ => None,
        }
    }
}

fn apply_mask(bytes: &mut [u8; HANDLE_BYTES]) {
    for (i, b) in bytes.iter_mut().enumerate() {
        *b ^= (i as u8).wrapping_add(MASK_OFFSET);
    }
}

/// mask a plaintext into a handle
pub fn mask_value(fhe_type: FheType, value: u32) -> [u8; HANDLE_BYTES] {
    let mut bytes = [0u8; HANDLE_BYTES];
    bytes[..4].copy_from_slice(&value.to_le_bytes());
    bytes[TYPE_BYTE] = fhe_type as u8;
    apply_mask(&mut bytes);
    bytes
}

/// recover type and plaintext from a masked handle
pub fn unmask_value(handle: &CiphertextHandle) -> Option<(FheType, u32)> {
    let mut bytes = *handle.as_bytes();
    apply_mask(&mut bytes);

    let fhe_type = FheType::from_tag(bytes[TYPE_BYTE])?;
    let value = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    Some((fhe_type, value))
}

/// mock fhe instance with call counters and optional failure injection
#[derive(Default)]
pub struct MockFheInstance {
    encrypt_calls: Arc<AtomicUsize>,
    decrypt_calls: AtomicUsize,
    failure: Option<String>,
}

impl MockFheInstance {
    pub fn new() -> Self {
        Self::default()
    }

    /// every encrypt and decrypt call fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// number of `encrypt()` calls made through builders of this instance
    pub fn encrypt_calls(&self) -> usize {
        self.encrypt_calls.load(Ordering::SeqCst)
    }

    pub fn decrypt_calls(&self) -> usize {
        self.decrypt_calls.load(Ordering::SeqCst)
    }
}

/// input builder handed out by [`MockFheInstance`]
pub struct MockInputBuilder {
    contract_address: Address,
    user_address: Address,
    values: Vec<(FheType, u32)>,
    encrypt_calls: Arc<AtomicUsize>,
    failure: Option<String>,
}

impl MockInputBuilder {
    fn proof(&self, handles: &[[u8; HANDLE_BYTES]]) -> Vec<u8> {
        let mut salt = [0u8; PROOF_SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);

        let mut hasher = Sha256::new();
        hasher.update(self.contract_address.as_bytes());
        hasher.update(self.user_address.as_bytes());
        for handle in handles {
            hasher.update(handle);
        }

        let mut proof = Vec::with_capacity(1 + PROOF_SALT_LEN + 32);
        proof.push(handles.len() as u8);
        proof.extend_from_slice(&salt);
        proof.extend_from_slice(&hasher.finalize());
        proof
    }
}

#[async_trait]
impl EncryptedInputBuilder for MockInputBuilder {
    fn add8(&mut self, value: u8) {
        self.values.push((FheType::Euint8, value.into()));
    }

    fn add32(&mut self, value: u32) {
        self.values.push((FheType::Euint32, value));
    }

    async fn encrypt(&mut self) -> anyhow::Result<EncryptedInput> {
        self.encrypt_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.failure {
            bail!("{}", message);
        }
        if self.values.is_empty() {
            bail!("encrypted input is empty");
        }

        let masked: Vec<[u8; HANDLE_BYTES]> = self
            .values
            .iter()
            .map(|(fhe_type, value)| mask_value(*fhe_type, *value))
            .collect();

        let input_proof = self.proof(&masked);
        let handles = masked.into_iter().map(RawHandle::from).collect();

        Ok(EncryptedInput { handles, input_proof })
    }
}

#[async_trait]
impl FheInstance for MockFheInstance {
    type Builder = MockInputBuilder;

    fn build_encrypted_input(&self, contract_address: Address, user_address: Address) -> MockInputBuilder {
        MockInputBuilder {
            contract_address,
            user_address,
            values: Vec::new(),
            encrypt_calls: Arc::clone(&self.encrypt_calls),
            failure: self.failure.clone(),
        }
    }

    async fn batch_user_decrypt(&self, pairs: &[HandleContractPair]) -> anyhow::Result<DecryptedValues> {
        self.decrypt_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.failure {
            bail!("{}", message);
        }

        pairs
            .iter()
            .map(|pair| -> anyhow::Result<(CiphertextHandle, u128)> {
                let (_, value) = unmask_value(&pair.handle)
                    .ok_or_else(|| anyhow!("handle {} was not produced by this instance", pair.handle))?;
                Ok((pair.handle, u128::from(value)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_roundtrip() {
        for (ty, value) in [(FheType::Euint8, 2), (FheType::Euint32, 0), (FheType::Euint32, u32::MAX)] {
            let handle = CiphertextHandle(mask_value(ty, value));
            assert_eq!(unmask_value(&handle), Some((ty, value)));
        }
    }

    #[test]
    fn test_masked_handle_hides_plaintext() {
        let masked = mask_value(FheType::Euint32, 0);
        assert_ne!(masked, [0u8; HANDLE_BYTES]);
        assert_eq!(masked[0], MASK_OFFSET);
    }

    #[test]
    fn test_foreign_handle_rejected() {
        assert_eq!(unmask_value(&CiphertextHandle([0u8; 32])), None);
    }

    #[tokio::test]
    async fn test_builder_counts_and_proof() {
        let fhe = MockFheInstance::new();
        let mut input = fhe.build_encrypted_input(Address::ZERO, Address::ZERO);
        input.add32(7);
        input.add8(1);

        let encrypted = input.encrypt().await.unwrap();
        assert_eq!(encrypted.handles.len(), 2);
        assert_eq!(encrypted.input_proof.len(), 1 + PROOF_SALT_LEN + 32);
        assert_eq!(encrypted.input_proof[0], 2);
        assert_eq!(fhe.encrypt_calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_input_fails() {
        let fhe = MockFheInstance::new();
        let mut input = fhe.build_encrypted_input(Address::ZERO, Address::ZERO);
        assert!(input.encrypt().await.is_err());
    }

    #[tokio::test]
    async fn test_batch_decrypt() {
        let fhe = MockFheInstance::new();
        let contract = Address([1u8; 20]);
        let pairs: Vec<_> = [5u32, 6, 7]
            .iter()
            .map(|v| HandleContractPair {
                handle: CiphertextHandle(mask_value(FheType::Euint32, *v)),
                contract_address: contract,
            })
            .collect();

        let values = fhe.batch_user_decrypt(&pairs).await.unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values[&pairs[1].handle], 6);
        assert_eq!(fhe.decrypt_calls(), 1);
    }

    #[tokio::test]
    async fn test_failing_instance() {
        let fhe = MockFheInstance::failing("relayer unavailable");
        let mut input = fhe.build_encrypted_input(Address::ZERO, Address::ZERO);
        input.add32(1);

        let err = input.encrypt().await.unwrap_err();
        assert_eq!(err.to_string(), "relayer unavailable");
        assert!(fhe.batch_user_decrypt(&[]).await.is_err());
    }
}
