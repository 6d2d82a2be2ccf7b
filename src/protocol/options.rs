//! LayerZero v2 executor message options
//!
//! OFT sends carry an `extraOptions` blob telling the executor how much gas to
//! forward on the destination chain. Only the type-3 format is produced here.

use alloy_primitives::{hex, Address, Bytes, FixedBytes};

/// Options format version prefix
pub const TYPE_3: u16 = 3;

/// Worker id of the executor
pub const EXECUTOR_WORKER_ID: u8 = 1;

const OPTION_TYPE_LZ_RECEIVE: u8 = 1;
const OPTION_TYPE_NATIVE_DROP: u8 = 2;
const OPTION_TYPE_LZ_COMPOSE: u8 = 3;
const OPTION_TYPE_ORDERED_EXECUTION: u8 = 4;

/// Gas forwarded to `lzReceive` by the transfer task unless overridden
pub const DEFAULT_LZ_RECEIVE_GAS: u128 = 200_000;

/// Builder for type-3 executor options
///
/// # Example
///
/// ```rust
/// use lz_oft_ops::ExecutorOptions;
///
/// let options = ExecutorOptions::new().add_lz_receive(200_000, 0);
/// assert_eq!(
///     options.to_hex(),
///     "0x00030100110100000000000000000000000000030d40"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorOptions {
    buf: Vec<u8>,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutorOptions {
    pub fn new() -> Self {
        Self {
            buf: TYPE_3.to_be_bytes().to_vec(),
        }
    }

    /// Gas (and optional native value) for the destination `lzReceive` call
    pub fn add_lz_receive(self, gas: u128, value: u128) -> Self {
        let mut payload = gas.to_be_bytes().to_vec();
        if value > 0 {
            payload.extend_from_slice(&value.to_be_bytes());
        }
        self.push(OPTION_TYPE_LZ_RECEIVE, &payload)
    }

    /// Airdrop `amount` of destination native gas to `receiver`
    pub fn add_native_drop(self, amount: u128, receiver: Address) -> Self {
        let mut payload = amount.to_be_bytes().to_vec();
        payload.extend_from_slice(address_to_bytes32(receiver).as_slice());
        self.push(OPTION_TYPE_NATIVE_DROP, &payload)
    }

    /// Gas (and optional value) for the `lzCompose` call at `index`
    pub fn add_compose(self, index: u16, gas: u128, value: u128) -> Self {
        let mut payload = index.to_be_bytes().to_vec();
        payload.extend_from_slice(&gas.to_be_bytes());
        if value > 0 {
            payload.extend_from_slice(&value.to_be_bytes());
        }
        self.push(OPTION_TYPE_LZ_COMPOSE, &payload)
    }

    pub fn add_ordered_execution(self) -> Self {
        self.push(OPTION_TYPE_ORDERED_EXECUTION, &[])
    }

    fn push(mut self, option_type: u8, payload: &[u8]) -> Self {
        // length covers the option type byte plus the payload
        let len = (payload.len() + 1) as u16;
        self.buf.push(EXECUTOR_WORKER_ID);
        self.buf.extend_from_slice(&len.to_be_bytes());
        self.buf.push(option_type);
        self.buf.extend_from_slice(payload);
        self
    }

    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(&self.buf)
    }

    pub fn to_hex(&self) -> String {
        hex::encode_prefixed(&self.buf)
    }
}

impl From<ExecutorOptions> for Bytes {
    fn from(options: ExecutorOptions) -> Self {
        options.buf.into()
    }
}

/// Left-pads an address into the 32-byte recipient word used by OFT sends
#[inline]
pub fn address_to_bytes32(address: Address) -> FixedBytes<32> {
    address.into_word()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_empty_options_is_type_prefix() {
        assert_eq!(ExecutorOptions::new().to_hex(), "0x0003");
    }

    #[test]
    fn test_lz_receive_with_value() {
        let options = ExecutorOptions::new().add_lz_receive(65_000, 1);
        let bytes = options.to_bytes();
        // prefix(2) + worker(1) + len(2) + type(1) + gas(16) + value(16)
        assert_eq!(bytes.len(), 38);
        assert_eq!(&bytes[3..5], &33u16.to_be_bytes());
        assert_eq!(bytes[37], 1);
    }

    #[test]
    fn test_native_drop_layout() {
        let receiver = address!("85576DEa799eC912AAf05566922EaC75fC97Bd79");
        let bytes = ExecutorOptions::new()
            .add_native_drop(10, receiver)
            .to_bytes();
        assert_eq!(bytes.len(), 2 + 4 + 16 + 32);
        assert_eq!(bytes[5], OPTION_TYPE_NATIVE_DROP);
        assert_eq!(&bytes[bytes.len() - 20..], receiver.as_slice());
    }

    #[test]
    fn test_chained_options() {
        let bytes = ExecutorOptions::new()
            .add_lz_receive(200_000, 0)
            .add_compose(0, 50_000, 0)
            .add_ordered_execution()
            .to_bytes();
        assert_eq!(bytes.len(), 22 + (4 + 18) + 4);
        assert_eq!(bytes[bytes.len() - 1], OPTION_TYPE_ORDERED_EXECUTION);
    }

    #[test]
    fn test_address_to_bytes32() {
        let addr = address!("BeD1808E6Dec5aDee59B1671Da8CFa81a9A1F2D3");
        let word = address_to_bytes32(addr);
        assert_eq!(&word[..12], &[0u8; 12]);
        assert_eq!(&word[12..], addr.as_slice());
    }
}
