use alloy_primitives::utils::parse_units;
use alloy_primitives::{Address, Bytes, TxHash, U256};
use bon::Builder;

use crate::contracts::oft::SendParam;
use crate::error::{OftError, Result};
use crate::protocol::{address_to_bytes32, ExecutorOptions, DEFAULT_LZ_RECEIVE_GAS};
use crate::EndpointId;

/// One cross-chain token transfer, described in human units.
///
/// # Example
///
/// ```rust
/// use lz_oft_ops::{EndpointId, TransferIntent};
/// use alloy_primitives::address;
///
/// let intent = TransferIntent::builder()
///     .source(EndpointId::BaseSepolia)
///     .destination(EndpointId::ArbitrumSepolia)
///     .recipient(address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"))
///     .amount("10")
///     .build();
/// assert_eq!(intent.options().len(), 22);
/// ```
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct TransferIntent {
    source: EndpointId,
    destination: EndpointId,
    recipient: Address,
    /// Decimal amount in whole tokens, e.g. `"10"` or `"0.5"`
    #[builder(into)]
    amount: String,
    /// Executor options; defaults to a 200k gas `lzReceive`
    #[builder(into, default = default_options())]
    options: Bytes,
}

fn default_options() -> Bytes {
    ExecutorOptions::new()
        .add_lz_receive(DEFAULT_LZ_RECEIVE_GAS, 0)
        .into()
}

impl TransferIntent {
    pub fn source(&self) -> EndpointId {
        self.source
    }

    pub fn destination(&self) -> EndpointId {
        self.destination
    }

    pub fn recipient(&self) -> Address {
        self.recipient
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn options(&self) -> &Bytes {
        &self.options
    }

    /// Amount in the token's smallest unit
    pub fn amount_ld(&self, decimals: u8) -> Result<U256> {
        parse_amount(&self.amount, decimals)
    }

    /// `send` parameters for `amount_ld`, with no slippage allowance
    pub fn send_param(&self, amount_ld: U256) -> SendParam {
        SendParam {
            dstEid: self.destination.as_u32(),
            to: address_to_bytes32(self.recipient),
            amountLD: amount_ld,
            minAmountLD: amount_ld,
            extraOptions: self.options.clone(),
            composeMsg: Bytes::new(),
            oftCmd: Bytes::new(),
        }
    }
}

/// Parses a positive decimal token amount into base units.
pub fn parse_amount(amount: &str, decimals: u8) -> Result<U256> {
    let invalid = |reason: String| OftError::InvalidAmount {
        amount: amount.to_string(),
        reason,
    };

    let parsed = parse_units(amount.trim(), decimals).map_err(|e| invalid(e.to_string()))?;
    if parsed.is_negative() {
        return Err(invalid("amount is negative".to_string()));
    }
    let value = parsed.get_absolute();
    if value.is_zero() {
        return Err(invalid("amount is zero".to_string()));
    }
    Ok(value)
}

/// Transaction fields the task pins instead of leaving to the wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOverrides {
    /// Native messaging fee
    pub value: U256,
    pub gas_price: u128,
    pub nonce: u64,
}

/// Inclusion result of the `send` transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    /// `false` when the transaction reverted
    pub success: bool,
}

/// LayerZero Scan page for a source transaction
pub fn scan_url(source: EndpointId, tx_hash: TxHash) -> String {
    let host = if source.is_testnet() {
        "testnet.layerzeroscan.com"
    } else {
        "layerzeroscan.com"
    };
    format!("https://{host}/tx/{tx_hash}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, hex};
    use rstest::rstest;

    const RECIPIENT: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

    fn intent(amount: &str) -> TransferIntent {
        TransferIntent::builder()
            .source(EndpointId::BaseSepolia)
            .destination(EndpointId::ArbitrumSepolia)
            .recipient(RECIPIENT)
            .amount(amount)
            .build()
    }

    #[rstest]
    #[case("10", 18, U256::from(10u64) * U256::from(10u64).pow(U256::from(18u64)))]
    #[case("0.5", 6, U256::from(500_000u64))]
    #[case("1", 0, U256::from(1u64))]
    #[case(" 2 ", 2, U256::from(200u64))]
    fn test_parse_amount(#[case] amount: &str, #[case] decimals: u8, #[case] expected: U256) {
        assert_eq!(parse_amount(amount, decimals).unwrap(), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("-1")]
    #[case("ten")]
    #[case("")]
    fn test_parse_amount_rejects(#[case] amount: &str) {
        assert!(matches!(
            parse_amount(amount, 18).unwrap_err(),
            OftError::InvalidAmount { .. }
        ));
    }

    #[test]
    fn test_send_param() {
        let param = intent("10").send_param(U256::from(10u64));
        assert_eq!(param.dstEid, 40231);
        assert_eq!(param.to, RECIPIENT.into_word());
        assert_eq!(param.amountLD, param.minAmountLD);
        assert_eq!(
            hex::encode_prefixed(&param.extraOptions),
            "0x00030100110100000000000000000000000000030d40"
        );
        assert!(param.composeMsg.is_empty());
        assert!(param.oftCmd.is_empty());
    }

    #[test]
    fn test_custom_options() {
        let options = ExecutorOptions::new().add_lz_receive(500_000, 0);
        let intent = TransferIntent::builder()
            .source(EndpointId::Sepolia)
            .destination(EndpointId::Holesky)
            .recipient(RECIPIENT)
            .amount("1")
            .options(options.clone())
            .build();
        assert_eq!(intent.options(), &options.to_bytes());
    }

    #[test]
    fn test_scan_url() {
        let tx_hash = TxHash::repeat_byte(0xab);
        let url = scan_url(EndpointId::BaseSepolia, tx_hash);
        assert!(url.starts_with("https://testnet.layerzeroscan.com/tx/0xabab"));
        assert!(scan_url(EndpointId::Base, tx_hash).starts_with("https://layerzeroscan.com/tx/"));
    }
}
