use crate::codec::JsonDocument;
use crate::hash::Hash256;
use crate::types::ConclaveRichOutput;

use super::types::Method;

/// The result of a successfully handled request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcResponse {
    NodeInfo {
        testnet: bool,
    },
    AddressBalance {
        address: String,
        balance: u64,
    },
    ConclaveBalance {
        address: String,
        balance: u64,
    },
    ConclaveOutput {
        output: Option<ConclaveRichOutput>,
    },
    BitcoinTxSent {
        tx_id: Hash256,
    },
    EntryTxSubmitted {
        fund_tx_id: Hash256,
        claim_tx_id: Hash256,
    },
}

impl RpcResponse {
    pub fn method(&self) -> Method {
        match self {
            Self::NodeInfo { .. } => Method::GetNodeInfo,
            Self::AddressBalance { .. } => Method::GetAddressBalance,
            Self::ConclaveBalance { .. } => Method::GetConclaveBalance,
            Self::ConclaveOutput { .. } => Method::GetConclaveOutput,
            Self::BitcoinTxSent { .. } => Method::SendBitcoinTx,
            Self::EntryTxSubmitted { .. } => Method::SubmitEntryTx,
        }
    }

    /// The result payload; balances are decimal strings like every other
    /// unsigned integer on the wire.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::NodeInfo { testnet } => serde_json::json!({ "testnet": testnet }),
            Self::AddressBalance { address, balance }
            | Self::ConclaveBalance { address, balance } => serde_json::json!({
                "address": address,
                "balance": balance.to_string(),
            }),
            Self::ConclaveOutput { output } => serde_json::json!({
                "output": output.as_ref().map(JsonDocument::to_json),
            }),
            Self::BitcoinTxSent { tx_id } => serde_json::json!({ "txId": tx_id.to_string() }),
            Self::EntryTxSubmitted {
                fund_tx_id,
                claim_tx_id,
            } => serde_json::json!({
                "fundTxId": fund_tx_id.to_string(),
                "claimTxId": claim_tx_id.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;
    use crate::types::Outpoint;

    #[test]
    fn balance_is_string_encoded() {
        let response = RpcResponse::AddressBalance {
            address: "tb1qexample".into(),
            balance: u64::MAX,
        };
        assert_eq!(
            response.to_json(),
            serde_json::json!({ "address": "tb1qexample", "balance": "18446744073709551615" })
        );
        assert_eq!(response.method(), Method::GetAddressBalance);
    }

    #[test]
    fn missing_output_is_null() {
        let none = RpcResponse::ConclaveOutput { output: None };
        assert_eq!(none.to_json(), serde_json::json!({ "output": null }));

        let rich = ConclaveRichOutput {
            outpoint: Outpoint::new(hash_from_byte(1), 0),
            conclave_output: conclave_output(9, None),
        };
        let some = RpcResponse::ConclaveOutput {
            output: Some(rich.clone()),
        };
        assert_eq!(some.to_json()["output"], rich.to_json());
    }

    #[test]
    fn every_response_names_its_method() {
        let responses = [
            RpcResponse::NodeInfo { testnet: true },
            RpcResponse::ConclaveBalance {
                address: String::new(),
                balance: 0,
            },
            RpcResponse::BitcoinTxSent {
                tx_id: hash_from_byte(1),
            },
            RpcResponse::EntryTxSubmitted {
                fund_tx_id: hash_from_byte(1),
                claim_tx_id: hash_from_byte(2),
            },
        ];
        let methods: Vec<_> = responses.iter().map(RpcResponse::method).collect();
        assert_eq!(
            methods,
            vec![
                Method::GetNodeInfo,
                Method::GetConclaveBalance,
                Method::SendBitcoinTx,
                Method::SubmitEntryTx,
            ]
        );
    }
}
