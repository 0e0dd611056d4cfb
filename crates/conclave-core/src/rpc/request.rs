use bitcoin::address::NetworkUnchecked;
use bitcoin::{Address, Network};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::codec::{Decode, JsonDocument};
use crate::error::RpcError;
use crate::types::{BitcoinTx, EntryTx, Outpoint};

use super::context::ChainContext;
use super::response::RpcResponse;
use super::types::Method;

// ==============================================================================
// Request
// ==============================================================================

/// A validated call to one RPC method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcRequest {
    GetNodeInfo,
    GetAddressBalance { address: Address<NetworkUnchecked> },
    GetConclaveBalance { address: Address<NetworkUnchecked> },
    GetConclaveOutput { outpoint: Outpoint },
    SendBitcoinTx { tx: BitcoinTx },
    SubmitEntryTx { entry_tx: EntryTx },
}

#[derive(Deserialize)]
struct AddressParams {
    address: String,
}

#[derive(Deserialize)]
struct OutpointParams {
    outpoint: Outpoint,
}

#[derive(Deserialize)]
struct SendBitcoinTxParams {
    tx: Option<BitcoinTx>,
    hex: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitEntryTxParams {
    entry_tx: EntryTx,
}

impl RpcRequest {
    pub fn method(&self) -> Method {
        match self {
            Self::GetNodeInfo => Method::GetNodeInfo,
            Self::GetAddressBalance { .. } => Method::GetAddressBalance,
            Self::GetConclaveBalance { .. } => Method::GetConclaveBalance,
            Self::GetConclaveOutput { .. } => Method::GetConclaveOutput,
            Self::SendBitcoinTx { .. } => Method::SendBitcoinTx,
            Self::SubmitEntryTx { .. } => Method::SubmitEntryTx,
        }
    }

    /// Parse a `{"method": ..., "params": {...}}` document.
    pub fn from_json(document: &serde_json::Value) -> Result<Self, RpcError> {
        let method = method_of(document)?;
        let params = document.get("params").unwrap_or(&serde_json::Value::Null);
        Self::from_params(method, params)
    }

    /// Build the request for `method` from its parameter object.
    pub fn from_params(method: Method, params: &serde_json::Value) -> Result<Self, RpcError> {
        if !(params.is_object() || params.is_null()) {
            return Err(RpcError::InvalidRequest(format!(
                "{method}: params must be an object"
            )));
        }

        match method {
            Method::GetNodeInfo => Ok(Self::GetNodeInfo),
            Method::GetAddressBalance => Ok(Self::GetAddressBalance {
                address: parse_address(method, params)?,
            }),
            Method::GetConclaveBalance => Ok(Self::GetConclaveBalance {
                address: parse_address(method, params)?,
            }),
            Method::GetConclaveOutput => {
                let OutpointParams { outpoint } = parse_params(method, params)?;
                Ok(Self::GetConclaveOutput { outpoint })
            }
            Method::SendBitcoinTx => {
                let SendBitcoinTxParams { tx, hex } = parse_params(method, params)?;
                let tx = match (tx, hex) {
                    (Some(tx), None) => tx,
                    (None, Some(hex)) => decode_raw_tx(method, &hex)?,
                    _ => {
                        return Err(RpcError::InvalidRequest(format!(
                            "{method}: exactly one of `tx` or `hex` is required"
                        )))
                    }
                };
                Ok(Self::SendBitcoinTx { tx })
            }
            Method::SubmitEntryTx => {
                let SubmitEntryTxParams { entry_tx } = parse_params(method, params)?;
                Ok(Self::SubmitEntryTx { entry_tx })
            }
        }
    }

    /// The request as a `{"method", "params"}` document.
    pub fn to_json(&self) -> serde_json::Value {
        let params = match self {
            Self::GetNodeInfo => serde_json::json!({}),
            Self::GetAddressBalance { address } | Self::GetConclaveBalance { address } => {
                serde_json::json!({ "address": address_string(address) })
            }
            Self::GetConclaveOutput { outpoint } => {
                serde_json::json!({ "outpoint": outpoint.to_json() })
            }
            Self::SendBitcoinTx { tx } => serde_json::json!({ "tx": tx.to_json() }),
            Self::SubmitEntryTx { entry_tx } => {
                serde_json::json!({ "entryTx": entry_tx.to_json() })
            }
        };
        serde_json::json!({ "method": self.method().name(), "params": params })
    }

    /// Run the request against the chain backends.
    pub fn handle(&self, ctx: &dyn ChainContext) -> Result<RpcResponse, RpcError> {
        match self {
            Self::GetNodeInfo => Ok(RpcResponse::NodeInfo {
                testnet: ctx.is_testnet(),
            }),
            Self::GetAddressBalance { address } => {
                let address = require_node_network(address, ctx)?;
                let balance = ctx.bitcoin_balance(&address)?;
                Ok(RpcResponse::AddressBalance {
                    address: address.to_string(),
                    balance,
                })
            }
            Self::GetConclaveBalance { address } => {
                let address = require_node_network(address, ctx)?;
                let balance = ctx.conclave_balance(&address)?;
                Ok(RpcResponse::ConclaveBalance {
                    address: address.to_string(),
                    balance,
                })
            }
            Self::GetConclaveOutput { outpoint } => Ok(RpcResponse::ConclaveOutput {
                output: ctx.conclave_output(outpoint)?,
            }),
            Self::SendBitcoinTx { tx } => Ok(RpcResponse::BitcoinTxSent {
                tx_id: ctx.submit_bitcoin_tx(tx)?,
            }),
            Self::SubmitEntryTx { entry_tx } => {
                ctx.submit_entry_tx(entry_tx)?;
                Ok(RpcResponse::EntryTxSubmitted {
                    fund_tx_id: entry_tx.fund_tx.txid(),
                    claim_tx_id: entry_tx.claim_tx.txid(),
                })
            }
        }
    }
}

// ==============================================================================
// Parameter Parsing
// ==============================================================================

/// The `method` field of a request document.
pub(crate) fn method_of(document: &serde_json::Value) -> Result<Method, RpcError> {
    if !document.is_object() {
        return Err(RpcError::InvalidRequest(
            "request must be a JSON object".into(),
        ));
    }
    document
        .get("method")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| RpcError::InvalidRequest("missing method".into()))?
        .parse()
}

fn parse_params<T: DeserializeOwned>(
    method: Method,
    params: &serde_json::Value,
) -> Result<T, RpcError> {
    T::deserialize(params).map_err(|e| RpcError::InvalidRequest(format!("{method}: {e}")))
}

fn parse_address(
    method: Method,
    params: &serde_json::Value,
) -> Result<Address<NetworkUnchecked>, RpcError> {
    let AddressParams { address } = parse_params(method, params)?;
    address
        .parse()
        .map_err(|e| RpcError::InvalidRequest(format!("{method}: invalid address {address}: {e}")))
}

fn decode_raw_tx(method: Method, raw: &str) -> Result<BitcoinTx, RpcError> {
    let bytes = hex::decode(raw)
        .map_err(|e| RpcError::InvalidRequest(format!("{method}: invalid hex: {e}")))?;
    BitcoinTx::decode(&bytes)
        .map_err(|e| RpcError::InvalidRequest(format!("{method}: invalid raw transaction: {e}")))
}

fn address_string(address: &Address<NetworkUnchecked>) -> String {
    address.clone().assume_checked().to_string()
}

fn network_label(testnet: bool) -> &'static str {
    if testnet {
        "test"
    } else {
        "production"
    }
}

/// Check an address against the network the node serves.
fn require_node_network(
    address: &Address<NetworkUnchecked>,
    ctx: &dyn ChainContext,
) -> Result<Address, RpcError> {
    let node_testnet = ctx.is_testnet();
    let address_testnet = !address.is_valid_for_network(Network::Bitcoin);
    if address_testnet != node_testnet {
        return Err(RpcError::NetworkMismatch {
            address: address_string(address),
            address_network: network_label(address_testnet),
            node_network: network_label(node_testnet),
        });
    }
    Ok(address.clone().assume_checked())
}
