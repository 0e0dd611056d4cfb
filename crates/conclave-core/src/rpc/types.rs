//! Method identifiers shared by requests and responses.

use std::fmt;
use std::str::FromStr;

use crate::error::RpcError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    GetNodeInfo,
    GetAddressBalance,
    GetConclaveBalance,
    GetConclaveOutput,
    SendBitcoinTx,
    SubmitEntryTx,
}

impl Method {
    pub const ALL: [Method; 6] = [
        Self::GetNodeInfo,
        Self::GetAddressBalance,
        Self::GetConclaveBalance,
        Self::GetConclaveOutput,
        Self::SendBitcoinTx,
        Self::SubmitEntryTx,
    ];

    /// Wire name of the method.
    pub fn name(self) -> &'static str {
        match self {
            Self::GetNodeInfo => "getnodeinfo",
            Self::GetAddressBalance => "getaddressbalance",
            Self::GetConclaveBalance => "getconclavebalance",
            Self::GetConclaveOutput => "getconclaveoutput",
            Self::SendBitcoinTx => "sendbitcointx",
            Self::SubmitEntryTx => "submitentrytx",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = RpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.name() == s)
            .ok_or_else(|| RpcError::UnknownMethod(s.to_owned()))
    }
}
