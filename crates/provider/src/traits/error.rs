// This file is part of Sponsor.
//
// Sponsor is free software: you can redistribute it and/or modify it under the
// terms of the GNU Lesser General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version.
//
// Sponsor is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with Sponsor.
// If not, see https://www.gnu.org/licenses/.

use alloy_json_rpc::RpcError;
use alloy_transport::TransportError;

/// Error enumeration for the provider clients
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The server answered with a JSON-RPC error
    #[error("rpc error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// Error message
        message: String,
        /// Raw error data, if any
        data: Option<String>,
    },
    /// The request did not get an answer: connection failure, timeout, HTTP error
    #[error("transport error: {0}")]
    Transport(String),
    /// A contract call reverted unexpectedly or returned undecodable data
    #[error("contract error: {0}")]
    ContractError(String),
    /// Internal errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result of a provider method call
pub type ProviderResult<T> = Result<T, ProviderError>;

impl ProviderError {
    /// Returns true if the request may succeed when repeated
    pub fn is_transient(&self) -> bool {
        matches!(self, ProviderError::Transport(_))
    }
}

impl From<TransportError> for ProviderError {
    fn from(err: TransportError) -> Self {
        match err {
            RpcError::ErrorResp(payload) => ProviderError::Rpc {
                code: payload.code,
                message: payload.message.to_string(),
                data: payload.data.map(|d| d.get().to_string()),
            },
            RpcError::Transport(kind) => ProviderError::Transport(kind.to_string()),
            err => ProviderError::Other(err.into()),
        }
    }
}

impl From<alloy_contract::Error> for ProviderError {
    fn from(err: alloy_contract::Error) -> Self {
        match err {
            alloy_contract::Error::TransportError(err) => err.into(),
            err => ProviderError::ContractError(err.to_string()),
        }
    }
}
