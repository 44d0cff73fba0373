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

use alloy_primitives::B256;
use sponsor_contracts::EncodingError;
use sponsor_provider::ProviderError;

/// Error initializing a smart account
#[derive(Debug, thiserror::Error)]
pub enum AccountInitError {
    /// An address in the account settings is unusable
    #[error("invalid account settings: {0}")]
    InvalidSettings(&'static str),
    /// The chain could not tell the account address or its code
    #[error("failed to query account on chain: {0}")]
    Chain(#[from] ProviderError),
}

/// Error getting a sponsored operation included
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// A chain query needed to prepare the operation failed
    #[error("failed to prepare user operation: {0}")]
    Chain(ProviderError),
    /// The owner key could not sign the operation
    #[error("failed to sign user operation: {0}")]
    Signing(#[from] sponsor_signer::Error),
    /// The bundler did not accept the operation or could not report on it
    #[error("bundler error: {0}")]
    Bundler(ProviderError),
    /// The operation was included but its execution reverted
    #[error("user operation {user_op_hash} reverted: {reason}")]
    Reverted {
        /// Hash of the user operation
        user_op_hash: B256,
        /// Revert reason reported by the bundler
        reason: String,
    },
    /// No receipt arrived before the deadline
    #[error("timed out waiting for receipt of user operation {user_op_hash}")]
    Timeout {
        /// Hash of the user operation
        user_op_hash: B256,
    },
}

/// Error sending a transaction from a smart account
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The contract call could not be encoded
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),
    /// The paymaster did not sponsor the operation
    #[error("sponsorship error: {0}")]
    Sponsorship(ProviderError),
    /// The operation was not included successfully
    #[error("submission error: {0}")]
    Submission(#[from] SubmissionError),
}
