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

use alloy_primitives::{Address, B256};

/// An owner key and the smart account it controls
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccountIdentity {
    /// Address of the owner key
    pub owner: Address,
    /// Counterfactual (or deployed) smart account address
    pub address: Address,
    /// Whether the smart account already has code on chain
    pub deployed: bool,
}

/// How an account's submission ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The operation was included on chain
    Success {
        /// Transaction that included the user operation
        tx_hash: B256,
        /// Hash of the user operation
        user_op_hash: B256,
    },
    /// Initialization or submission failed
    Failed {
        /// Rendered error
        error: String,
    },
}

/// Result of processing one account
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Position of the account in the configured list
    pub index: usize,
    /// Owner of the account
    pub owner: Address,
    /// Smart account address, unknown if initialization failed
    pub sender: Option<Address>,
    /// Outcome
    pub outcome: Outcome,
}

impl TransactionRecord {
    /// The smart account address if known, otherwise the owner address
    pub fn context_address(&self) -> Address {
        self.sender.unwrap_or(self.owner)
    }

    /// Returns true if the submission succeeded
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success { .. })
    }
}
