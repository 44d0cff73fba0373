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

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// Receipt returned by `eth_getUserOperationReceipt`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationReceipt {
    /// The hash of the user operation
    pub user_op_hash: B256,
    /// The sender of this user operation
    pub sender: Address,
    /// The nonce of this user operation
    pub nonce: U256,
    /// Whether this operation's execution was successful
    pub success: bool,
    /// If not successful, the revert reason string
    #[serde(default)]
    pub reason: Option<String>,
    /// The gas cost of this operation
    pub actual_gas_cost: U256,
    /// The gas used by this operation
    pub actual_gas_used: U256,
    /// The transaction that included this operation
    pub receipt: ReceiptTransaction,
}

/// The parts of the bundle transaction receipt the tool reads
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptTransaction {
    /// Hash of the bundle transaction
    pub transaction_hash: B256,
    /// Block the transaction was included in
    #[serde(default)]
    pub block_number: Option<U256>,
}

impl UserOperationReceipt {
    /// Hash of the transaction that included the operation
    pub fn transaction_hash(&self) -> B256 {
        self.receipt.transaction_hash
    }
}
