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

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};

use crate::{GasFees, SponsorshipData};

mod receipt;
pub use receipt::{ReceiptTransaction, UserOperationReceipt};

/// User operation in the layout of the v0.6 entry point
///
/// Serializes to the JSON-RPC form used by bundlers and paymasters: camelCase
/// keys, hex quantities.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperation {
    /// The smart account sending the operation
    pub sender: Address,
    /// Anti-replay nonce, as reported by the entry point
    pub nonce: U256,
    /// Factory address and calldata, empty once the account is deployed
    pub init_code: Bytes,
    /// Calldata for the account's execution step
    pub call_data: Bytes,
    /// Gas limit for the execution step
    pub call_gas_limit: U256,
    /// Gas limit for the verification step
    pub verification_gas_limit: U256,
    /// Gas paid to the bundler for unmetered overhead
    pub pre_verification_gas: U256,
    /// EIP-1559 max fee per gas
    pub max_fee_per_gas: U256,
    /// EIP-1559 max priority fee per gas
    pub max_priority_fee_per_gas: U256,
    /// Paymaster address and data, empty if the account pays for itself
    pub paymaster_and_data: Bytes,
    /// Signature over the operation hash
    pub signature: Bytes,
}

impl UserOperation {
    /// Hash of the operation as computed by the entry point's `getUserOpHash`.
    ///
    /// The signature is not part of the hash.
    pub fn hash(&self, entry_point: Address, chain_id: u64) -> B256 {
        keccak256(
            (
                keccak256(self.pack_for_hash()),
                entry_point,
                U256::from(chain_id),
            )
                .abi_encode(),
        )
    }

    /// Set the gas fees
    pub fn with_gas_fees(mut self, fees: GasFees) -> Self {
        self.max_fee_per_gas = U256::from(fees.max_fee_per_gas);
        self.max_priority_fee_per_gas = U256::from(fees.max_priority_fee_per_gas);
        self
    }

    /// Apply a paymaster's sponsorship: its data and the gas limits it
    /// priced the operation with.
    pub fn with_sponsorship(mut self, sponsorship: SponsorshipData) -> Self {
        self.paymaster_and_data = sponsorship.paymaster_and_data;
        self.pre_verification_gas = sponsorship.pre_verification_gas;
        self.verification_gas_limit = sponsorship.verification_gas_limit;
        self.call_gas_limit = sponsorship.call_gas_limit;
        self
    }

    fn pack_for_hash(&self) -> Vec<u8> {
        (
            self.sender,
            self.nonce,
            keccak256(&self.init_code),
            keccak256(&self.call_data),
            self.call_gas_limit,
            self.verification_gas_limit,
            self.pre_verification_gas,
            self.max_fee_per_gas,
            self.max_priority_fee_per_gas,
            keccak256(&self.paymaster_and_data),
        )
            .abi_encode()
    }
}
