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

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::UserOperation;

/// An unsigned user operation waiting for a paymaster to sponsor it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SponsorshipRequest {
    /// The operation, carrying a dummy signature
    pub user_op: UserOperation,
    /// Entry point the operation will be sent to
    pub entry_point: Address,
    /// Paymaster policy to sponsor under, if the service needs one
    pub sponsorship_policy_id: Option<String>,
}

/// Paymaster response to a sponsorship request
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorshipData {
    /// Paymaster address followed by its validation data
    pub paymaster_and_data: Bytes,
    /// Pre-verification gas the paymaster priced the operation with
    pub pre_verification_gas: U256,
    /// Verification gas limit the paymaster priced the operation with
    pub verification_gas_limit: U256,
    /// Call gas limit the paymaster priced the operation with
    pub call_gas_limit: U256,
}

impl SponsorshipData {
    /// The paymaster address, if `paymaster_and_data` is long enough to hold one
    pub fn paymaster(&self) -> Option<Address> {
        (self.paymaster_and_data.len() >= 20)
            .then(|| Address::from_slice(&self.paymaster_and_data[..20]))
    }
}
