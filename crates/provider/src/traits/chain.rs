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
#[cfg(feature = "test-utils")]
use mockall::automock;
use sponsor_types::GasFees;

use super::ProviderResult;

/// Read-only access to the chain
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait::async_trait]
pub trait ChainProvider: Send + Sync + 'static {
    /// Chain id reported by the node
    async fn get_chain_id(&self) -> ProviderResult<u64>;

    /// Code deployed at `address`, empty for accounts without code
    async fn get_code(&self, address: Address) -> ProviderResult<Bytes>;

    /// Ask the entry point which account `init_code` deploys, without
    /// deploying it
    async fn get_sender_address(
        &self,
        entry_point: Address,
        init_code: Bytes,
    ) -> ProviderResult<Address>;

    /// Next nonce of `sender` at the entry point, for nonce key 0
    async fn get_nonce(&self, entry_point: Address, sender: Address) -> ProviderResult<U256>;

    /// Current EIP-1559 fee estimate
    async fn get_gas_fees(&self) -> ProviderResult<GasFees>;
}
