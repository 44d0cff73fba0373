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
#[cfg(feature = "test-utils")]
use mockall::automock;
use sponsor_types::{UserOperation, UserOperationReceipt};

use super::ProviderResult;

/// Client of an ERC-4337 bundler
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait::async_trait]
pub trait BundlerProvider: Send + Sync + 'static {
    /// Submit a signed user operation, returning its hash
    async fn send_user_operation(
        &self,
        user_op: UserOperation,
        entry_point: Address,
    ) -> ProviderResult<B256>;

    /// Receipt of a user operation, `None` until it is included
    async fn get_user_operation_receipt(
        &self,
        user_op_hash: B256,
    ) -> ProviderResult<Option<UserOperationReceipt>>;
}
