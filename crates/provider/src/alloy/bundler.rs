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
use alloy_rpc_client::RpcClient;
use alloy_transport::Transport;
use sponsor_types::{UserOperation, UserOperationReceipt};
use tracing::debug;

use crate::{BundlerProvider, ProviderResult};

/// Bundler client speaking the `eth_` user operation namespace
#[derive(Debug, Clone)]
pub struct AlloyBundlerClient<T> {
    client: RpcClient<T>,
}

impl<T> AlloyBundlerClient<T> {
    /// Create a new `AlloyBundlerClient`
    pub fn new(client: RpcClient<T>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl<T> BundlerProvider for AlloyBundlerClient<T>
where
    T: Transport + Clone,
{
    async fn send_user_operation(
        &self,
        user_op: UserOperation,
        entry_point: Address,
    ) -> ProviderResult<B256> {
        let hash: B256 = self
            .client
            .request("eth_sendUserOperation", (user_op, entry_point))
            .await?;
        debug!("bundler accepted user operation {hash:?}");
        Ok(hash)
    }

    async fn get_user_operation_receipt(
        &self,
        user_op_hash: B256,
    ) -> ProviderResult<Option<UserOperationReceipt>> {
        Ok(self
            .client
            .request("eth_getUserOperationReceipt", (user_op_hash,))
            .await?)
    }
}
