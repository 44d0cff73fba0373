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

use alloy_rpc_client::RpcClient;
use alloy_transport::Transport;
use serde::Serialize;
use sponsor_types::{SponsorshipData, SponsorshipRequest};
use tracing::debug;

use crate::{ProviderResult, SponsorshipProvider};

const SPONSOR_METHOD: &str = "pm_sponsorUserOperation";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SponsorshipContext {
    sponsorship_policy_id: String,
}

/// Sponsorship through a Pimlico verifying paymaster
#[derive(Debug, Clone)]
pub struct PimlicoPaymaster<T> {
    client: RpcClient<T>,
}

impl<T> PimlicoPaymaster<T> {
    /// Create a new `PimlicoPaymaster`
    pub fn new(client: RpcClient<T>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl<T> SponsorshipProvider for PimlicoPaymaster<T>
where
    T: Transport + Clone,
{
    async fn sponsor_user_operation(
        &self,
        request: SponsorshipRequest,
    ) -> ProviderResult<SponsorshipData> {
        let SponsorshipRequest {
            user_op,
            entry_point,
            sponsorship_policy_id,
        } = request;

        let data: SponsorshipData = match sponsorship_policy_id {
            Some(sponsorship_policy_id) => {
                let context = SponsorshipContext {
                    sponsorship_policy_id,
                };
                self.client
                    .request(SPONSOR_METHOD, (user_op, entry_point, context))
                    .await?
            }
            None => {
                self.client
                    .request(SPONSOR_METHOD, (user_op, entry_point))
                    .await?
            }
        };

        debug!(
            "paymaster {:?} sponsored operation, call gas limit {}",
            data.paymaster(),
            data.call_gas_limit
        );
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use alloy_primitives::{address, Address, U256};
    use serde_json::json;
    use sponsor_types::UserOperation;

    use super::*;
    use crate::{alloy::test_server, new_rpc_client, SponsorTransport};

    const ENTRY_POINT: Address = address!("5FF137D4b0FDCD49DcA30c7CF57E578a026d2789");

    fn paymaster_for(url: &str) -> PimlicoPaymaster<SponsorTransport> {
        PimlicoPaymaster::new(new_rpc_client(url, Duration::from_secs(5)).unwrap())
    }

    fn request(policy: Option<&str>) -> SponsorshipRequest {
        SponsorshipRequest {
            user_op: UserOperation::default(),
            entry_point: ENTRY_POINT,
            sponsorship_policy_id: policy.map(str::to_string),
        }
    }

    fn sponsored() -> serde_json::Value {
        json!({
            "paymasterAndData": "0xe3dc822d77f8ca7ac74c30b0dffea9fcdcaaa3210000000000000000000000000000000000000000000000000000000065f0d7c5",
            "preVerificationGas": "0xb1a8",
            "verificationGasLimit": "0x60ad1",
            "callGasLimit": "0x1d192"
        })
    }

    #[tokio::test]
    async fn test_sponsor_without_policy() {
        let url = test_server::serve(|request| {
            assert_eq!(request["method"], SPONSOR_METHOD);
            assert_eq!(request["params"].as_array().unwrap().len(), 2);
            sponsored()
        });

        let data = paymaster_for(&url)
            .sponsor_user_operation(request(None))
            .await
            .unwrap();
        assert_eq!(data.call_gas_limit, U256::from(0x1d192));
        assert_eq!(
            data.paymaster(),
            Some(address!("e3dc822d77f8ca7ac74c30b0dffea9fcdcaaa321"))
        );
    }

    #[tokio::test]
    async fn test_sponsor_with_policy() {
        let url = test_server::serve(|request| {
            assert_eq!(
                request["params"][2],
                json!({ "sponsorshipPolicyId": "sp_test_policy" })
            );
            sponsored()
        });

        let data = paymaster_for(&url)
            .sponsor_user_operation(request(Some("sp_test_policy")))
            .await
            .unwrap();
        assert_eq!(data.pre_verification_gas, U256::from(0xb1a8));
    }

    #[tokio::test]
    async fn test_sponsorship_denied() {
        let url = test_server::serve_raw(Duration::ZERO, |request| {
            json!({
                "jsonrpc": "2.0",
                "id": request["id"].clone(),
                "error": { "code": -32500, "message": "sponsorship policy rejected the operation" },
            })
        });

        let err = paymaster_for(&url)
            .sponsor_user_operation(request(None))
            .await
            .unwrap_err();
        assert!(!err.is_transient());
        assert!(err.to_string().contains("sponsorship policy rejected"));
    }
}
