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

use std::marker::PhantomData;

use alloy_contract::Error as ContractError;
use alloy_primitives::{aliases::U192, Address, Bytes, U256};
use alloy_provider::Provider as AlloyProvider;
use alloy_sol_types::ContractError as SolContractError;
use alloy_transport::{Transport, TransportError};
use sponsor_contracts::v0_6::IEntryPoint::{IEntryPointErrors, IEntryPointInstance};
use sponsor_types::GasFees;

use crate::{ChainProvider, ProviderError, ProviderResult};

/// Chain provider implementation using [alloy-provider](https://github.com/alloy-rs/alloy-rs)
pub struct AlloyChainProvider<AP, T> {
    inner: AP,
    _marker: PhantomData<T>,
}

impl<AP, T> AlloyChainProvider<AP, T> {
    /// Create a new `AlloyChainProvider`
    pub fn new(inner: AP) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }
}

#[async_trait::async_trait]
impl<AP, T> ChainProvider for AlloyChainProvider<AP, T>
where
    T: Transport + Clone,
    AP: AlloyProvider<T> + 'static,
{
    async fn get_chain_id(&self) -> ProviderResult<u64> {
        Ok(self.inner.get_chain_id().await?)
    }

    async fn get_code(&self, address: Address) -> ProviderResult<Bytes> {
        Ok(self.inner.get_code_at(address).await?)
    }

    async fn get_sender_address(
        &self,
        entry_point: Address,
        init_code: Bytes,
    ) -> ProviderResult<Address> {
        let i_entry_point = IEntryPointInstance::<T, &AP>::new(entry_point, &self.inner);

        match i_entry_point.getSenderAddress(init_code).call().await {
            Ok(_) => Err(ProviderError::ContractError(
                "getSenderAddress should always revert".to_string(),
            )),
            Err(ContractError::TransportError(TransportError::ErrorResp(resp))) => {
                match resp.as_decoded_error::<SolContractError<IEntryPointErrors>>(false) {
                    Some(SolContractError::CustomError(
                        IEntryPointErrors::SenderAddressResult(result),
                    )) => Ok(result.sender),
                    Some(SolContractError::CustomError(IEntryPointErrors::FailedOp(failed))) => {
                        Err(ProviderError::ContractError(format!(
                            "getSenderAddress failed: {}",
                            failed.reason
                        )))
                    }
                    Some(SolContractError::Revert(revert)) => Err(ProviderError::ContractError(
                        format!("getSenderAddress reverted: {}", revert.reason),
                    )),
                    _ => Err(TransportError::ErrorResp(resp).into()),
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn get_nonce(&self, entry_point: Address, sender: Address) -> ProviderResult<U256> {
        let i_entry_point = IEntryPointInstance::<T, &AP>::new(entry_point, &self.inner);
        Ok(i_entry_point
            .getNonce(sender, U192::ZERO)
            .call()
            .await?
            .nonce)
    }

    async fn get_gas_fees(&self) -> ProviderResult<GasFees> {
        let estimate = self.inner.estimate_eip1559_fees(None).await?;
        Ok(GasFees {
            max_fee_per_gas: estimate.max_fee_per_gas,
            max_priority_fee_per_gas: estimate.max_priority_fee_per_gas,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use alloy_primitives::address;
    use serde_json::{json, Value};

    use super::*;
    use crate::{
        alloy::{new_alloy_provider, test_server},
        SponsorTransport,
    };

    const ENTRY_POINT: Address = address!("5FF137D4b0FDCD49DcA30c7CF57E578a026d2789");
    const SENDER: Address = address!("b0fcd38dc4205a9a1b2ab7b7c6a768dd7c16c620");

    fn provider_for(handler: impl Fn(&Value) -> Value + Send + 'static) -> impl ChainProvider {
        let url = test_server::serve_raw(Duration::ZERO, handler);
        AlloyChainProvider::<_, SponsorTransport>::new(
            new_alloy_provider(&url, Duration::from_secs(5)).unwrap(),
        )
    }

    fn reverting_with(data: &str) -> impl Fn(&Value) -> Value + Send + 'static {
        let data = data.to_string();
        move |request| {
            json!({
                "jsonrpc": "2.0",
                "id": request["id"].clone(),
                "error": { "code": 3, "message": "execution reverted", "data": data },
            })
        }
    }

    #[tokio::test]
    async fn test_get_sender_address_decodes_revert() {
        let provider = provider_for(reverting_with(
            "0x6ca7b806000000000000000000000000b0fcd38dc4205a9a1b2ab7b7c6a768dd7c16c620",
        ));

        let sender = provider
            .get_sender_address(ENTRY_POINT, Bytes::from_static(&[1, 2, 3]))
            .await
            .unwrap();
        assert_eq!(sender, SENDER);
    }

    #[tokio::test]
    async fn test_get_sender_address_unknown_revert() {
        let provider = provider_for(reverting_with("0xdeadbeef"));

        let err = provider
            .get_sender_address(ENTRY_POINT, Bytes::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Rpc { code: 3, .. }));
    }

    #[tokio::test]
    async fn test_get_sender_address_without_revert() {
        let provider = provider_for(|request| {
            json!({ "jsonrpc": "2.0", "id": request["id"].clone(), "result": "0x" })
        });

        let err = provider
            .get_sender_address(ENTRY_POINT, Bytes::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::ContractError(_)));
    }

    #[tokio::test]
    async fn test_get_nonce_and_code() {
        let provider = provider_for(|request| {
            let result = match request["method"].as_str().unwrap() {
                "eth_call" => {
                    json!("0x0000000000000000000000000000000000000000000000000000000000000007")
                }
                "eth_getCode" => json!("0x"),
                method => panic!("unexpected method {method}"),
            };
            json!({ "jsonrpc": "2.0", "id": request["id"].clone(), "result": result })
        });

        assert_eq!(
            provider.get_nonce(ENTRY_POINT, SENDER).await.unwrap(),
            U256::from(7)
        );
        assert!(provider.get_code(SENDER).await.unwrap().is_empty());
    }
}
