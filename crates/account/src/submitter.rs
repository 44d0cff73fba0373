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

use std::{sync::Arc, time::Duration};

use alloy_primitives::{Address, Bytes, B256, U256};
use anyhow::anyhow;
use sponsor_contracts::{ContractAbi, EncodingError};
use sponsor_provider::{BundlerProvider, ChainProvider, ProviderError, SponsorshipProvider};
use sponsor_types::{Call, SponsorshipRequest, UserOperation, UserOperationReceipt};
use sponsor_utils::retry::{self, RetryOpts};
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use crate::{SmartAccount, SubmissionError, SubmitError};

/// Settings for the [`Submitter`]
#[derive(Clone, Debug)]
pub struct SubmitterSettings {
    /// Chain id bound into user operation hashes
    pub chain_id: u64,
    /// Paymaster policy forwarded with every sponsorship request
    pub sponsorship_policy_id: Option<String>,
    /// How long to wait for a receipt after the bundler accepted an operation
    pub receipt_timeout: Duration,
    /// Time between receipt queries
    pub receipt_poll_interval: Duration,
    /// Retries for transient sponsorship and submission failures
    pub retry_opts: RetryOpts,
}

/// A user operation that made it on chain
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SentTransaction {
    /// Hash of the user operation
    pub user_op_hash: B256,
    /// Hash of the transaction that included it
    pub tx_hash: B256,
}

/// Sends calls from smart accounts as sponsored user operations
pub struct Submitter<C, B, S> {
    chain: Arc<C>,
    bundler: Arc<B>,
    sponsor: Arc<S>,
    abi: ContractAbi,
    settings: SubmitterSettings,
}

impl<C, B, S> Submitter<C, B, S>
where
    C: ChainProvider,
    B: BundlerProvider,
    S: SponsorshipProvider,
{
    /// Create a new submitter. `abi` is the interface of the contract calls
    /// are made to.
    pub fn new(
        chain: Arc<C>,
        bundler: Arc<B>,
        sponsor: Arc<S>,
        abi: ContractAbi,
        settings: SubmitterSettings,
    ) -> Self {
        Self {
            chain,
            bundler,
            sponsor,
            abi,
            settings,
        }
    }

    /// The chain accounts are looked up on
    pub fn chain(&self) -> &C {
        &self.chain
    }

    /// Mint from `contract` to the account itself
    pub async fn mint<A: SmartAccount>(
        &self,
        account: &A,
        contract: Address,
    ) -> Result<SentTransaction, SubmitError> {
        let data = self.abi.encode_mint_to(account.address())?;
        self.send_transaction(
            account,
            Call {
                to: contract,
                data,
                value: U256::ZERO,
            },
        )
        .await
    }

    /// Send `call` from `account` through the paymaster and the bundler and
    /// wait for it to be included
    pub async fn send_transaction<A: SmartAccount>(
        &self,
        account: &A,
        call: Call,
    ) -> Result<SentTransaction, SubmitError> {
        if call.to.is_zero() {
            return Err(EncodingError::ZeroTarget.into());
        }
        let call_data = account.encode_execute(call.to, call.value, call.data);

        let user_op = self.prepare(account, call_data).await?;
        let user_op = self.sponsor(account, user_op).await?;

        let user_op_hash = user_op.hash(account.entry_point(), self.settings.chain_id);
        let signature = account
            .sign_user_op_hash(user_op_hash)
            .await
            .map_err(SubmissionError::Signing)?;
        let user_op = UserOperation {
            signature,
            ..user_op
        };

        let sent_hash = self.send(account, user_op).await?;
        if sent_hash != user_op_hash {
            warn!("Bundler returned hash {sent_hash:?}, expected {user_op_hash:?}");
        }

        let receipt = self.wait_for_receipt(sent_hash).await?;
        if !receipt.success {
            return Err(SubmissionError::Reverted {
                user_op_hash: sent_hash,
                reason: receipt
                    .reason
                    .unwrap_or_else(|| "no revert reason".to_string()),
            }
            .into());
        }

        info!(
            "User operation {sent_hash:?} from {:?} included in transaction {:?}",
            account.address(),
            receipt.transaction_hash()
        );
        Ok(SentTransaction {
            user_op_hash: sent_hash,
            tx_hash: receipt.transaction_hash(),
        })
    }

    async fn prepare<A: SmartAccount>(
        &self,
        account: &A,
        call_data: Bytes,
    ) -> Result<UserOperation, SubmissionError> {
        let sender = account.address();
        let nonce = self
            .chain
            .get_nonce(account.entry_point(), sender)
            .await
            .map_err(SubmissionError::Chain)?;
        let fees = self
            .chain
            .get_gas_fees()
            .await
            .map_err(SubmissionError::Chain)?;
        debug!("Preparing user operation from {sender:?}, nonce {nonce}, fees {fees:?}");

        Ok(UserOperation {
            sender,
            nonce,
            init_code: account.init_code(),
            call_data,
            signature: account.dummy_signature(),
            ..Default::default()
        }
        .with_gas_fees(fees))
    }

    async fn sponsor<A: SmartAccount>(
        &self,
        account: &A,
        user_op: UserOperation,
    ) -> Result<UserOperation, SubmitError> {
        let request = SponsorshipRequest {
            user_op: user_op.clone(),
            entry_point: account.entry_point(),
            sponsorship_policy_id: self.settings.sponsorship_policy_id.clone(),
        };

        let sponsorship = retry::with_retries(
            "sponsor user operation",
            || self.sponsor.sponsor_user_operation(request.clone()),
            ProviderError::is_transient,
            self.settings.retry_opts,
        )
        .await
        .map_err(SubmitError::Sponsorship)?;

        if sponsorship.paymaster().is_none() {
            return Err(SubmitError::Sponsorship(ProviderError::Other(anyhow!(
                "paymaster returned malformed paymasterAndData {}",
                sponsorship.paymaster_and_data
            ))));
        }
        Ok(user_op.with_sponsorship(sponsorship))
    }

    async fn send<A: SmartAccount>(
        &self,
        account: &A,
        user_op: UserOperation,
    ) -> Result<B256, SubmissionError> {
        let entry_point = account.entry_point();
        retry::with_retries(
            "send user operation",
            || self.bundler.send_user_operation(user_op.clone(), entry_point),
            ProviderError::is_transient,
            self.settings.retry_opts,
        )
        .await
        .map_err(SubmissionError::Bundler)
    }

    async fn wait_for_receipt(
        &self,
        user_op_hash: B256,
    ) -> Result<UserOperationReceipt, SubmissionError> {
        let deadline = Instant::now() + self.settings.receipt_timeout;
        loop {
            match self.bundler.get_user_operation_receipt(user_op_hash).await {
                Ok(Some(receipt)) => return Ok(receipt),
                Ok(None) => debug!("User operation {user_op_hash:?} not included yet"),
                Err(err) if err.is_transient() => {
                    warn!("Failed to get receipt of user operation {user_op_hash:?}: {err}")
                }
                Err(err) => return Err(SubmissionError::Bundler(err)),
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(SubmissionError::Timeout { user_op_hash });
            }
            time::sleep(self.settings.receipt_poll_interval.min(deadline - now)).await;
        }
    }
}
