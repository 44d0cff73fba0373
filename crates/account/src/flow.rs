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

//! Drives every configured account through initialization and one sponsored
//! mint.
//!
//! The flow moves `Idle -> Initializing -> Submitting(i) -> Done`: every
//! account is initialized before the first submission. Failures end that
//! account's run early with a failed record; the remaining accounts are still
//! processed.

use std::sync::{Mutex, PoisonError};

use alloy_primitives::Address;
use futures_util::{stream, StreamExt};
use parse_display::Display;
use sponsor_provider::{BundlerProvider, ChainProvider, SponsorshipProvider};
use sponsor_signer::PrivateKeySigner;
use sponsor_types::{Outcome, TransactionRecord};
use sponsor_utils::log::LogOnError;
use tracing::{info, Level};

use crate::{AccountInitError, AccountSettings, SimpleSmartAccount, SmartAccount, Submitter};

/// How accounts are scheduled within each phase
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IterationPolicy {
    /// One account at a time, in order
    #[default]
    Sequential,
    /// Up to `max_in_flight` accounts at a time
    Concurrent {
        /// Maximum number of accounts processed at once
        max_in_flight: usize,
    },
}

impl IterationPolicy {
    /// Policy processing `max_in_flight` accounts at once, sequential for 1 or less
    pub fn with_max_in_flight(max_in_flight: usize) -> Self {
        if max_in_flight <= 1 {
            Self::Sequential
        } else {
            Self::Concurrent { max_in_flight }
        }
    }

    fn max_in_flight(&self) -> usize {
        match self {
            Self::Sequential => 1,
            Self::Concurrent { max_in_flight } => (*max_in_flight).max(1),
        }
    }
}

/// Settings for [`run_flow`]
#[derive(Clone, Debug)]
pub struct FlowSettings {
    /// Deployment settings shared by every account
    pub account: AccountSettings,
    /// NFT contract to mint from
    pub contract: Address,
    /// Account scheduling
    pub policy: IterationPolicy,
}

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
enum FlowState {
    Idle,
    Initializing,
    #[display("Submitting({0})")]
    Submitting(usize),
    Done,
}

struct FlowRun {
    state: Mutex<FlowState>,
}

impl FlowRun {
    fn new() -> Self {
        Self {
            state: Mutex::new(FlowState::Idle),
        }
    }

    fn update(&self, state: FlowState) {
        let mut current = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        info!("Flow: {} -> {}", *current, state);
        *current = state;
    }
}

struct Initialized {
    index: usize,
    owner: Address,
    account: Result<SimpleSmartAccount, AccountInitError>,
}

/// Initialize an account for each owner, then mint once from each. Returns a
/// record per owner, in owner order, whatever the individual outcomes.
pub async fn run_flow<C, B, S>(
    owners: Vec<PrivateKeySigner>,
    submitter: &Submitter<C, B, S>,
    settings: &FlowSettings,
) -> Vec<TransactionRecord>
where
    C: ChainProvider,
    B: BundlerProvider,
    S: SponsorshipProvider,
{
    info!(
        "Processing {} accounts, policy {:?}",
        owners.len(),
        settings.policy
    );
    let run = &FlowRun::new();
    let max_in_flight = settings.policy.max_in_flight();

    let chain = submitter.chain();
    let account_settings = &settings.account;

    run.update(FlowState::Initializing);
    let initialized: Vec<Initialized> = stream::iter(owners.into_iter().enumerate())
        .map(move |(index, owner)| initialize(index, owner, chain, account_settings))
        .buffered(max_in_flight)
        .collect()
        .await;

    let records: Vec<TransactionRecord> = stream::iter(initialized)
        .map(move |initialized| async move {
            let Initialized {
                index,
                owner,
                account,
            } = initialized;
            match account {
                Ok(account) => {
                    run.update(FlowState::Submitting(index));
                    submit(index, owner, &account, submitter, settings.contract).await
                }
                Err(err) => TransactionRecord {
                    index,
                    owner,
                    sender: None,
                    outcome: Outcome::Failed {
                        error: err.to_string(),
                    },
                },
            }
        })
        .buffered(max_in_flight)
        .collect()
        .await;
    run.update(FlowState::Done);

    let succeeded = records.iter().filter(|r| r.is_success()).count();
    info!(
        "Done: {succeeded} of {} accounts submitted successfully",
        records.len()
    );
    records
}

async fn initialize<C: ChainProvider + ?Sized>(
    index: usize,
    owner: PrivateKeySigner,
    chain: &C,
    settings: &AccountSettings,
) -> Initialized {
    let owner_address = owner.address();
    let account = SimpleSmartAccount::initialize(owner, chain, settings)
        .await
        .log_on_error(format!("Failed to initialize account for owner {owner_address}"));
    Initialized {
        index,
        owner: owner_address,
        account,
    }
}

async fn submit<C, B, S>(
    index: usize,
    owner: Address,
    account: &SimpleSmartAccount,
    submitter: &Submitter<C, B, S>,
    contract: Address,
) -> TransactionRecord
where
    C: ChainProvider,
    B: BundlerProvider,
    S: SponsorshipProvider,
{
    let sender = account.address();
    let outcome = match submitter
        .mint(account, contract)
        .await
        .log_on_error_level(Level::WARN, format!("Transaction failed for {sender}"))
    {
        Ok(sent) => Outcome::Success {
            tx_hash: sent.tx_hash,
            user_op_hash: sent.user_op_hash,
        },
        Err(err) => Outcome::Failed {
            error: err.to_string(),
        },
    };

    TransactionRecord {
        index,
        owner,
        sender: Some(sender),
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use alloy_primitives::B256;
    use sponsor_contracts::ContractAbi;
    use sponsor_provider::{
        MockBundlerProvider, MockChainProvider, MockSponsorshipProvider, ProviderError,
    };

    use super::*;
    use crate::test_utils::*;

    fn flow_settings(policy: IterationPolicy) -> FlowSettings {
        FlowSettings {
            account: account_settings(),
            contract: NFT,
            policy,
        }
    }

    fn submitter(
        chain: MockChainProvider,
        bundler: MockBundlerProvider,
        sponsor: MockSponsorshipProvider,
    ) -> Submitter<MockChainProvider, MockBundlerProvider, MockSponsorshipProvider> {
        Submitter::new(
            Arc::new(chain),
            Arc::new(bundler),
            Arc::new(sponsor),
            ContractAbi::mintable_nft().unwrap(),
            submitter_settings(),
        )
    }

    fn tx_hash(record: &TransactionRecord) -> B256 {
        match record.outcome {
            Outcome::Success { tx_hash, .. } => tx_hash,
            Outcome::Failed { ref error } => panic!("account {} failed: {error}", record.index),
        }
    }

    #[test]
    fn test_state_display() {
        assert_eq!(FlowState::Idle.to_string(), "Idle");
        assert_eq!(FlowState::Initializing.to_string(), "Initializing");
        assert_eq!(FlowState::Submitting(1).to_string(), "Submitting(1)");
    }

    #[test]
    fn test_policy_from_max_in_flight() {
        assert_eq!(
            IterationPolicy::with_max_in_flight(1),
            IterationPolicy::Sequential
        );
        assert_eq!(
            IterationPolicy::with_max_in_flight(4),
            IterationPolicy::Concurrent { max_in_flight: 4 }
        );
        assert_eq!(
            IterationPolicy::Concurrent { max_in_flight: 0 }.max_in_flight(),
            1
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_accounts_succeed() {
        let submitter = submitter(mock_chain(), including_bundler(), always_sponsoring());

        let records = run_flow(
            owners(2),
            &submitter,
            &flow_settings(IterationPolicy::Sequential),
        )
        .await;

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(TransactionRecord::is_success));
        assert_eq!(records[0].owner, owner(0).address());
        assert_eq!(records[1].owner, owner(1).address());
        assert_ne!(records[0].sender, records[1].sender);
        assert_ne!(tx_hash(&records[0]), tx_hash(&records[1]));
    }

    fn logging_mocks(
        calls: &Arc<Mutex<Vec<&'static str>>>,
    ) -> (MockChainProvider, MockBundlerProvider) {
        let mut chain = MockChainProvider::new();
        let inits = calls.clone();
        chain
            .expect_get_sender_address()
            .returning(move |_, init_code| {
                inits.lock().unwrap().push("init");
                Ok(address_for(&init_code))
            });
        chain.expect_get_code().returning(|_| Ok(Default::default()));
        chain.expect_get_nonce().returning(|_, _| Ok(Default::default()));
        chain.expect_get_gas_fees().returning(|| Ok(GAS_FEES));

        let mut bundler = MockBundlerProvider::new();
        let submits = calls.clone();
        bundler
            .expect_send_user_operation()
            .returning(move |op, entry_point| {
                submits.lock().unwrap().push("submit");
                Ok(op.hash(entry_point, CHAIN_ID))
            });
        bundler
            .expect_get_user_operation_receipt()
            .returning(|hash| Ok(Some(receipt_for(hash, true))));
        (chain, bundler)
    }

    #[tokio::test(start_paused = true)]
    async fn test_accounts_initialized_before_any_submission() {
        for policy in [
            IterationPolicy::Sequential,
            IterationPolicy::Concurrent { max_in_flight: 2 },
        ] {
            let calls = Arc::new(Mutex::new(vec![]));
            let (chain, bundler) = logging_mocks(&calls);
            let submitter = submitter(chain, bundler, always_sponsoring());

            let records = run_flow(owners(2), &submitter, &flow_settings(policy)).await;

            assert!(records.iter().all(TransactionRecord::is_success));
            assert_eq!(
                *calls.lock().unwrap(),
                vec!["init", "init", "submit", "submit"],
                "{policy:?}"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_paymaster_down_for_one_account() {
        let first_sender = {
            let chain = mock_chain();
            SimpleSmartAccount::initialize(owner(0), &chain, &account_settings())
                .await
                .unwrap()
                .address()
        };
        let mut sponsor = MockSponsorshipProvider::new();
        sponsor
            .expect_sponsor_user_operation()
            .returning(move |request| {
                if request.user_op.sender == first_sender {
                    Err(ProviderError::Transport("connection refused".to_string()))
                } else {
                    Ok(sponsored())
                }
            });
        let submitter = submitter(mock_chain(), including_bundler(), sponsor);

        let records = run_flow(
            owners(2),
            &submitter,
            &flow_settings(IterationPolicy::Sequential),
        )
        .await;

        assert_eq!(records[0].sender, Some(first_sender));
        assert!(matches!(
            &records[0].outcome,
            Outcome::Failed { error } if error.contains("sponsorship")
        ));
        assert!(records[1].is_success());
    }

    #[tokio::test(start_paused = true)]
    async fn test_init_failure_is_recorded() {
        let bad_owner = owner(0).address();
        let mut chain = MockChainProvider::new();
        chain
            .expect_get_sender_address()
            .returning(move |_, init_code| {
                // owner address sits in the first createAccount argument
                if init_code[20 + 4 + 12..20 + 4 + 32] == bad_owner[..] {
                    Err(ProviderError::Transport("connection reset".to_string()))
                } else {
                    Ok(address_for(&init_code))
                }
            });
        chain.expect_get_code().returning(|_| Ok(Default::default()));
        chain.expect_get_nonce().returning(|_, _| Ok(Default::default()));
        chain.expect_get_gas_fees().returning(|| Ok(GAS_FEES));
        let submitter = submitter(chain, including_bundler(), always_sponsoring());

        let records = run_flow(
            owners(2),
            &submitter,
            &flow_settings(IterationPolicy::Sequential),
        )
        .await;

        assert_eq!(records[0].sender, None);
        assert_eq!(records[0].context_address(), bad_owner);
        assert!(!records[0].is_success());
        assert!(records[1].is_success());
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_records_in_account_order() {
        // the first account's operation takes the longest to be included
        let polls: Arc<Mutex<HashMap<B256, usize>>> = Arc::default();
        let first_sender = {
            let chain = mock_chain();
            SimpleSmartAccount::initialize(owner(0), &chain, &account_settings())
                .await
                .unwrap()
                .address()
        };
        let senders: Arc<Mutex<HashMap<B256, Address>>> = Arc::default();
        let sent = senders.clone();

        let mut bundler = MockBundlerProvider::new();
        bundler
            .expect_send_user_operation()
            .returning(move |op, entry_point| {
                let hash = op.hash(entry_point, CHAIN_ID);
                sent.lock().unwrap().insert(hash, op.sender);
                Ok(hash)
            });
        bundler
            .expect_get_user_operation_receipt()
            .returning(move |hash| {
                let mut polls = polls.lock().unwrap();
                let count = polls.entry(hash).or_default();
                *count += 1;
                let slow = senders.lock().unwrap()[&hash] == first_sender;
                if slow && *count < 5 {
                    Ok(None)
                } else {
                    Ok(Some(receipt_for(hash, true)))
                }
            });
        let submitter = submitter(mock_chain(), bundler, always_sponsoring());

        let records = run_flow(
            owners(3),
            &submitter,
            &flow_settings(IterationPolicy::Concurrent { max_in_flight: 3 }),
        )
        .await;

        assert_eq!(
            records.iter().map(|r| r.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(records[0].sender, Some(first_sender));
        assert!(records.iter().all(TransactionRecord::is_success));
    }
}
