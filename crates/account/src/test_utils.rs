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

use std::time::Duration;

use alloy_primitives::{address, bytes, keccak256, Address, Bytes, B256, U256};
use sponsor_provider::{MockBundlerProvider, MockChainProvider, MockSponsorshipProvider};
use sponsor_signer::{construct_owner_signer, PrivateKeySigner};
use sponsor_types::{GasFees, ReceiptTransaction, SponsorshipData, UserOperationReceipt};
use sponsor_utils::retry::RetryOpts;

use crate::{AccountSettings, SubmitterSettings};

pub(crate) const ENTRY_POINT: Address = address!("5FF137D4b0FDCD49DcA30c7CF57E578a026d2789");
pub(crate) const FACTORY: Address = address!("15Ba39375ee2Ab563E8873C8390be6f2E2F50232");
pub(crate) const NFT: Address = address!("83bd615eb93eE1336acA53e185b03B54fF4A17e8");
pub(crate) const CHAIN_ID: u64 = 8453;
pub(crate) const GAS_FEES: GasFees = GasFees {
    max_fee_per_gas: 1_500_000,
    max_priority_fee_per_gas: 1_000_000,
};

// Default anvil accounts
const OWNER_KEYS: [&str; 3] = [
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
    "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
    "0x5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a",
];

pub(crate) fn owner(index: usize) -> PrivateKeySigner {
    construct_owner_signer(&OWNER_KEYS[index].to_string().into()).unwrap()
}

pub(crate) fn owners(count: usize) -> Vec<PrivateKeySigner> {
    (0..count).map(owner).collect()
}

pub(crate) fn account_settings() -> AccountSettings {
    AccountSettings {
        entry_point: ENTRY_POINT,
        factory: FACTORY,
        salt: U256::ZERO,
    }
}

pub(crate) fn submitter_settings() -> SubmitterSettings {
    SubmitterSettings {
        chain_id: CHAIN_ID,
        sponsorship_policy_id: None,
        receipt_timeout: Duration::from_secs(60),
        receipt_poll_interval: Duration::from_secs(1),
        retry_opts: RetryOpts::default(),
    }
}

/// Stand-in for the factory's address derivation
pub(crate) fn address_for(init_code: &Bytes) -> Address {
    Address::from_slice(&keccak256(init_code)[12..])
}

/// A chain where no account is deployed yet
pub(crate) fn mock_chain() -> MockChainProvider {
    let mut chain = MockChainProvider::new();
    chain.expect_get_chain_id().returning(|| Ok(CHAIN_ID));
    chain
        .expect_get_sender_address()
        .returning(|_, init_code| Ok(address_for(&init_code)));
    chain.expect_get_code().returning(|_| Ok(Bytes::new()));
    chain.expect_get_nonce().returning(|_, _| Ok(U256::ZERO));
    chain.expect_get_gas_fees().returning(|| Ok(GAS_FEES));
    chain
}

pub(crate) fn sponsored() -> SponsorshipData {
    SponsorshipData {
        paymaster_and_data: bytes!(
            "e3dc822d77f8ca7ac74c30b0dffea9fcdcaaa3210000000000000000000000000000000000000000000000000000000065f0d7c5"
        ),
        pre_verification_gas: U256::from(0xb1a8),
        verification_gas_limit: U256::from(0x60ad1),
        call_gas_limit: U256::from(0x1d192),
    }
}

pub(crate) fn always_sponsoring() -> MockSponsorshipProvider {
    let mut sponsor = MockSponsorshipProvider::new();
    sponsor
        .expect_sponsor_user_operation()
        .returning(|_| Ok(sponsored()));
    sponsor
}

/// Receipt whose transaction hash is derived from the user operation hash
pub(crate) fn receipt_for(user_op_hash: B256, success: bool) -> UserOperationReceipt {
    UserOperationReceipt {
        user_op_hash,
        sender: Address::ZERO,
        nonce: U256::ZERO,
        success,
        reason: None,
        actual_gas_cost: U256::from(0x1b6e3bb0a591_u64),
        actual_gas_used: U256::from(0x3f6e5),
        receipt: ReceiptTransaction {
            transaction_hash: keccak256(user_op_hash),
            block_number: Some(U256::from(20_000_000)),
        },
    }
}

/// A bundler accepting every operation, without receipt expectations
pub(crate) fn accepting_bundler() -> MockBundlerProvider {
    let mut bundler = MockBundlerProvider::new();
    bundler
        .expect_send_user_operation()
        .returning(|op, entry_point| Ok(op.hash(entry_point, CHAIN_ID)));
    bundler
}

/// A bundler accepting every operation and including it right away
pub(crate) fn including_bundler() -> MockBundlerProvider {
    let mut bundler = accepting_bundler();
    bundler
        .expect_get_user_operation_receipt()
        .returning(|hash| Ok(Some(receipt_for(hash, true))));
    bundler
}
