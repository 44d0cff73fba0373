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

use alloy_primitives::{bytes, Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use sponsor_contracts::v0_6::{SimpleAccount, SimpleAccountFactory};
use sponsor_provider::ChainProvider;
use sponsor_signer::PrivateKeySigner;
use sponsor_types::AccountIdentity;
use tracing::debug;

use crate::AccountInitError;

/// Signature SimpleAccount validation accepts as well formed without
/// recovering to the owner: lets paymasters simulate the operation before
/// it is signed
const DUMMY_SIGNATURE: Bytes = bytes!(
    "fffffffffffffffffffffffffffffff0000000000000000000000000000000007aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1c"
);

/// Where and how a smart account is deployed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccountSettings {
    /// Entry point the account trusts
    pub entry_point: Address,
    /// Factory deploying the account
    pub factory: Address,
    /// Salt passed to the factory
    pub salt: U256,
}

/// A smart account controlled by an owner key
#[async_trait::async_trait]
pub trait SmartAccount: Send + Sync {
    /// Owner key address and account address
    fn identity(&self) -> AccountIdentity;

    /// The account address, the sender of its user operations
    fn address(&self) -> Address {
        self.identity().address
    }

    /// Entry point the account sends user operations to
    fn entry_point(&self) -> Address;

    /// Init code for the next user operation, empty once deployed
    fn init_code(&self) -> Bytes;

    /// Placeholder signature for operations that are not signed yet
    fn dummy_signature(&self) -> Bytes;

    /// Call data making the account call `dest` with `value` and `func`
    fn encode_execute(&self, dest: Address, value: U256, func: Bytes) -> Bytes;

    /// Sign a user operation hash with the owner key
    async fn sign_user_op_hash(&self, user_op_hash: B256) -> sponsor_signer::Result<Bytes>;
}

/// A v0.6 SimpleAccount deployed through SimpleAccountFactory
#[derive(Debug, Clone)]
pub struct SimpleSmartAccount {
    owner: PrivateKeySigner,
    identity: AccountIdentity,
    entry_point: Address,
    init_code: Bytes,
}

impl SimpleSmartAccount {
    /// Look up the account `owner` controls.
    ///
    /// The address is asked of the entry point, so it matches whatever the
    /// factory would deploy. Only reads from the chain.
    pub async fn initialize<C>(
        owner: PrivateKeySigner,
        chain: &C,
        settings: &AccountSettings,
    ) -> Result<Self, AccountInitError>
    where
        C: ChainProvider + ?Sized,
    {
        if settings.entry_point.is_zero() {
            return Err(AccountInitError::InvalidSettings("entry point address is zero"));
        }
        if settings.factory.is_zero() {
            return Err(AccountInitError::InvalidSettings("factory address is zero"));
        }

        let owner_address = owner.address();
        let init_code = init_code(settings.factory, owner_address, settings.salt);
        let address = chain
            .get_sender_address(settings.entry_point, init_code.clone())
            .await?;
        let deployed = !chain.get_code(address).await?.is_empty();
        debug!("Owner {owner_address:?} controls account {address:?}, deployed: {deployed}");

        Ok(Self {
            owner,
            identity: AccountIdentity {
                owner: owner_address,
                address,
                deployed,
            },
            entry_point: settings.entry_point,
            init_code,
        })
    }
}

#[async_trait::async_trait]
impl SmartAccount for SimpleSmartAccount {
    fn identity(&self) -> AccountIdentity {
        self.identity
    }

    fn entry_point(&self) -> Address {
        self.entry_point
    }

    fn init_code(&self) -> Bytes {
        if self.identity.deployed {
            Bytes::new()
        } else {
            self.init_code.clone()
        }
    }

    fn dummy_signature(&self) -> Bytes {
        DUMMY_SIGNATURE
    }

    fn encode_execute(&self, dest: Address, value: U256, func: Bytes) -> Bytes {
        SimpleAccount::executeCall { dest, value, func }
            .abi_encode()
            .into()
    }

    async fn sign_user_op_hash(&self, user_op_hash: B256) -> sponsor_signer::Result<Bytes> {
        sponsor_signer::sign_user_op_hash(&self.owner, user_op_hash).await
    }
}

fn init_code(factory: Address, owner: Address, salt: U256) -> Bytes {
    let create_account = SimpleAccountFactory::createAccountCall { owner, salt }.abi_encode();
    [factory.as_slice(), &create_account].concat().into()
}
