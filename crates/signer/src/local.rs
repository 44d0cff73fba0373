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

use alloy_primitives::{Bytes, B256};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use secrecy::{ExposeSecret, SecretString};

use crate::{Error, Result};

const PRIVATE_KEY_LEN: usize = 32;

/// Parse a hex encoded owner key, with or without a `0x` prefix.
///
/// Error messages never contain the key material.
pub fn construct_owner_signer(private_key: &SecretString) -> Result<PrivateKeySigner> {
    let key = private_key.expose_secret().trim();
    let key = key.strip_prefix("0x").unwrap_or(key);

    let bytes = const_hex::decode(key)
        .map_err(|_| Error::InvalidKey("not a valid hex string".to_string()))?;
    if bytes.len() != PRIVATE_KEY_LEN {
        return Err(Error::InvalidKey(format!(
            "expected {PRIVATE_KEY_LEN} bytes, got {}",
            bytes.len()
        )));
    }

    PrivateKeySigner::from_slice(&bytes)
        .map_err(|_| Error::InvalidKey("not a valid secp256k1 scalar".to_string()))
}

/// Sign a user operation hash the way simple accounts validate it: as an
/// EIP-191 personal message over the 32 hash bytes. Returns the 65 byte
/// `r || s || v` signature.
pub async fn sign_user_op_hash(signer: &PrivateKeySigner, user_op_hash: B256) -> Result<Bytes> {
    let signature = signer.sign_message(user_op_hash.as_slice()).await?;
    Ok(Bytes::copy_from_slice(&signature.as_bytes()))
}
