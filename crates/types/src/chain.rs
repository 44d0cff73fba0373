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

//! Chain constants

use alloy_primitives::{address, Address, B256};
use serde::{Deserialize, Serialize};

const ENTRY_POINT_ADDRESS_V0_6: Address = address!("5FF137D4b0FDCD49DcA30c7CF57E578a026d2789");
const SIMPLE_ACCOUNT_FACTORY_ADDRESS: Address =
    address!("15Ba39375ee2Ab563E8873C8390be6f2E2F50232");

/// Chain specification, everything the tool needs to know about a network
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChainSpec {
    /// name for logging purposes, e.g. "Base", no logic is performed on this
    pub name: String,
    /// chain id
    pub id: u64,
    /// entry point address for v0_6
    pub entry_point_address_v0_6: Address,
    /// factory deploying simple accounts for the v0_6 entry point
    pub simple_account_factory_address: Address,
    /// base URL of a block explorer, without a trailing slash
    pub block_explorer_url: String,
}

impl Default for ChainSpec {
    fn default() -> Self {
        Self {
            name: "Base".to_owned(),
            id: 8453,
            entry_point_address_v0_6: ENTRY_POINT_ADDRESS_V0_6,
            simple_account_factory_address: SIMPLE_ACCOUNT_FACTORY_ADDRESS,
            block_explorer_url: "https://basescan.org".to_owned(),
        }
    }
}

impl ChainSpec {
    /// Block explorer link for a transaction
    pub fn transaction_url(&self, tx_hash: B256) -> String {
        format!(
            "{}/tx/{tx_hash}",
            self.block_explorer_url.trim_end_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::b256;

    use super::*;

    #[test]
    fn test_transaction_url() {
        let hash = b256!("484add9e4d8c3172d11b5feb6a3cc712280e176d278027cfa02ee396eb28afa1");
        let mut spec = ChainSpec::default();
        assert_eq!(
            spec.transaction_url(hash),
            "https://basescan.org/tx/0x484add9e4d8c3172d11b5feb6a3cc712280e176d278027cfa02ee396eb28afa1"
        );

        spec.block_explorer_url = "https://sepolia.basescan.org/".to_owned();
        assert!(spec
            .transaction_url(hash)
            .starts_with("https://sepolia.basescan.org/tx/0x484a"));
    }

    #[test]
    fn test_partial_spec_uses_defaults() {
        let spec: ChainSpec =
            serde_json::from_str(r#"{"name": "Base Sepolia", "id": 84532}"#).unwrap();
        assert_eq!(spec.id, 84532);
        assert_eq!(spec.entry_point_address_v0_6, ENTRY_POINT_ADDRESS_V0_6);
        assert_eq!(spec.block_explorer_url, "https://basescan.org");
    }
}
