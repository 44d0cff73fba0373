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

use alloy_dyn_abi::{DynSolValue, JsonAbiExt};
use alloy_json_abi::JsonAbi;
use alloy_primitives::{Address, Bytes};

const MINTABLE_NFT_ABI: &str = r#"[
    {
        "inputs": [{ "internalType": "address", "name": "to", "type": "address" }],
        "name": "mintTo",
        "outputs": [],
        "stateMutability": "nonpayable",
        "type": "function"
    }
]"#;

/// Errors encoding a contract call.
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    /// The ABI JSON could not be parsed
    #[error("invalid contract abi: {0}")]
    InvalidAbi(String),
    /// The ABI has no function with the requested name
    #[error("function {0} not found in contract abi")]
    UnknownFunction(String),
    /// No overload of the function takes the given number of arguments
    #[error("function {name} takes {expected} arguments, got {actual}")]
    ArgumentCount {
        /// Function name
        name: String,
        /// Inputs of the first overload
        expected: usize,
        /// Number of arguments supplied
        actual: usize,
    },
    /// The arguments do not match the function's input types
    #[error("invalid arguments for {name}: {reason}")]
    InvalidArguments {
        /// Function name
        name: String,
        /// Encoder message
        reason: String,
    },
    /// The call has no target
    #[error("call target must not be the zero address")]
    ZeroTarget,
}

/// A contract interface that encodes function calls from dynamic values.
#[derive(Clone, Debug)]
pub struct ContractAbi {
    abi: JsonAbi,
}

impl ContractAbi {
    /// Parse a contract ABI from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, EncodingError> {
        let abi =
            JsonAbi::from_json_str(json).map_err(|e| EncodingError::InvalidAbi(e.to_string()))?;
        Ok(Self { abi })
    }

    /// The ABI of an NFT contract with `mintTo(address)`.
    pub fn mintable_nft() -> Result<Self, EncodingError> {
        Self::from_json(MINTABLE_NFT_ABI)
    }

    /// Encode a call to `function` with `args`: selector followed by the ABI
    /// encoded arguments. Overloads are resolved by argument count.
    pub fn encode_call(
        &self,
        function: &str,
        args: &[DynSolValue],
    ) -> Result<Bytes, EncodingError> {
        let overloads = self
            .abi
            .function(function)
            .filter(|overloads| !overloads.is_empty())
            .ok_or_else(|| EncodingError::UnknownFunction(function.to_string()))?;

        let func = overloads
            .iter()
            .find(|f| f.inputs.len() == args.len())
            .ok_or_else(|| EncodingError::ArgumentCount {
                name: function.to_string(),
                expected: overloads[0].inputs.len(),
                actual: args.len(),
            })?;

        func.abi_encode_input(args)
            .map(Into::into)
            .map_err(|e| EncodingError::InvalidArguments {
                name: function.to_string(),
                reason: e.to_string(),
            })
    }

    /// Encode `mintTo(to)`.
    pub fn encode_mint_to(&self, to: Address) -> Result<Bytes, EncodingError> {
        self.encode_call("mintTo", &[DynSolValue::Address(to)])
    }
}
