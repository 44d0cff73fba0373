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

//! Bindings for the v0.6 entry point and the reference simple account contracts.

use alloy_sol_macro::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface IEntryPoint {
        error FailedOp(uint256 opIndex, string reason);

        error SenderAddressResult(address sender);

        function getSenderAddress(bytes calldata initCode) external;

        function getNonce(address sender, uint192 key) external view returns (uint256 nonce);
    }

    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    interface SimpleAccountFactory {
        function createAccount(address owner, uint256 salt) external returns (address ret);
    }

    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    interface SimpleAccount {
        function execute(address dest, uint256 value, bytes calldata func) external;
    }
}
