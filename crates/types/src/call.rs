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

use alloy_primitives::{Address, Bytes, U256};

/// A call made by a smart account
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Call {
    /// Target contract
    pub to: Address,
    /// Encoded function call
    pub data: Bytes,
    /// Native value attached to the call
    pub value: U256,
}
