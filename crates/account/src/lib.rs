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

#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]
#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]
//! Smart account initialization and sponsored user operation submission.

mod account;
pub use account::{AccountSettings, SimpleSmartAccount, SmartAccount};

mod error;
pub use error::{AccountInitError, SubmissionError, SubmitError};

mod flow;
pub use flow::{run_flow, FlowSettings, IterationPolicy};

mod submitter;
pub use submitter::{SentTransaction, Submitter, SubmitterSettings};

#[cfg(test)]
mod test_utils;
