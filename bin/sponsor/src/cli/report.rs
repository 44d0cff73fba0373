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

//! Console lines for the outcome of each account, separate from the logs.

use std::io::{self, Write};

use sponsor_types::{chain::ChainSpec, Outcome, TransactionRecord};

/// Write one block per record: successes to `out`, failures to `err`
pub fn write_records<O: Write, E: Write>(
    records: &[TransactionRecord],
    chain_spec: &ChainSpec,
    out: &mut O,
    err: &mut E,
) -> io::Result<()> {
    for record in records {
        match &record.outcome {
            Outcome::Success { tx_hash, .. } => {
                writeln!(
                    out,
                    "Sponsored transaction from: {}",
                    record.context_address()
                )?;
                writeln!(out, "View: {}", chain_spec.transaction_url(*tx_hash))?;
            }
            Outcome::Failed { error } => {
                writeln!(
                    err,
                    "Transaction failed for {}: {error}",
                    record.context_address()
                )?;
            }
        }
    }
    out.flush()?;
    err.flush()
}
