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

/// Signer errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The owner key is malformed
    #[error("invalid private key: {0}")]
    InvalidKey(String),
    /// Signing error
    #[error("signing error: {0}")]
    SigningError(String),
}

/// Signer result
pub type Result<T> = std::result::Result<T, Error>;

impl From<alloy_signer::Error> for Error {
    fn from(value: alloy_signer::Error) -> Self {
        Error::SigningError(value.to_string())
    }
}
