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

mod bundler;
pub use bundler::BundlerProvider;
#[cfg(feature = "test-utils")]
pub use bundler::MockBundlerProvider;

mod chain;
pub use chain::ChainProvider;
#[cfg(feature = "test-utils")]
pub use chain::MockChainProvider;

mod error;
pub use error::{ProviderError, ProviderResult};

mod sponsorship;
pub use sponsorship::SponsorshipProvider;
#[cfg(feature = "test-utils")]
pub use sponsorship::MockSponsorshipProvider;
