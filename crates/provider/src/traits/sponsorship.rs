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

#[cfg(feature = "test-utils")]
use mockall::automock;
use sponsor_types::{SponsorshipData, SponsorshipRequest};

use super::ProviderResult;

/// A service that pays for user operations
#[cfg_attr(feature = "test-utils", automock)]
#[async_trait::async_trait]
pub trait SponsorshipProvider: Send + Sync + 'static {
    /// Request sponsorship for an unsigned user operation
    async fn sponsor_user_operation(
        &self,
        request: SponsorshipRequest,
    ) -> ProviderResult<SponsorshipData>;
}
