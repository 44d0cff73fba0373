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

use std::time::Duration;

use alloy_provider::{Provider as AlloyProvider, ProviderBuilder};
use alloy_rpc_client::{ClientBuilder, RpcClient};
use alloy_transport::layers::{RetryBackoffLayer, RetryBackoffService};
use alloy_transport_http::Http;
use anyhow::Context;
use reqwest::Client;
use url::Url;

pub(crate) mod bundler;
pub(crate) mod chain;
pub(crate) mod paymaster;
#[cfg(test)]
mod test_server;

/// Transport stack shared by every client: HTTP with a request timeout,
/// retrying on rate limits
pub type SponsorTransport = RetryBackoffService<Http<Client>>;

/// Create a new JSON-RPC client for `rpc_url`
///
/// Each request fails with a transport error after `timeout`.
pub fn new_rpc_client(
    rpc_url: &str,
    timeout: Duration,
) -> anyhow::Result<RpcClient<SponsorTransport>> {
    let url = Url::parse(rpc_url).context("invalid rpc url")?;
    let http_client = Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to build http client")?;
    let retry_layer = RetryBackoffLayer::new(10, 500, 1_000_000);
    let client = ClientBuilder::default()
        .layer(retry_layer)
        .transport(Http::with_client(http_client, url), false);
    Ok(client)
}

/// Create a new alloy provider from a given RPC URL
pub fn new_alloy_provider(
    rpc_url: &str,
    timeout: Duration,
) -> anyhow::Result<impl AlloyProvider<SponsorTransport> + Clone> {
    let client = new_rpc_client(rpc_url, timeout)?;
    Ok(ProviderBuilder::new().on_client(client))
}
