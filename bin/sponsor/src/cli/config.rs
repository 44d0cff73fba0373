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

use alloy_primitives::Address;
use secrecy::SecretString;
use sponsor_account::IterationPolicy;
use sponsor_signer::{construct_owner_signer, PrivateKeySigner};
use sponsor_types::chain::ChainSpec;
use url::Url;

use super::{chain_spec, SponsorArgs};

/// Errors in the tool's configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required value was not provided
    #[error("missing required value {0}")]
    Missing(String),
    /// The RPC URL is not usable
    #[error("invalid rpc url: {0}")]
    InvalidUrl(String),
    /// An owner key is malformed
    #[error("invalid owner key in {name}: {source}")]
    InvalidKey {
        /// Variable holding the key
        name: String,
        /// Parsing error, never containing key material
        source: sponsor_signer::Error,
    },
    /// No owner key variables are configured
    #[error("no owner keys configured")]
    NoOwnerKeys,
    /// Two variables hold the same owner key
    #[error("{first} and {second} hold the same owner key")]
    DuplicateKey {
        /// First variable holding the key
        first: String,
        /// Later variable holding the key
        second: String,
    },
    /// The chain spec could not be resolved
    #[error("invalid chain spec: {0}")]
    ChainSpec(String),
    /// Any other out of range value
    #[error("invalid {name}: {reason}")]
    Invalid {
        /// Setting name
        name: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },
}

/// Validated configuration for a run
pub struct SponsorConfig {
    pub rpc_url: Url,
    /// Owner signers, in the order of their variables
    pub owners: Vec<PrivateKeySigner>,
    pub chain_spec: ChainSpec,
    pub contract_address: Address,
    pub sponsorship_policy_id: Option<String>,
    pub rpc_timeout: Duration,
    pub receipt_timeout: Duration,
    pub receipt_poll_interval: Duration,
    pub policy: IterationPolicy,
    pub fail_on_error: bool,
}

/// Validate the arguments and read owner keys through `lookup`.
///
/// Never touches the network.
pub fn load_config<F>(args: &SponsorArgs, lookup: F) -> Result<SponsorConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let rpc_url = parse_rpc_url(args.rpc_url.as_deref())?;
    let owners = load_owners(&args.owner_key_vars, lookup)?;
    let chain_spec = chain_spec::resolve_chain_spec(&args.network, &args.chain_spec)?;

    if args.contract_address.is_zero() {
        return Err(ConfigError::Invalid {
            name: "contract_address",
            reason: "must not be the zero address",
        });
    }
    if args.rpc_timeout_seconds == 0 {
        return Err(ConfigError::Invalid {
            name: "rpc_timeout_seconds",
            reason: "must be positive",
        });
    }
    if args.receipt_poll_interval_millis == 0 {
        return Err(ConfigError::Invalid {
            name: "receipt_poll_interval_millis",
            reason: "must be positive",
        });
    }
    if args.max_concurrency == 0 {
        return Err(ConfigError::Invalid {
            name: "max_concurrency",
            reason: "must be positive",
        });
    }

    Ok(SponsorConfig {
        rpc_url,
        owners,
        chain_spec,
        contract_address: args.contract_address,
        sponsorship_policy_id: args
            .sponsorship_policy_id
            .clone()
            .filter(|id| !id.is_empty()),
        rpc_timeout: Duration::from_secs(args.rpc_timeout_seconds),
        receipt_timeout: Duration::from_secs(args.receipt_timeout_seconds),
        receipt_poll_interval: Duration::from_millis(args.receipt_poll_interval_millis),
        policy: IterationPolicy::with_max_in_flight(args.max_concurrency),
        fail_on_error: args.fail_on_error,
    })
}

fn parse_rpc_url(rpc_url: Option<&str>) -> Result<Url, ConfigError> {
    let rpc_url = rpc_url
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ConfigError::Missing("PAYMASTER_RPC_URL".to_string()))?;
    // the url may carry an api key, keep it out of error messages
    let url = Url::parse(rpc_url).map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigError::InvalidUrl(format!(
            "unsupported scheme {scheme}"
        ))),
    }
}

fn load_owners<F>(key_vars: &[String], lookup: F) -> Result<Vec<PrivateKeySigner>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let key_vars: Vec<&str> = key_vars
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .collect();
    if key_vars.is_empty() {
        return Err(ConfigError::NoOwnerKeys);
    }

    let mut owners: Vec<(&str, PrivateKeySigner)> = Vec::with_capacity(key_vars.len());
    for name in key_vars {
        let secret = lookup(name)
            .filter(|value| !value.trim().is_empty())
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::Missing(name.to_string()))?;
        let signer = construct_owner_signer(&secret).map_err(|source| ConfigError::InvalidKey {
            name: name.to_string(),
            source,
        })?;

        if let Some((first, _)) = owners
            .iter()
            .find(|(_, other)| other.address() == signer.address())
        {
            return Err(ConfigError::DuplicateKey {
                first: first.to_string(),
                second: name.to_string(),
            });
        }
        owners.push((name, signer));
    }

    Ok(owners.into_iter().map(|(_, signer)| signer).collect())
}
