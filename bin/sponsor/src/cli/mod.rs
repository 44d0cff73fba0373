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

use std::{future::Future, io, sync::Arc};

use alloy_primitives::{address, Address, U256};
use anyhow::{bail, Context};
use clap::{builder::PossibleValuesParser, Args, Parser};
use sponsor_account::{run_flow, AccountSettings, FlowSettings, Submitter, SubmitterSettings};
use sponsor_contracts::ContractAbi;
use sponsor_provider::{
    new_alloy_provider, new_rpc_client, AlloyBundlerClient, AlloyChainProvider, ChainProvider,
    PimlicoPaymaster, SponsorTransport,
};

mod chain_spec;
mod config;
mod report;
mod tracing;

use self::config::{load_config, SponsorConfig};

const DEFAULT_CONTRACT_ADDRESS: Address = address!("83bd615eb93eE1336acA53e185b03B54fF4A17e8");

/// Main entry point for the CLI
///
/// Validates the configuration, then mints once from every configured
/// account and reports the outcomes. Stops early on ctrl-c.
pub async fn run() -> anyhow::Result<()> {
    let opt = Cli::parse();
    let _guard = tracing::configure_logging(&opt.logs)?;

    let config = load_config(&opt.sponsor, |name| std::env::var(name).ok())
        .context("invalid configuration")?;
    tracing::info!("Chain spec: {:#?}", config.chain_spec);
    tracing::info!(
        "Minting from {:?} with {} accounts",
        config.contract_address,
        config.owners.len()
    );

    run_until_signal(mint_all(config), tokio::signal::ctrl_c()).await
}

async fn run_until_signal<W, S>(work: W, signal: S) -> anyhow::Result<()>
where
    W: Future<Output = anyhow::Result<()>>,
    S: Future<Output = io::Result<()>>,
{
    tokio::select! {
        res = work => res,
        res = signal => match res {
            Ok(()) => {
                tracing::info!("Received ctrl-c, shutting down");
                Ok(())
            }
            Err(err) => bail!("Error while waiting for ctrl-c: {err:?}"),
        },
    }
}

async fn mint_all(config: SponsorConfig) -> anyhow::Result<()> {
    let SponsorConfig {
        rpc_url,
        owners,
        chain_spec,
        contract_address,
        sponsorship_policy_id,
        rpc_timeout,
        receipt_timeout,
        receipt_poll_interval,
        policy,
        fail_on_error,
    } = config;

    let chain = AlloyChainProvider::<_, SponsorTransport>::new(new_alloy_provider(
        rpc_url.as_str(),
        rpc_timeout,
    )?);
    let client = new_rpc_client(rpc_url.as_str(), rpc_timeout)?;
    let bundler = AlloyBundlerClient::new(client.clone());
    let paymaster = PimlicoPaymaster::new(client);

    let chain_id = chain
        .get_chain_id()
        .await
        .context("failed to get chain id from node")?;
    if chain_id != chain_spec.id {
        bail!(
            "node is on chain {chain_id}, chain spec {} expects {}",
            chain_spec.name,
            chain_spec.id
        );
    }

    let submitter = Submitter::new(
        Arc::new(chain),
        Arc::new(bundler),
        Arc::new(paymaster),
        ContractAbi::mintable_nft()?,
        SubmitterSettings {
            chain_id,
            sponsorship_policy_id,
            receipt_timeout,
            receipt_poll_interval,
            retry_opts: Default::default(),
        },
    );
    let flow_settings = FlowSettings {
        account: AccountSettings {
            entry_point: chain_spec.entry_point_address_v0_6,
            factory: chain_spec.simple_account_factory_address,
            salt: U256::ZERO,
        },
        contract: contract_address,
        policy,
    };

    let records = run_flow(owners, &submitter, &flow_settings).await;
    report::write_records(&records, &chain_spec, &mut io::stdout(), &mut io::stderr())?;

    let failed = records.iter().filter(|r| !r.is_success()).count();
    if fail_on_error && failed > 0 {
        bail!("{failed} of {} accounts failed", records.len());
    }
    Ok(())
}

/// Settings for a run
#[derive(Debug, Args)]
#[command(next_help_heading = "SPONSOR")]
pub struct SponsorArgs {
    /// Node, bundler and paymaster HTTP URL
    #[arg(
        long = "rpc_url",
        name = "rpc_url",
        env = "PAYMASTER_RPC_URL",
        hide_env_values = true
    )]
    rpc_url: Option<String>,

    /// Names of the environment variables holding owner keys, in order
    #[arg(
        long = "owner_key_vars",
        name = "owner_key_vars",
        env = "OWNER_KEY_VARS",
        default_value = "PRIVATE_KEY_1,PRIVATE_KEY_2",
        value_delimiter = ','
    )]
    owner_key_vars: Vec<String>,

    /// Network flag
    #[arg(
        long = "network",
        name = "network",
        env = "NETWORK",
        default_value = "base",
        value_parser = PossibleValuesParser::new(chain_spec::HARDCODED_CHAIN_SPECS)
    )]
    network: String,

    /// Chain spec file path, overrides the network spec
    #[arg(long = "chain_spec", name = "chain_spec", env = "CHAIN_SPEC")]
    chain_spec: Option<String>,

    /// NFT contract to mint from
    #[arg(
        long = "contract_address",
        name = "contract_address",
        env = "CONTRACT_ADDRESS",
        default_value_t = DEFAULT_CONTRACT_ADDRESS
    )]
    contract_address: Address,

    /// Paymaster sponsorship policy id
    #[arg(
        long = "sponsorship_policy_id",
        name = "sponsorship_policy_id",
        env = "SPONSORSHIP_POLICY_ID"
    )]
    sponsorship_policy_id: Option<String>,

    /// Timeout of each RPC request
    #[arg(
        long = "rpc_timeout_seconds",
        name = "rpc_timeout_seconds",
        env = "RPC_TIMEOUT_SECONDS",
        default_value = "10"
    )]
    rpc_timeout_seconds: u64,

    /// How long to wait for a user operation to be included
    #[arg(
        long = "receipt_timeout_seconds",
        name = "receipt_timeout_seconds",
        env = "RECEIPT_TIMEOUT_SECONDS",
        default_value = "60"
    )]
    receipt_timeout_seconds: u64,

    /// Time between receipt queries
    #[arg(
        long = "receipt_poll_interval_millis",
        name = "receipt_poll_interval_millis",
        env = "RECEIPT_POLL_INTERVAL_MILLIS",
        default_value = "1000"
    )]
    receipt_poll_interval_millis: u64,

    /// Number of accounts processed at once, 1 processes them in order
    #[arg(
        long = "max_concurrency",
        name = "max_concurrency",
        env = "MAX_CONCURRENCY",
        default_value = "1"
    )]
    max_concurrency: usize,

    /// Exit with an error if any account failed
    #[arg(long = "fail_on_error", name = "fail_on_error", env = "FAIL_ON_ERROR")]
    fail_on_error: bool,
}

#[derive(Debug, Args)]
#[command(next_help_heading = "LOGGING")]
pub struct LogsArgs {
    /// Log file
    ///
    /// If not provided, logs will be written to stdout
    #[arg(
        long = "log.file",
        name = "log.file",
        env = "LOG_FILE",
        default_value = None
    )]
    file: Option<String>,

    /// Log JSON
    ///
    /// If set, logs will be written in JSON format
    #[arg(
        long = "log.json",
        name = "log.json",
        env = "LOG_JSON",
        required = false,
        num_args = 0
    )]
    json: bool,
}

/// CLI options
#[derive(Debug, Parser)]
#[command(
    name = "sponsor",
    about = "Mint an NFT from each smart account, gas paid by a paymaster"
)]
pub struct Cli {
    #[clap(flatten)]
    sponsor: SponsorArgs,

    #[clap(flatten)]
    logs: LogsArgs,
}

#[cfg(test)]
mod tests {
    use std::future;

    use super::*;

    #[tokio::test]
    async fn test_signal_failure_is_an_error() {
        let signal = async {
            Err::<(), _>(io::Error::new(io::ErrorKind::Other, "no signal handler"))
        };
        let res = run_until_signal(future::pending(), signal).await;
        assert!(res.unwrap_err().to_string().contains("no signal handler"));
    }

    #[tokio::test]
    async fn test_signal_stops_work() {
        let res = run_until_signal(future::pending(), async { Ok::<(), io::Error>(()) }).await;
        assert!(res.is_ok());
    }

    #[tokio::test]
    async fn test_work_result_is_returned() {
        let work = async { Err::<(), _>(anyhow::anyhow!("minting failed")) };
        let res = run_until_signal(work, future::pending()).await;
        assert_eq!(res.unwrap_err().to_string(), "minting failed");
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "sponsor",
            "--rpc_url",
            "http://localhost:8545",
            "--network",
            "base_sepolia",
            "--fail_on_error",
            "--log.json",
        ])
        .unwrap();

        assert_eq!(cli.sponsor.network, "base_sepolia");
        assert!(cli.sponsor.fail_on_error);
        assert!(cli.logs.json);
        assert_eq!(cli.sponsor.contract_address, DEFAULT_CONTRACT_ADDRESS);
        assert_eq!(
            cli.sponsor.owner_key_vars,
            vec!["PRIVATE_KEY_1".to_string(), "PRIVATE_KEY_2".to_string()]
        );
    }

    #[test]
    fn test_unknown_network_rejected() {
        assert!(Cli::try_parse_from(["sponsor", "--network", "ethereum"]).is_err());
    }
}
