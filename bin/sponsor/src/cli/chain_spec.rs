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

use config::{Config, ConfigError as SourceError, Environment, File, FileFormat};
use paste::paste;
use sponsor_types::chain::ChainSpec;

use super::config::ConfigError;

/// Resolve the chain spec from the network flag and a chain spec file
pub fn resolve_chain_spec(network: &str, file: &Option<String>) -> Result<ChainSpec, ConfigError> {
    resolve(network, file).map_err(|e| ConfigError::ChainSpec(e.to_string()))
}

fn resolve(network: &str, file: &Option<String>) -> Result<ChainSpec, SourceError> {
    let network_spec = get_hardcoded_chain_spec(network.to_lowercase().as_str())
        .ok_or_else(|| SourceError::Message(format!("unknown hardcoded network: {network}")))?;

    // get the base config from the hierarchy of
    // - ENV
    // - file
    // - network flag
    let mut base_getter =
        Config::builder().add_source(File::from_str(network_spec, FileFormat::Toml));
    if let Some(file) = &file {
        base_getter = base_getter.add_source(File::with_name(file.as_str()));
    }
    let base_config = base_getter
        .add_source(Environment::with_prefix("CHAIN"))
        .build()?;
    let base = base_config.get::<String>("base").ok();

    // construct the config from the hierarchy of
    // - ENV
    // - file
    // - network flag
    // - base (if defined)
    // - defaults
    let default = serde_json::to_string(&ChainSpec::default())
        .map_err(|e| SourceError::Foreign(Box::new(e)))?;
    let mut config_builder =
        Config::builder().add_source(File::from_str(default.as_str(), FileFormat::Json));

    if let Some(base) = base {
        let base_spec = get_hardcoded_chain_spec(base.as_str())
            .ok_or_else(|| SourceError::Message(format!("unknown base network: {base}")))?;
        config_builder = config_builder.add_source(File::from_str(base_spec, FileFormat::Toml));
    }
    config_builder = config_builder.add_source(File::from_str(network_spec, FileFormat::Toml));
    if let Some(file) = &file {
        config_builder = config_builder.add_source(File::with_name(file.as_str()));
    }
    let c = config_builder
        .add_source(Environment::with_prefix("CHAIN"))
        .build()?;

    match c.get::<u64>("id") {
        Ok(0) => return Err(SourceError::Message("chain id must be non-zero".to_string())),
        Ok(_) => {}
        Err(_) => return Err(SourceError::Message("chain id must be defined".to_string())),
    }

    c.try_deserialize()
}

macro_rules! define_hardcoded_chain_specs {
    ($($network:ident),+) => {
        paste! {
            $(
                const [< $network:upper _SPEC >]: &str = include_str!(concat!("../../chain_specs/", stringify!($network), ".toml"));
            )+

            fn get_hardcoded_chain_spec(network: &str) -> Option<&'static str> {
                match network {
                    $(
                        stringify!($network) => Some([< $network:upper _SPEC >]),
                    )+
                    _ => None,
                }
            }

            pub const HARDCODED_CHAIN_SPECS: &[&'static str] = &[$(stringify!($network),)+];
        }
    };
}

define_hardcoded_chain_specs!(base, base_sepolia);
