//! # Config Commands
//!
//! Commands for retrieving bridge configuration.

use tracing::debug;

use crate::state::BridgeConfig;

/// Gets the current bridge configuration.
///
/// ## When Used
/// - UI startup (currency symbol, API URL shown in settings)
/// - Deciding whether balances can go negative
pub fn get_config(config: &BridgeConfig) -> BridgeConfig {
    debug!("get_config command");
    config.clone()
}
