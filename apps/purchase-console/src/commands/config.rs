//! # Config Commands

use tracing::debug;

use crate::state::ConfigState;

/// Gets the console configuration.
///
/// ## When Used
/// - Frontend startup (currency symbol, tax rate label)
/// - Preview rendering
pub fn get_config(config: &ConfigState) -> ConfigState {
    debug!("get_config command");
    config.clone()
}
