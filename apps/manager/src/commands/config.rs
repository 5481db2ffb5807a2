//! # Config Commands

use tracing::debug;

use crate::state::ManagerConfig;

/// Gets the current application configuration.
///
/// ## When Used
/// - Dashboard startup (store name, currency symbol)
/// - Client-side display of thresholds and the shop's UTC offset
pub fn get_config(config: &ManagerConfig) -> ManagerConfig {
    debug!("get_config command");
    config.clone()
}
