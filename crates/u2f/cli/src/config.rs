use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use nexum_u2f::{DeviceConfig, Provisioning};

/// Name of the config file looked up inside the store directory
pub(crate) const CONFIG_FILE: &str = "u2f.toml";

/// Path of the config file: the explicit one, or `u2f.toml` next to the objects
pub(crate) fn config_path(store: &Path, explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(|| store.join(CONFIG_FILE), Path::to_path_buf)
}

/// Load the device configuration, then overlay command-line flags.
///
/// A missing file yields the defaults.
pub(crate) fn load_config(path: &Path, unlock_provisioning: bool) -> eyre::Result<DeviceConfig> {
    let config: DeviceConfig = Figment::from(Serialized::defaults(DeviceConfig::default()))
        .merge(Toml::file(path))
        .extract()?;

    Ok(if unlock_provisioning {
        config.with_provisioning(Provisioning::Unlocked)
    } else {
        config
    })
}
