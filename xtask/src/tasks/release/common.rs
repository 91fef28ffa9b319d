use anyhow::Result;

use crate::cli::ConfigArgs;
use crate::release::ReleaseConfig;

/// Config file (or defaults) with command-line overrides applied.
pub(crate) fn load_config(args: &ConfigArgs) -> Result<ReleaseConfig> {
    let mut config = ReleaseConfig::resolve(args.config.as_deref())?;
    if let Some(dest) = &args.dest {
        config.dest_root = dest.clone();
    }
    config.validate()?;
    Ok(config)
}
