use anyhow::Result;

use crate::cli::ConfigArgs;
use crate::release::layout;

pub fn run(args: &ConfigArgs) -> Result<()> {
    let config = super::common::load_config(args)?;

    log::info!("[info] Release targets ({}):", config.targets.len());
    for t in &config.targets {
        let staging = layout::staging_dir(&config, t);
        let archive = layout::archive_path(&staging, &config.archive_suffix);
        println!("{:<16} {:<40} {}", t.to_string(), staging.display(), archive.display());
    }
    Ok(())
}
