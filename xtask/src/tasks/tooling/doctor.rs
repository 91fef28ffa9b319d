use anyhow::{bail, Result};

use crate::cli::ConfigArgs;

pub fn run(args: &ConfigArgs) -> Result<()> {
    let config = crate::tasks::release::common::load_config(args)?;

    let mut ok = true;

    for tool in [&config.compiler.program, &config.archiver_program] {
        match which::which(tool) {
            Ok(path) => eprintln!("[OK] {tool} ({})", path.display()),
            Err(_) => {
                eprintln!("[FAIL] missing `{tool}` in PATH");
                ok = false;
            }
        }
    }

    if config.config_template.is_file() {
        eprintln!("[OK] {}", config.config_template.display());
    } else {
        eprintln!(
            "[FAIL] missing config template: {}",
            config.config_template.display()
        );
        ok = false;
    }

    if !ok {
        bail!("doctor checks failed");
    }
    Ok(())
}
