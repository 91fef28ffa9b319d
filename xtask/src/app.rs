use anyhow::Result;

pub fn run(cli: crate::cli::Cli) -> Result<()> {
    crate::logger::init(crate::logger::level_for(cli.verbose, cli.quiet));

    match cli.cmd {
        crate::cli::Cmd::Release {
            config,
            on_build_failure,
            report,
            flags,
        } => crate::tasks::release::build::run(&config, on_build_failure, report, flags),
        crate::cli::Cmd::Matrix { config } => crate::tasks::release::matrix::run(&config),
        crate::cli::Cmd::Doctor { config } => crate::tasks::tooling::doctor::run(&config),
        crate::cli::Cmd::Clean { config } => crate::tasks::tooling::clean::run(&config),
    }
}
