//! `diploma init` — Write a default configuration file.

use clap::Args;

use crate::config::DiplomaConfig;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file.
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InitArgs, config_path: &std::path::Path) -> anyhow::Result<()> {
    if config_path.exists() && !args.force {
        anyhow::bail!(
            "configuration file already exists at {} (use --force to overwrite)",
            config_path.display()
        );
    }

    DiplomaConfig::default().save(config_path)?;
    tracing::info!(path = %config_path.display(), "wrote default config");
    println!("Initialized Diploma configuration at {}", config_path.display());
    println!("Set [deployment].admin to the address that accredits issuers.");

    Ok(())
}
