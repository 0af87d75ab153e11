//! `diploma show` — Apply a batch, then print a credential.

use clap::Args;
use std::path::PathBuf;

use diploma_core::{Address, CredentialId};

use crate::batch;
use crate::commands::apply::deploy_and_run;
use crate::config::DiplomaConfig;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Path to the batch file (JSON array of calls).
    #[arg(short, long)]
    pub batch: PathBuf,

    /// Credential ID to display.
    #[arg(long, conflicts_with = "holder", required_unless_present = "holder")]
    pub credential: Option<CredentialId>,

    /// Display the credential held by this address instead.
    #[arg(long)]
    pub holder: Option<Address>,

    /// Print the record as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &ShowArgs, config: &DiplomaConfig) -> anyhow::Result<()> {
    let calls = batch::load(&args.batch)?;
    let (registry, _) = deploy_and_run(config, &calls)?;

    let id = match (args.credential, args.holder) {
        (Some(id), _) => id,
        (None, Some(holder)) => registry.get_holder_credential(&holder)?,
        (None, None) => anyhow::bail!("either --credential or --holder is required"),
    };

    let record = registry.get_record(id)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("Credential {}", record);
    println!("  Owner:     {}", record.owner);
    println!("  Issuer:    {}", record.issuer);
    println!("  Verified:  {}", record.verified);
    println!("  URI:       {}", record.metadata_uri);
    println!("  Issued at: {}", record.issued_at.to_rfc3339());

    Ok(())
}
