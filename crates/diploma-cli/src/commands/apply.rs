//! `diploma apply` — Execute a batch of calls against a fresh deployment and
//! print one receipt per call.

use clap::Args;
use std::path::PathBuf;
use tokio::sync::broadcast::error::TryRecvError;

use diploma_core::RegistryEvent;
use diploma_registry::CertificateRegistry;

use crate::batch::{self, Receipt};
use crate::config::DiplomaConfig;

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Path to the batch file (JSON array of calls).
    #[arg(short, long)]
    pub batch: PathBuf,

    /// Print receipts as a pretty JSON array instead of one per line.
    #[arg(long)]
    pub pretty: bool,
}

pub fn run(args: &ApplyArgs, config: &DiplomaConfig) -> anyhow::Result<()> {
    let calls = batch::load(&args.batch)?;
    let (registry, receipts) = deploy_and_run(config, &calls)?;

    if args.pretty {
        println!("{}", serde_json::to_string_pretty(&receipts)?);
    } else {
        for receipt in &receipts {
            println!("{}", serde_json::to_string(receipt)?);
        }
    }

    let failed = receipts.iter().filter(|r| !r.ok).count();
    tracing::info!(
        calls = receipts.len(),
        failed,
        credentials = registry.total_issued(),
        issuers = registry.issuers().len(),
        "batch applied"
    );
    Ok(())
}

/// Deploy a registry from `config`, run `calls`, and log every emitted event.
pub fn deploy_and_run(
    config: &DiplomaConfig,
    calls: &[batch::Call],
) -> anyhow::Result<(CertificateRegistry, Vec<Receipt>)> {
    let registry = CertificateRegistry::deploy(config.deployment.clone());
    let mut events = registry.subscribe();

    let mut receipts = Vec::with_capacity(calls.len());
    for (index, call) in calls.iter().enumerate() {
        receipts.push(batch::execute(&registry, index, call)?);
        drain_events(&mut events);
    }

    Ok((registry, receipts))
}

fn drain_events(events: &mut tokio::sync::broadcast::Receiver<RegistryEvent>) {
    loop {
        match events.try_recv() {
            Ok(event) => tracing::info!(event = event.name(), detail = ?event, "registry event"),
            Err(TryRecvError::Lagged(n)) => {
                tracing::warn!(missed = n, "event receiver lagged");
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
}
