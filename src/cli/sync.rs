//! `sync` command.

use anyhow::Result;
use clap::Args;
use dialoguer::theme::ColorfulTheme;

use crate::config::ProjectLayout;
use crate::render::render_sync_report;
use crate::sync::{sync_journeys, Confirm, SyncOptions};

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Preview changes without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Create missing scenarios without prompting
    #[arg(long)]
    pub auto: bool,
}

/// Terminal yes/no prompt, defaulting to yes.
struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(dialoguer::Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(true)
            .interact()?)
    }
}

pub fn run(layout: &ProjectLayout, args: SyncArgs) -> Result<()> {
    let options = SyncOptions { dry_run: args.dry_run, auto_accept: args.auto };
    let report = sync_journeys(layout, options, &mut TerminalConfirm)?;
    print!("{}", render_sync_report(&report));
    Ok(())
}
