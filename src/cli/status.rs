//! `status` and `lint` commands.

use anyhow::{bail, Result};
use clap::Args;

use crate::config::ProjectLayout;
use crate::render::{render_issues, render_status, render_status_json};
use crate::status::project_status;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print the full status as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(layout: &ProjectLayout, args: StatusArgs) -> Result<()> {
    let status = project_status(layout);
    if args.json {
        println!("{}", render_status_json(&status)?);
    } else {
        print!("{}", render_status(&status));
    }
    Ok(())
}

pub fn lint(layout: &ProjectLayout) -> Result<()> {
    let status = project_status(layout);
    if status.issues.is_empty() {
        println!("No issues found.");
        return Ok(());
    }
    print!("{}", render_issues(&status.issues));
    bail!("{} issue(s) found", status.issues.len())
}
