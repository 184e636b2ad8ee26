//! CLI for the cluster backup and restore client.

mod commands;

use anyhow::{Context, Result};
use cbr_core::client::RestClient;
use cbr_core::config;
use clap::{Parser, Subcommand};

use commands::{run_backup, run_restore};

/// Top-level CLI for the cluster backup and restore client.
#[derive(Debug, Parser)]
#[command(name = "cbr")]
#[command(about = "cbr: cluster backup and restore client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Create, watch and inspect backups.
    #[command(subcommand)]
    Backup(BackupCmd),

    /// Create, watch and inspect restores.
    #[command(subcommand)]
    Restore(RestoreCmd),
}

#[derive(Debug, Subcommand)]
pub enum BackupCmd {
    /// Create a backup under a backup plan.
    Create {
        /// Backup plan: full resource name, or a bare plan id expanded with
        /// the configured default project and location.
        plan: String,

        /// Id of the new backup within the plan.
        backup_id: String,

        /// Free-form description stored on the backup.
        #[arg(long)]
        description: Option<String>,

        /// Label to attach, as KEY=VALUE. Repeatable.
        #[arg(long = "label", value_name = "KEY=VALUE")]
        labels: Vec<String>,

        /// Days the finished backup is retained before automatic deletion.
        #[arg(long, value_name = "DAYS")]
        retain_days: Option<i32>,

        /// Days the backup is protected against manual deletion.
        #[arg(long, value_name = "DAYS")]
        delete_lock_days: Option<i32>,

        /// Block until the create operation finishes.
        #[arg(long)]
        wait: bool,

        /// Cap any wait at SECS seconds of wall-clock time.
        #[arg(long, value_name = "SECS")]
        max_wait: Option<u64>,
    },

    /// Block until the named backups reach a terminal state.
    Wait {
        /// Full backup resource names.
        #[arg(required = true)]
        names: Vec<String>,

        /// Cap the wait at SECS seconds of wall-clock time.
        #[arg(long, value_name = "SECS")]
        max_wait: Option<u64>,
    },

    /// Show the current state of a backup.
    Describe {
        /// Full backup resource name.
        name: String,
    },

    /// Print a short-lived signed URL for downloading the backup's index.
    IndexUrl {
        /// Full backup resource name.
        name: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum RestoreCmd {
    /// Create a restore under a restore plan, from an existing backup.
    Create {
        /// Restore plan: full resource name, or a bare plan id expanded with
        /// the configured default project and location.
        plan: String,

        /// Id of the new restore within the plan.
        restore_id: String,

        /// Backup to restore from (full resource name).
        #[arg(long)]
        backup: String,

        /// Free-form description stored on the restore.
        #[arg(long)]
        description: Option<String>,

        /// Label to attach, as KEY=VALUE. Repeatable.
        #[arg(long = "label", value_name = "KEY=VALUE")]
        labels: Vec<String>,

        /// Block until the create operation finishes.
        #[arg(long)]
        wait: bool,

        /// Cap any wait at SECS seconds of wall-clock time.
        #[arg(long, value_name = "SECS")]
        max_wait: Option<u64>,
    },

    /// Block until the named restores reach a terminal state.
    Wait {
        /// Full restore resource names.
        #[arg(required = true)]
        names: Vec<String>,

        /// Cap the wait at SECS seconds of wall-clock time.
        #[arg(long, value_name = "SECS")]
        max_wait: Option<u64>,
    },

    /// Show the current state of a restore.
    Describe {
        /// Full restore resource name.
        name: String,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init().context("loading configuration")?;
        // Not the whole config: the token must stay out of the log.
        tracing::debug!(
            "config endpoint {}, project {:?}, location {:?}",
            cfg.endpoint,
            cfg.project,
            cfg.location
        );
        let client = RestClient::new(&cfg.endpoint, cfg.resolved_token())
            .with_context(|| format!("building client for {}", cfg.endpoint))?;

        match cli.command {
            CliCommand::Backup(cmd) => run_backup(cmd, &cfg, client).await,
            CliCommand::Restore(cmd) => run_restore(cmd, &cfg, client).await,
        }
    }
}

#[cfg(test)]
mod tests;
