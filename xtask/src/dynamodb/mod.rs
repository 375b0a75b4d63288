//! DynamoDB infrastructure management commands.

mod client;
mod config;
mod deploy;
mod error;
mod planning;

pub use error::{DynamodbError, Result};

use crate::prelude::*;
use dialoguer::Confirm;
use opinions_core::storage::{keys, TableNames};

/// DynamoDB infrastructure management commands.
#[derive(Debug, clap::Parser)]
pub struct DynamodbCommand {
    #[command(subcommand)]
    pub action: DynamodbAction,
}

/// Available DynamoDB actions.
#[derive(Debug, clap::Subcommand)]
pub enum DynamodbAction {
    /// Deploy or destroy DynamoDB table infrastructure.
    Deploy(DeployCommand),
}

/// Deploy or update DynamoDB infrastructure.
#[derive(Debug, clap::Parser)]
#[command(long_about = "Deploy or destroy DynamoDB table infrastructure.

By default, this command creates the opinions, comments and reactions tables
and the comments-by-creation-time Global Secondary Index when they are missing.

The command shows a plan of changes before applying and asks for confirmation.

Environment variables:
  AWS_ENDPOINT_URL    - Use local DynamoDB (e.g., http://localhost:8000)
  AWS_REGION          - AWS region (defaults to us-east-1)
  AWS_PROFILE         - AWS profile to use for credentials")]
pub struct DeployCommand {
    /// Skip confirmation prompts.
    #[arg(long)]
    pub force: bool,

    /// Destroy the tables instead of creating/updating.
    #[arg(long)]
    pub destroy: bool,

    /// Opinions table name.
    #[arg(long, default_value = keys::OPINIONS_TABLE, env = "OPINIONS_TABLE")]
    pub opinions_table: String,

    /// Comments table name.
    #[arg(long, default_value = keys::COMMENTS_TABLE, env = "COMMENTS_TABLE")]
    pub comments_table: String,

    /// Reactions table name.
    #[arg(long, default_value = keys::REACTIONS_TABLE, env = "REACTIONS_TABLE")]
    pub reactions_table: String,

    /// Comments-by-creation-time index name.
    #[arg(long, default_value = keys::COMMENTS_BY_CREATED_INDEX, env = "COMMENTS_INDEX")]
    pub comments_index: String,
}

impl DeployCommand {
    fn table_names(&self) -> TableNames {
        TableNames {
            opinions: self.opinions_table.clone(),
            comments: self.comments_table.clone(),
            reactions: self.reactions_table.clone(),
            comments_by_created: self.comments_index.clone(),
        }
    }
}

/// Main entry point for dynamodb command.
pub async fn run(command: DynamodbCommand, global: crate::Global) -> Result<()> {
    match command.action {
        DynamodbAction::Deploy(deploy_cmd) => run_deploy(deploy_cmd, &global).await,
    }
}

async fn run_deploy(cmd: DeployCommand, global: &crate::Global) -> Result<()> {
    let aws_config = client::AwsConfig::default();

    if !global.is_silent() {
        aprintln!("{} {}", p_b("Target:"), aws_config.target_display());
        aprintln!();
    }

    let dynamo_client = client::create_client(&aws_config).await;
    let table_configs = config::opinion_table_configs(&cmd.table_names());

    if cmd.destroy {
        let mut plans = Vec::with_capacity(table_configs.len());
        for table in &table_configs {
            let current = client::get_table_state(&dynamo_client, &table.table_name).await?;
            plans.push(planning::calculate_destroy_plan(
                current.as_ref(),
                &table.table_name,
            ));
        }

        if !global.is_silent() {
            aprintln!("{}", p_y("Destroy Plan:"));
            for plan in &plans {
                print_plan_lines(&planning::format_destroy_plan(plan));
            }
            aprintln!();
        }

        if !plans.iter().any(|plan| plan.has_changes()) {
            if !global.is_silent() {
                aprintln!("{}", p_g("Nothing to destroy."));
            }
            return Ok(());
        }

        confirm(
            &cmd,
            "Are you sure you want to delete these tables? ALL DATA WILL BE LOST",
            false,
        )?;

        if !global.is_silent() {
            aprintln!("{}", p_b("Deleting tables..."));
        }

        for plan in &plans {
            deploy::execute_destroy_plan(&dynamo_client, plan).await?;
        }

        if !global.is_silent() {
            aprintln!("{}", p_g("Tables destroyed successfully."));
        }
    } else {
        let mut plans = Vec::with_capacity(table_configs.len());
        for table in &table_configs {
            let current = client::get_table_state(&dynamo_client, &table.table_name).await?;
            plans.push(planning::calculate_deploy_plan(current.as_ref(), table));
        }

        if !global.is_silent() {
            aprintln!("{}", p_c("Deploy Plan:"));
            for plan in &plans {
                print_plan_lines(&planning::format_deploy_plan(plan));
            }
            aprintln!();
        }

        if !plans.iter().any(|plan| plan.has_changes()) {
            if !global.is_silent() {
                aprintln!("{}", p_g("Infrastructure is up to date."));
            }
            return Ok(());
        }

        confirm(&cmd, "Apply these changes?", true)?;

        if !global.is_silent() {
            aprintln!("{}", p_b("Applying changes..."));
        }

        for plan in &plans {
            deploy::execute_deploy_plan(&dynamo_client, plan).await?;
        }

        if !global.is_silent() {
            aprintln!("{}", p_g("Infrastructure deployed successfully."));
        }
    }

    Ok(())
}

fn confirm(cmd: &DeployCommand, prompt: &str, default: bool) -> Result<()> {
    if cmd.force {
        return Ok(());
    }

    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?;

    if confirmed {
        Ok(())
    } else {
        Err(DynamodbError::UserCancelled)
    }
}
