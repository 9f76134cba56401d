//! User commands, including subscription assignment.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};

use dramadesk_core::{
    ActivityStatus, Fetched, ResourceAccessor, SubscriptionPackage, User, UserDraft, UserPatch,
};

use super::{DeleteArgs, GetArgs, ListArgs, parse_id, saved};
use crate::config::storage;
use crate::output;

#[derive(Args, Debug)]
pub struct UsersCommand {
    #[command(subcommand)]
    pub command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum UsersSubcommand {
    /// List users with their subscription package, newest first
    List(ListArgs),

    /// Fetch a single user
    Get(GetArgs),

    /// Register a user
    Create(CreateArgs),

    /// Change profile fields of a user
    Update(UpdateArgs),

    /// Remove a user
    Delete(DeleteArgs),

    /// Give a user a subscription package starting now
    AssignSubscription(AssignArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    pub email: String,

    #[arg(long)]
    pub full_name: Option<String>,

    /// active or inactive
    #[arg(long)]
    pub status: Option<ActivityStatus>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// User id
    pub id: String,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub full_name: Option<String>,

    /// active or inactive
    #[arg(long)]
    pub status: Option<ActivityStatus>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct AssignArgs {
    /// User id
    pub user: String,

    /// Subscription package id
    pub package: String,

    /// Override the package's duration
    #[arg(long)]
    pub days: Option<u32>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn handle(cmd: UsersCommand) -> Result<()> {
    let settings = storage::load_settings()?;
    let users = settings.resource::<User>()?;

    match cmd.command {
        UsersSubcommand::List(args) => super::list(&users, &args).await,
        UsersSubcommand::Get(args) => super::get(&users, &args).await,
        UsersSubcommand::Delete(args) => super::delete(&users, &args).await,
        UsersSubcommand::Create(args) => {
            let draft = UserDraft {
                email: args.email,
                full_name: args.full_name,
                status: args.status,
            };
            let user = users.create(&draft).await.context("Failed to create user")?;
            saved(&user, "Created", args.pretty)
        }
        UsersSubcommand::Update(args) => {
            let id = parse_id(&args.id)?;
            let patch = UserPatch {
                email: args.email,
                full_name: args.full_name,
                status: args.status,
                ..Default::default()
            };
            if patch.is_empty() {
                bail!("Nothing to update. Pass at least one field to change.");
            }
            let user = users
                .update(&id, &patch)
                .await
                .with_context(|| format!("Failed to update user '{}'", id))?;
            saved(&user, "Updated", args.pretty)
        }
        UsersSubcommand::AssignSubscription(args) => {
            let user_id = parse_id(&args.user)?;
            let package_id = parse_id(&args.package)?;

            let days = match args.days {
                Some(days) => days,
                None => {
                    let packages = settings.resource::<SubscriptionPackage>()?;
                    match packages
                        .get_by_id(&package_id)
                        .await
                        .context("Failed to look up package")?
                    {
                        Fetched::Found(package) => package.duration_days,
                        Fetched::NotFound => bail!("Package '{}' not found", package_id),
                    }
                }
            };

            let user = users
                .update_user_subscription(&user_id, &package_id, days)
                .await
                .with_context(|| format!("Failed to assign subscription to '{}'", user_id))?;

            output::record(&user, args.pretty)?;
            if let Some(end) = user.subscription_end {
                output::field("Subscribed until", &end.to_rfc3339());
            }
            output::success(&format!(
                "Assigned package '{}' to user '{}' for {} day(s)",
                package_id, user_id, days
            ));
            Ok(())
        }
    }
}
