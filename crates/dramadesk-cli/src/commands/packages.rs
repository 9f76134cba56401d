//! Subscription package commands.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};

use dramadesk_core::{
    ResourceAccessor, SubscriptionPackage, SubscriptionPackageDraft, SubscriptionPackagePatch,
    SubscriptionTier,
};

use super::{DeleteArgs, GetArgs, ListArgs, parse_id, saved};
use crate::config::storage;

#[derive(Args, Debug)]
pub struct PackagesCommand {
    #[command(subcommand)]
    pub command: PackagesSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PackagesSubcommand {
    /// List subscription packages, newest first
    List(ListArgs),

    /// Fetch a single package
    Get(GetArgs),

    /// Define a new package
    Create(CreateArgs),

    /// Change fields of a package
    Update(UpdateArgs),

    /// Remove a package
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Package name
    pub name: String,

    /// Free, Basic or Premium
    #[arg(long, default_value = "Free")]
    pub tier: SubscriptionTier,

    #[arg(long, default_value_t = 0.0)]
    pub price: f64,

    /// Length of the subscription in days
    #[arg(long)]
    pub duration_days: u32,

    #[arg(long)]
    pub description: Option<String>,

    /// Feature included in the package (repeatable)
    #[arg(long = "feature")]
    pub features: Vec<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Package id
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub tier: Option<SubscriptionTier>,

    #[arg(long)]
    pub price: Option<f64>,

    #[arg(long)]
    pub duration_days: Option<u32>,

    #[arg(long)]
    pub description: Option<String>,

    /// Replace the feature list (repeatable)
    #[arg(long = "feature", conflicts_with = "clear_features")]
    pub features: Vec<String>,

    /// Remove every feature
    #[arg(long)]
    pub clear_features: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl UpdateArgs {
    fn patch(&self) -> SubscriptionPackagePatch {
        let features = if self.clear_features {
            Some(Vec::new())
        } else if self.features.is_empty() {
            None
        } else {
            Some(self.features.clone())
        };

        SubscriptionPackagePatch {
            name: self.name.clone(),
            tier: self.tier,
            price: self.price,
            duration_days: self.duration_days,
            description: self.description.clone(),
            features,
        }
    }
}

pub async fn handle(cmd: PackagesCommand) -> Result<()> {
    let packages = storage::load_settings()?.resource::<SubscriptionPackage>()?;

    match cmd.command {
        PackagesSubcommand::List(args) => super::list(&packages, &args).await,
        PackagesSubcommand::Get(args) => super::get(&packages, &args).await,
        PackagesSubcommand::Delete(args) => super::delete(&packages, &args).await,
        PackagesSubcommand::Create(args) => {
            if args.price < 0.0 {
                bail!("Price cannot be negative");
            }
            let draft = SubscriptionPackageDraft {
                name: args.name,
                tier: args.tier,
                price: args.price,
                duration_days: args.duration_days,
                description: args.description,
                features: args.features,
            };
            let package = packages
                .create(&draft)
                .await
                .context("Failed to create package")?;
            saved(&package, "Created", args.pretty)
        }
        PackagesSubcommand::Update(args) => {
            let id = parse_id(&args.id)?;
            let patch = args.patch();
            if patch.is_empty() {
                bail!("Nothing to update. Pass at least one field to change.");
            }
            let package = packages
                .update(&id, &patch)
                .await
                .with_context(|| format!("Failed to update package '{}'", id))?;
            saved(&package, "Updated", args.pretty)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(subcommand)]
        command: PackagesSubcommand,
    }

    fn update_patch(argv: &[&str]) -> SubscriptionPackagePatch {
        let argv = ["packages", "update", "p1"].iter().chain(argv);
        match Harness::parse_from(argv).command {
            PackagesSubcommand::Update(args) => args.patch(),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn features_untouched_unless_given() {
        assert!(update_patch(&["--price", "4.5"]).features.is_none());
        assert_eq!(
            update_patch(&["--feature", "HD", "--feature", "4K"]).features,
            Some(vec!["HD".to_string(), "4K".to_string()])
        );
        assert_eq!(update_patch(&["--clear-features"]).features, Some(Vec::new()));
    }

    #[test]
    fn tier_parses_case_insensitively() {
        assert_eq!(
            update_patch(&["--tier", "premium"]).tier,
            Some(SubscriptionTier::Premium)
        );
    }
}
