//! Subcommand implementations.
//!
//! Each resource gets its own subcommand group; the list/get/delete flow is
//! shared across them and works over any [`ResourceAccessor`].

pub mod config;
pub mod movies;
pub mod packages;
pub mod users;
pub mod videos;

use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;

use dramadesk_core::{Fetched, ListOrder, Resource, ResourceAccessor, ResourceId};

use crate::output;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Column to sort by (defaults to the creation time)
    #[arg(long)]
    pub order_by: Option<String>,

    /// Sort ascending instead of newest first
    #[arg(long)]
    pub ascending: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl ListArgs {
    /// The requested ordering, or `None` to use the accessor's default.
    fn order(&self, default: ListOrder) -> Option<ListOrder> {
        if self.order_by.is_none() && !self.ascending {
            return None;
        }
        Some(ListOrder {
            column: self.order_by.clone().unwrap_or(default.column),
            ascending: self.ascending,
        })
    }
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Record id
    pub id: String,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Record id
    pub id: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'f')]
    pub force: bool,
}

/// Collection name served by an accessor, for messages.
fn kind<A: ResourceAccessor>() -> &'static str {
    <A::Resource as Resource>::KIND
}

pub fn parse_id(s: &str) -> Result<ResourceId> {
    ResourceId::new(s).context("Invalid id")
}

/// Print every record, one JSON document per line.
pub async fn list<A: ResourceAccessor>(accessor: &A, args: &ListArgs) -> Result<()> {
    let order = args.order(accessor.default_order());
    let records = accessor
        .list(order.as_ref())
        .await
        .with_context(|| format!("Failed to list {}", kind::<A>()))?;

    if records.is_empty() {
        eprintln!("{}", format!("No {} found.", kind::<A>()).dimmed());
        return Ok(());
    }

    for record in &records {
        output::record(record, args.pretty)?;
    }
    output::note(&format!("{} record(s)", records.len()));

    Ok(())
}

/// Print a single record, failing when it does not exist.
pub async fn get<A: ResourceAccessor>(accessor: &A, args: &GetArgs) -> Result<()> {
    let id = parse_id(&args.id)?;

    match accessor
        .get_by_id(&id)
        .await
        .with_context(|| format!("Failed to get {} '{}'", kind::<A>(), id))?
    {
        Fetched::Found(record) => output::record(&record, args.pretty),
        Fetched::NotFound => bail!("{} '{}' not found", kind::<A>(), id),
    }
}

/// Delete a record after confirmation.
pub async fn delete<A: ResourceAccessor>(accessor: &A, args: &DeleteArgs) -> Result<()> {
    let id = parse_id(&args.id)?;

    if !args.force && !confirm(&format!("This will delete {} '{}'.", kind::<A>(), id))? {
        eprintln!("Aborted.");
        return Ok(());
    }

    accessor
        .delete(&id)
        .await
        .with_context(|| format!("Failed to delete {} '{}'", kind::<A>(), id))?;

    output::success(&format!("Deleted {} '{}'", kind::<A>(), id));
    Ok(())
}

/// Ask a yes/no question on stderr. Anything but `y` declines.
pub fn confirm(prompt: &str) -> Result<bool> {
    eprint!("{} Continue? [y/N] ", prompt);
    io::stderr().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Print a created or updated record followed by a confirmation line.
pub fn saved<R: Resource>(record: &R, verb: &str, pretty: bool) -> Result<()> {
    output::record(record, pretty)?;
    output::success(&format!("{} {} '{}'", verb, R::KIND, record.id()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(order_by: Option<&str>, ascending: bool) -> ListArgs {
        ListArgs {
            order_by: order_by.map(String::from),
            ascending,
            pretty: false,
        }
    }

    #[test]
    fn default_order_is_left_to_accessor() {
        assert_eq!(args(None, false).order(ListOrder::newest_first()), None);
    }

    #[test]
    fn ascending_flips_default_column() {
        let order = args(None, true).order(ListOrder::newest_first()).unwrap();
        assert_eq!(order, ListOrder::ascending("created_at"));
    }

    #[test]
    fn explicit_column_sorts_descending() {
        let order = args(Some("title"), false)
            .order(ListOrder::newest_first())
            .unwrap();
        assert_eq!(order, ListOrder::descending("title"));
    }
}
