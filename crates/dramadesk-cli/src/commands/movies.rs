//! Movie commands.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};

use dramadesk_core::{ContentType, Movie, MovieDraft, MoviePatch, ResourceAccessor};

use super::{DeleteArgs, GetArgs, ListArgs, parse_id, saved};
use crate::config::storage;

#[derive(Args, Debug)]
pub struct MoviesCommand {
    #[command(subcommand)]
    pub command: MoviesSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum MoviesSubcommand {
    /// List movies, newest first
    List(ListArgs),

    /// Fetch a single movie
    Get(GetArgs),

    /// Add a movie to the catalogue
    Create(CreateArgs),

    /// Change fields of a movie
    Update(UpdateArgs),

    /// Remove a movie
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct MovieFields {
    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub genre: Option<String>,

    #[arg(long)]
    pub release_year: Option<i32>,

    #[arg(long)]
    pub duration_minutes: Option<u32>,

    #[arg(long)]
    pub thumbnail_url: Option<String>,

    #[arg(long)]
    pub video_url: Option<String>,

    /// drama or movie
    #[arg(long)]
    pub content_type: Option<ContentType>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Movie title
    pub title: String,

    #[command(flatten)]
    pub fields: MovieFields,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Movie id
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[command(flatten)]
    pub fields: MovieFields,
}

pub async fn handle(cmd: MoviesCommand) -> Result<()> {
    let movies = storage::load_settings()?.resource::<Movie>()?;

    match cmd.command {
        MoviesSubcommand::List(args) => super::list(&movies, &args).await,
        MoviesSubcommand::Get(args) => super::get(&movies, &args).await,
        MoviesSubcommand::Delete(args) => super::delete(&movies, &args).await,
        MoviesSubcommand::Create(args) => {
            let f = args.fields;
            let draft = MovieDraft {
                title: args.title,
                description: f.description,
                genre: f.genre,
                release_year: f.release_year,
                duration_minutes: f.duration_minutes,
                thumbnail_url: f.thumbnail_url,
                video_url: f.video_url,
                content_type: f.content_type,
            };
            let movie = movies
                .create(&draft)
                .await
                .context("Failed to create movie")?;
            saved(&movie, "Created", f.pretty)
        }
        MoviesSubcommand::Update(args) => {
            let id = parse_id(&args.id)?;
            let f = args.fields;
            let patch = MoviePatch {
                title: args.title,
                description: f.description,
                genre: f.genre,
                release_year: f.release_year,
                duration_minutes: f.duration_minutes,
                thumbnail_url: f.thumbnail_url,
                video_url: f.video_url,
                content_type: f.content_type,
            };
            if patch.is_empty() {
                bail!("Nothing to update. Pass at least one field to change.");
            }
            let movie = movies
                .update(&id, &patch)
                .await
                .with_context(|| format!("Failed to update movie '{}'", id))?;
            saved(&movie, "Updated", f.pretty)
        }
    }
}
