//! Drama video commands against the video management API.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};

use dramadesk_core::{
    ActivityStatus, ContentType, DramaVideoDraft, DramaVideoPatch, Fetched, ResourceAccessor,
};
use dramadesk_http::Thumbnail;

use super::{DeleteArgs, GetArgs, ListArgs, parse_id, saved};
use crate::config::storage;
use crate::output;

#[derive(Args, Debug)]
pub struct VideosCommand {
    #[command(subcommand)]
    pub command: VideosSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum VideosSubcommand {
    /// List drama videos, newest first
    List(ListArgs),

    /// Fetch a single video
    Get(GetArgs),

    /// Register a video
    Create(CreateArgs),

    /// Change attributes of a video
    Update(UpdateArgs),

    /// Remove a video
    Delete(DeleteArgs),

    /// Activate or deactivate a video
    ToggleStatus(ToggleArgs),

    /// Request an upload URL for a video file
    UploadUrl(UploadUrlArgs),

    /// Upload a thumbnail image for a video
    Thumbnail(ThumbnailArgs),
}

#[derive(Args, Debug)]
pub struct VideoFields {
    #[arg(long)]
    pub description: Option<String>,

    /// drama or movie
    #[arg(long)]
    pub content_type: Option<ContentType>,

    #[arg(long)]
    pub thumbnail_url: Option<String>,

    #[arg(long)]
    pub video_url: Option<String>,

    #[arg(long)]
    pub episode_number: Option<u32>,

    /// Duration in seconds
    #[arg(long)]
    pub duration: Option<u32>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Video title
    pub title: String,

    /// active or inactive
    #[arg(long)]
    pub status: Option<ActivityStatus>,

    #[command(flatten)]
    pub fields: VideoFields,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Video id
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[command(flatten)]
    pub fields: VideoFields,
}

#[derive(Args, Debug)]
pub struct ToggleArgs {
    /// Video id
    pub id: String,

    /// Target status (defaults to the opposite of the current one)
    #[arg(long)]
    pub status: Option<ActivityStatus>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct UploadUrlArgs {
    /// Name of the file to upload
    #[arg(long)]
    pub file_name: String,

    /// MIME type of the file
    #[arg(long, default_value = "video/mp4")]
    pub content_type: String,
}

#[derive(Args, Debug)]
pub struct ThumbnailArgs {
    /// Video id
    pub id: String,

    /// Image file to upload
    pub path: PathBuf,
}

pub async fn handle(cmd: VideosCommand) -> Result<()> {
    let videos = storage::load_settings()?.videos()?;

    match cmd.command {
        VideosSubcommand::List(args) => super::list(&videos, &args).await,
        VideosSubcommand::Get(args) => super::get(&videos, &args).await,
        VideosSubcommand::Delete(args) => super::delete(&videos, &args).await,
        VideosSubcommand::Create(args) => {
            let f = args.fields;
            let draft = DramaVideoDraft {
                title: args.title,
                description: f.description,
                status: args.status,
                content_type: f.content_type,
                thumbnail_url: f.thumbnail_url,
                video_url: f.video_url,
                episode_number: f.episode_number,
                duration: f.duration,
            };
            let video = videos
                .create(&draft)
                .await
                .context("Failed to create video")?;
            saved(&video, "Created", f.pretty)
        }
        VideosSubcommand::Update(args) => {
            let id = parse_id(&args.id)?;
            let f = args.fields;
            let patch = DramaVideoPatch {
                title: args.title,
                description: f.description,
                content_type: f.content_type,
                thumbnail_url: f.thumbnail_url,
                video_url: f.video_url,
                episode_number: f.episode_number,
                duration: f.duration,
            };
            if patch.is_empty() {
                bail!("Nothing to update. Pass at least one field to change.");
            }
            let video = videos
                .update(&id, &patch)
                .await
                .with_context(|| format!("Failed to update video '{}'", id))?;
            saved(&video, "Updated", f.pretty)
        }
        VideosSubcommand::ToggleStatus(args) => {
            let id = parse_id(&args.id)?;
            let status = match args.status {
                Some(status) => status,
                None => match videos
                    .get_by_id(&id)
                    .await
                    .context("Failed to fetch video")?
                {
                    Fetched::Found(video) => video.status.toggled(),
                    Fetched::NotFound => bail!("Video '{}' not found", id),
                },
            };
            let video = videos
                .toggle_status(&id, status)
                .await
                .with_context(|| format!("Failed to change status of video '{}'", id))?;
            output::record(&video, args.pretty)?;
            output::success(&format!("Video '{}' is now {}", id, video.status));
            Ok(())
        }
        VideosSubcommand::UploadUrl(args) => {
            let target = videos
                .generate_upload_url(&args.file_name, &args.content_type)
                .await
                .context("Failed to generate upload URL")?;
            output::json_pretty(&target)
        }
        VideosSubcommand::Thumbnail(args) => {
            let id = parse_id(&args.id)?;
            let thumbnail = Thumbnail::from_path(&args.path)
                .await
                .with_context(|| format!("Failed to read {}", args.path.display()))?;
            let response = videos
                .upload_thumbnail(&id, thumbnail)
                .await
                .context("Failed to upload thumbnail")?;
            output::json_pretty(&response)?;
            output::success(&format!("Uploaded thumbnail for video '{}'", id));
            Ok(())
        }
    }
}
