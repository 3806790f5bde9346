use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use facebook_wrapper::{FacebookWrapper, WrapperConfig};

#[derive(Parser)]
#[command(name = "fbw", about = "Read and publish on Facebook through the Graph API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Posts from your own timeline
    Timeline {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
        /// Unix timestamp lower bound
        #[arg(long)]
        since: Option<i64>,
        /// Unix timestamp upper bound
        #[arg(long)]
        until: Option<i64>,
        #[arg(long)]
        after: Option<String>,
        #[arg(long)]
        before: Option<String>,
    },
    /// Friend profiles of a user
    Friends {
        #[arg(long, default_value = "me")]
        user: String,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
        #[arg(long)]
        since: Option<i64>,
        #[arg(long)]
        until: Option<i64>,
    },
    /// Friend ids of a user
    FriendIds {
        #[arg(long, default_value = "me")]
        user: String,
    },
    /// Publish a status
    Post {
        message: String,
        #[arg(long, default_value = "me")]
        target: String,
        #[arg(long)]
        link: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        caption: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        picture: Option<String>,
        /// Profile id to tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        place: Option<String>,
        /// Profile id allowed to see the post (repeatable)
        #[arg(long)]
        allow: Vec<String>,
        /// Profile id blocked from the post (repeatable)
        #[arg(long)]
        deny: Vec<String>,
    },
    /// Upload a photo, optionally into an album
    UploadPhoto {
        path: PathBuf,
        #[arg(long, conflicts_with = "album")]
        caption: Option<String>,
        #[arg(long)]
        album: Option<String>,
    },
}

#[derive(Serialize)]
struct Created<'a> {
    id: &'a str,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the JSON results, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = WrapperConfig::from_env()?;
    let facebook = FacebookWrapper::from_config(&config);

    match cli.command {
        Command::Timeline {
            limit,
            offset,
            since,
            until,
            after,
            before,
        } => {
            let page = facebook
                .get_timeline_paged(
                    limit,
                    offset,
                    since,
                    until,
                    after.as_deref(),
                    before.as_deref(),
                )
                .await?;
            info!(count = page.len(), "Fetched timeline");
            print_json(&page)?;
        }
        Command::Friends {
            user,
            limit,
            offset,
            since,
            until,
        } => {
            let page = facebook
                .get_friend_list_profiles_of_window(&user, limit, offset, since, until)
                .await?;
            info!(user = %user, count = page.len(), "Fetched friend profiles");
            print_json(&page)?;
        }
        Command::FriendIds { user } => {
            let page = facebook.get_friend_list_ids_of(&user).await?;
            info!(user = %user, count = page.len(), "Fetched friend ids");
            print_json(&page)?;
        }
        Command::Post {
            message,
            target,
            link,
            name,
            caption,
            description,
            picture,
            tags,
            place,
            allow,
            deny,
        } => {
            let id = facebook
                .post_full(
                    &target,
                    Some(message.as_str()),
                    link.as_deref(),
                    name.as_deref(),
                    caption.as_deref(),
                    description.as_deref(),
                    non_empty(&tags),
                    place.as_deref(),
                    picture.as_deref(),
                    non_empty(&allow),
                    non_empty(&deny),
                )
                .await?;
            info!(id = %id, target = %target, "Status posted");
            print_json(&Created { id: &id })?;
        }
        Command::UploadPhoto {
            path,
            caption,
            album,
        } => {
            let id = match (album, caption) {
                (Some(album), _) => facebook.upload_photo_to_album(&album, &path).await?,
                (None, Some(caption)) => facebook.upload_photo_with_caption(&path, &caption).await?,
                (None, None) => facebook.upload_photo(&path).await?,
            };
            info!(id = %id, path = %path.display(), "Photo uploaded");
            print_json(&Created { id: &id })?;
        }
    }

    Ok(())
}

fn non_empty(values: &[String]) -> Option<&[String]> {
    (!values.is_empty()).then_some(values)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn post_collects_repeated_lists() {
        let cli = Cli::try_parse_from([
            "fbw", "post", "hello", "--tag", "1", "--tag", "2", "--deny", "9",
        ])
        .unwrap();
        let Command::Post {
            message,
            target,
            tags,
            allow,
            deny,
            ..
        } = cli.command
        else {
            panic!("expected post");
        };
        assert_eq!(message, "hello");
        assert_eq!(target, "me");
        assert_eq!(tags, vec!["1", "2"]);
        assert!(allow.is_empty());
        assert_eq!(deny, vec!["9"]);
        assert_eq!(non_empty(&allow), None);
    }

    #[test]
    fn caption_and_album_conflict() {
        assert!(Cli::try_parse_from([
            "fbw",
            "upload-photo",
            "a.png",
            "--caption",
            "x",
            "--album",
            "1",
        ])
        .is_err());
    }
}
