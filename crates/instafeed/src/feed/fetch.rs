use std::path::PathBuf;

use colored::Colorize;
use instafeed_core::error::FeedError;
use instafeed_core::pagination;
use instafeed_core::pipeline::{FeedCursor, FeedHooks, FeedOutcome, FeedTransform};
use instafeed_core::request::FeedRequest;
use serde_json::Value;

use super::{cursor_dir, write_document, ContainerSink, FeedArgs, ShellHooks};
use crate::prelude::{eprintln, *};

#[derive(Debug, Clone, clap::Args)]
pub struct FetchOptions {
    #[command(flatten)]
    pub feed: FeedArgs,

    /// Number of pages to follow
    #[arg(short, long, default_value = "1")]
    pub pages: usize,

    /// Continue from a next-page URL or the hash printed by a previous run
    #[arg(long)]
    pub next_page: Option<String>,

    /// Write the container to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn run(options: FetchOptions, global: crate::Global) -> Result<()> {
    let feed_options = options.feed.load_options()?;
    let transform = options.feed.transform(&feed_options)?;

    let first_url = match &options.next_page {
        Some(input) => pagination::resolve_cursor(&cursor_dir()?, input).map_err(Error::from)?,
        None => FeedRequest::from_options(&feed_options).map_err(Error::from)?.url(),
    };

    let client = reqwest::Client::new();
    let mut sink = ContainerSink::new(transform.config().target.clone());
    let mut hooks = ShellHooks::new(global.verbose);
    let cursor = fetch_pages(
        &transform,
        first_url,
        options.pages.max(1),
        &mut sink,
        &mut hooks,
        |url| fetch_page(&client, url),
    )
    .await?;

    if !transform.config().mock {
        write_document(&sink.document(), options.output.as_deref())?;
    }

    if let Some(next_url) = cursor.next_url() {
        let hash = pagination::save_cursor(&cursor_dir()?, next_url).map_err(Error::from)?;
        eprintln!(
            "{} instafeed fetch --next-page {}",
            "More pages available:".yellow(),
            hash
        );
    }

    Ok(())
}

/// Run the transform over up to `max_pages` pages, starting at `first_url`.
///
/// Returns the cursor left after the last page. The first failed page stops
/// the loop; its message already went through `on_error`.
async fn fetch_pages<F, Fut>(
    transform: &FeedTransform,
    first_url: String,
    max_pages: usize,
    sink: &mut ContainerSink,
    hooks: &mut ShellHooks,
    mut fetch: F,
) -> Result<FeedCursor, Error>
where
    F: FnMut(String) -> Fut,
    Fut: std::future::Future<Output = Result<Value, FeedError>>,
{
    let mut cursor = FeedCursor::default();
    let mut url = Some(first_url);
    let mut pages = 0;

    while let Some(page_url) = url.take() {
        log::debug!("Requesting page {}", pages + 1);

        let outcome = match fetch(page_url).await {
            Ok(response) => transform.run(&response, &mut rand::thread_rng(), sink, hooks),
            Err(err) => {
                log::warn!("{}", err);
                let message = err.user_message();
                hooks.on_error(&message);
                FeedOutcome::ApiError(message)
            }
        };

        match outcome {
            FeedOutcome::ApiError(message) | FeedOutcome::ParseError(message) => {
                return Err(Error::Feed(message));
            }
            FeedOutcome::Success { .. } => cursor.record(&outcome),
        }

        pages += 1;
        if pages < max_pages {
            url = cursor.take_next();
        }
    }

    Ok(cursor)
}

/// GET one page and decode its JSON body.
///
/// Error responses still carry a `meta` envelope, so the status code is left
/// for the pipeline to judge.
async fn fetch_page(client: &reqwest::Client, url: String) -> Result<Value, FeedError> {
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| FeedError::Transport(e.to_string()))?;

    log::debug!("Response status: {}", response.status());

    response
        .json::<Value>()
        .await
        .map_err(|e| FeedError::Transport(e.to_string()))
}
