use std::io::Read;
use std::path::PathBuf;

use instafeed_core::error::PARSE_ERROR_MESSAGE;
use instafeed_core::pipeline::{FeedHooks, FeedOutcome, FeedTransform};
use rand::Rng;
use serde_json::Value;

use super::{write_document, ContainerSink, FeedArgs, ShellHooks};
use crate::prelude::{eprintln, *};

#[derive(Debug, Clone, clap::Args)]
pub struct RenderOptions {
    /// Saved API response, or `-` to read it from stdin
    #[clap(value_name = "FILE")]
    pub input: String,

    #[command(flatten)]
    pub feed: FeedArgs,

    /// Write the container to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(options: RenderOptions, global: crate::Global) -> Result<()> {
    let feed_options = options.feed.load_options()?;
    let transform = options.feed.transform(&feed_options)?;
    let contents = read_input(&options.input)?;

    let mut sink = ContainerSink::new(transform.config().target.clone());
    let mut hooks = ShellHooks::new(global.verbose);
    let outcome = render_response(&transform, &contents, &mut rand::thread_rng(), &mut sink, &mut hooks);

    match outcome {
        FeedOutcome::Success { next_url, .. } => {
            if !transform.config().mock {
                write_document(&sink.document(), options.output.as_deref())?;
            }
            if let Some(next_url) = next_url {
                eprintln!("Next page: {}", next_url);
            }
            Ok(())
        }
        FeedOutcome::ApiError(message) | FeedOutcome::ParseError(message) => {
            Err(Error::Feed(message).into())
        }
    }
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut contents = String::new();
        std::io::stdin()
            .read_to_string(&mut contents)
            .context("Failed to read the response from stdin")?;
        Ok(contents)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))
    }
}

/// Decode `contents` and run one pass over it.
///
/// Text that is not JSON fails like any other unusable response.
fn render_response<R: Rng + ?Sized>(
    transform: &FeedTransform,
    contents: &str,
    rng: &mut R,
    sink: &mut ContainerSink,
    hooks: &mut ShellHooks,
) -> FeedOutcome {
    match serde_json::from_str::<Value>(contents) {
        Ok(response) => transform.run(&response, rng, sink, hooks),
        Err(err) => {
            log::warn!("Response is not JSON: {}", err);
            hooks.on_error(PARSE_ERROR_MESSAGE);
            FeedOutcome::ParseError(PARSE_ERROR_MESSAGE.to_string())
        }
    }
}
