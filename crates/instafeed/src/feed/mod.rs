use std::path::{Path, PathBuf};

use colored::Colorize;
use instafeed_core::config::{FeedConfig, FeedOptions};
use instafeed_core::error::FeedError;
use instafeed_core::pipeline::{FeedHooks, FeedTransform, MarkupSink};
use instafeed_core::validate::ValidatedItem;
use serde_json::Value;

use crate::prelude::{eprintln, println, *};

pub mod fetch;
pub mod render;

/// Feed options shared by every subcommand.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct FeedArgs {
    /// TOML file with feed options; flags win over its values
    #[arg(long, env = "INSTAFEED_CONFIG")]
    pub config: Option<PathBuf>,

    /// Feed source: user, tag or location
    #[arg(long)]
    pub get: Option<String>,

    /// Tag to read when the source is `tag`
    #[arg(long)]
    pub tag_name: Option<String>,

    /// Location id to read when the source is `location`
    #[arg(long)]
    pub location_id: Option<u64>,

    /// User id to read when the source is `user` (defaults to `self`)
    #[arg(long)]
    pub user_id: Option<u64>,

    /// OAuth access token
    #[arg(long, env = "INSTAFEED_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Number of items requested per page
    #[arg(short, long)]
    pub limit: Option<u64>,

    /// none, random, or most-/least- followed by recent, liked or commented
    #[arg(long)]
    pub sort: Option<String>,

    /// Template for image items
    #[arg(long)]
    pub image_template: Option<String>,

    /// Template for video items
    #[arg(long)]
    pub video_template: Option<String>,

    /// Template wrapping the slides of a carousel item
    #[arg(long)]
    pub carousel_frame_template: Option<String>,

    /// Template for image slides
    #[arg(long)]
    pub carousel_image_template: Option<String>,

    /// Template for video slides
    #[arg(long)]
    pub carousel_video_template: Option<String>,

    /// thumbnail, low_resolution or standard_resolution
    #[arg(long)]
    pub image_resolution: Option<String>,

    /// standard_resolution, low_bandwidth or low_resolution
    #[arg(long)]
    pub video_resolution: Option<String>,

    /// Strip the scheme from rendered source URLs
    #[arg(long)]
    pub relative_scheme: bool,

    /// Only report success and pagination, render nothing
    #[arg(long)]
    pub mock: bool,

    /// Id of the container receiving the markup
    #[arg(long)]
    pub target: Option<String>,

    /// Only render items of this type (image, video, carousel)
    #[arg(long, value_name = "TYPE")]
    pub only: Option<String>,

    /// Only render items with at least this many likes
    #[arg(long)]
    pub min_likes: Option<u64>,
}

impl FeedArgs {
    /// Options given on the command line. Switches left off stay unset so
    /// they don't override the options file.
    fn flag_options(&self) -> FeedOptions {
        FeedOptions {
            get: self.get.clone(),
            tag_name: self.tag_name.clone(),
            location_id: self.location_id,
            user_id: self.user_id,
            access_token: self.access_token.clone(),
            limit: self.limit,
            sort: self.sort.clone(),
            image_template: self.image_template.clone(),
            video_template: self.video_template.clone(),
            carousel_frame_template: self.carousel_frame_template.clone(),
            carousel_image_template: self.carousel_image_template.clone(),
            carousel_video_template: self.carousel_video_template.clone(),
            image_resolution: self.image_resolution.clone(),
            video_resolution: self.video_resolution.clone(),
            relative_scheme: self.relative_scheme.then_some(true),
            target: self.target.clone(),
            mock: self.mock.then_some(true),
        }
    }

    /// The options file, if any, overlaid with the command line flags.
    pub fn load_options(&self) -> Result<FeedOptions, Error> {
        let base = match &self.config {
            Some(path) => {
                log::debug!("Reading feed options from {}", path.display());
                let contents = std::fs::read_to_string(path).map_err(|source| Error::OptionsFile {
                    path: path.display().to_string(),
                    source,
                })?;
                FeedOptions::from_toml_str(&contents)?
            }
            None => FeedOptions::default(),
        };

        Ok(base.overlay(self.flag_options()))
    }

    /// Configured transform for `options`, with the `--only`/`--min-likes` filter.
    pub fn transform(&self, options: &FeedOptions) -> Result<FeedTransform, Error> {
        let transform = FeedTransform::new(FeedConfig::from_options(options)?);

        Ok(match item_filter(self.only.clone(), self.min_likes) {
            Some(filter) => transform.with_filter(filter),
            None => transform,
        })
    }
}

fn item_filter(
    only: Option<String>,
    min_likes: Option<u64>,
) -> Option<impl Fn(&ValidatedItem) -> bool + 'static> {
    if only.is_none() && min_likes.is_none() {
        return None;
    }

    Some(move |item: &ValidatedItem| {
        let kind_matches = only.as_deref().map_or(true, |kind| item.kind() == kind);
        let likes_match = min_likes.map_or(true, |min| {
            item.likes.as_f64().is_some_and(|likes| likes >= min as f64)
        });
        kind_matches && likes_match
    })
}

/// Collects the markup of every page for one container.
#[derive(Debug)]
pub struct ContainerSink {
    target: String,
    markup: String,
}

impl ContainerSink {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            markup: String::new(),
        }
    }

    /// The container element with everything inserted so far.
    pub fn document(&self) -> String {
        format!(
            "<div id=\"{}\">{}</div>",
            html_escape::encode_double_quoted_attribute(&self.target),
            self.markup
        )
    }
}

impl MarkupSink for ContainerSink {
    fn insert(&mut self, target: &str, markup: &str) -> Result<(), FeedError> {
        if target != self.target {
            return Err(FeedError::Target(target.to_string()));
        }

        self.markup.push_str(markup);
        Ok(())
    }
}

/// Hooks that log every event and keep the failures for the exit status.
#[derive(Debug, Default)]
pub struct ShellHooks {
    verbose: bool,
    pages: usize,
    errors: Vec<String>,
}

impl ShellHooks {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            ..Default::default()
        }
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn last_error(&self) -> Option<&str> {
        self.errors.last().map(String::as_str)
    }
}

impl FeedHooks for ShellHooks {
    fn on_before(&mut self) {
        log::debug!("Inserting markup");
    }

    fn on_after(&mut self) {
        log::debug!("Markup inserted");
    }

    fn on_success(&mut self, envelope: &Value) {
        self.pages += 1;
        let items = envelope["data"].as_array().map_or(0, Vec::len);
        log::info!("Page {} received with {} item(s)", self.pages, items);
        if self.verbose {
            eprintln!("{} page {} ({} items)", "Loaded".green(), self.pages, items);
        }
    }

    fn on_error(&mut self, message: &str) {
        log::error!("{}", message);
        eprintln!("{}", message.red());
        self.errors.push(message.to_string());
    }
}

/// Write the document to `output`, or to stdout.
pub fn write_document(document: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, format!("{document}\n"))
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", document),
    }

    Ok(())
}

/// Where next-page cursors are stored between invocations.
pub fn cursor_dir() -> Result<PathBuf> {
    dirs_next::cache_dir()
        .map(|dir| dir.join("instafeed").join("cursors"))
        .ok_or_else(|| eyre!("Could not determine the cache directory"))
}
