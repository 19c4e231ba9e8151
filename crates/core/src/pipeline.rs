//! Response-to-markup pipeline
//!
//! One call to [`FeedTransform::run`] handles one response:
//!
//! 1. read the envelope and check `meta.code`
//! 2. validate every item (the first invalid item fails the whole page)
//! 3. order the page per the configured [`SortSpec`](crate::order::SortSpec)
//! 4. drop items rejected by the filter
//! 5. render each item and concatenate the markup
//! 6. hand the markup to the [`MarkupSink`], between `on_before`/`on_after`
//! 7. report the next-page cursor and call `on_success`
//!
//! Any failure is reported once through [`FeedHooks::on_error`] and nothing
//! is inserted. In mock mode steps 2–6 are skipped.

use rand::Rng;
use serde_json::Value;

use crate::config::FeedConfig;
use crate::envelope::FeedEnvelope;
use crate::error::FeedError;
use crate::order;
use crate::render::render_item;
use crate::validate::{validate_item, ValidatedItem};

/// Callbacks fired while a response is processed.
pub trait FeedHooks {
    /// Right before markup is inserted.
    fn on_before(&mut self) {}

    /// Right after markup is inserted.
    fn on_after(&mut self) {}

    /// With the full response, once the page was handled.
    fn on_success(&mut self, _envelope: &Value) {}

    /// With a human-readable message, on any failure.
    fn on_error(&mut self, _message: &str) {}
}

/// Receiver of the rendered markup.
pub trait MarkupSink {
    /// Append `markup` to the container identified by `target`.
    fn insert(&mut self, target: &str, markup: &str) -> Result<(), FeedError>;
}

/// Predicate deciding whether an item is rendered.
pub type ItemFilter = dyn Fn(&ValidatedItem) -> bool;

/// Terminal state of one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOutcome {
    Success {
        /// Number of items rendered; zero in mock mode.
        rendered: usize,
        next_url: Option<String>,
    },
    ApiError(String),
    ParseError(String),
}

impl FeedOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FeedOutcome::Success { .. })
    }

    pub fn next_url(&self) -> Option<&str> {
        match self {
            FeedOutcome::Success { next_url, .. } => next_url.as_deref(),
            _ => None,
        }
    }
}

/// The transform, configured once and reusable for every page.
pub struct FeedTransform {
    config: FeedConfig,
    filter: Option<Box<ItemFilter>>,
}

impl FeedTransform {
    pub fn new(config: FeedConfig) -> Self {
        Self {
            config,
            filter: None,
        }
    }

    /// Only render items for which `filter` returns `true`.
    pub fn with_filter(mut self, filter: impl Fn(&ValidatedItem) -> bool + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Process one decoded response.
    pub fn run<R, S, H>(&self, response: &Value, rng: &mut R, sink: &mut S, hooks: &mut H) -> FeedOutcome
    where
        R: Rng + ?Sized,
        S: MarkupSink + ?Sized,
        H: FeedHooks + ?Sized,
    {
        match self.transform(response, rng, sink, hooks) {
            Ok((rendered, next_url)) => {
                log::info!(
                    "Rendered {} item(s) into '{}'{}",
                    rendered,
                    self.config.target,
                    if next_url.is_some() { ", more pages available" } else { "" }
                );
                hooks.on_success(response);
                FeedOutcome::Success { rendered, next_url }
            }
            Err(err) => {
                log::warn!("Feed transform failed: {}", err);
                let message = err.user_message();
                hooks.on_error(&message);
                if err.is_api_error() {
                    FeedOutcome::ApiError(message)
                } else {
                    FeedOutcome::ParseError(message)
                }
            }
        }
    }

    fn transform<R, S, H>(
        &self,
        response: &Value,
        rng: &mut R,
        sink: &mut S,
        hooks: &mut H,
    ) -> Result<(usize, Option<String>), FeedError>
    where
        R: Rng + ?Sized,
        S: MarkupSink + ?Sized,
        H: FeedHooks + ?Sized,
    {
        let envelope = FeedEnvelope::from_value(response)?;
        if let Some(err) = envelope.api_error() {
            return Err(err);
        }

        let mut rendered = 0;
        if !self.config.mock {
            let items = self.prepare(&envelope, rng)?;
            rendered = items.len();
            let markup = self.render(&items)?;

            hooks.on_before();
            sink.insert(&self.config.target, &markup)?;
            hooks.on_after();
        }

        Ok((rendered, envelope.next_url().map(str::to_string)))
    }

    /// Validate, order and filter the items of a successful envelope.
    pub fn prepare<R: Rng + ?Sized>(
        &self,
        envelope: &FeedEnvelope,
        rng: &mut R,
    ) -> Result<Vec<ValidatedItem>, FeedError> {
        let render = &self.config.render;
        let items = envelope
            .items()?
            .iter()
            .map(|raw| validate_item(raw.clone(), render.image_resolution, render.video_resolution))
            .collect::<Result<Vec<_>, _>>()?;

        let items = order::order(items, &self.config.sort, rng)?;

        Ok(match &self.filter {
            Some(filter) => items.into_iter().filter(|item| filter(item)).collect(),
            None => items,
        })
    }

    /// Concatenated markup of `items`, in order.
    pub fn render(&self, items: &[ValidatedItem]) -> Result<String, FeedError> {
        let markup = items
            .iter()
            .map(|item| render_item(item, &self.config.render))
            .collect::<Result<String, _>>()?;
        Ok(markup)
    }
}

/// Next-page bookkeeping, held by the caller across pages.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FeedCursor {
    next_url: Option<String>,
}

impl FeedCursor {
    /// Remember the next page announced by a successful pass.
    pub fn record(&mut self, outcome: &FeedOutcome) {
        if let Some(next_url) = outcome.next_url() {
            self.next_url = Some(next_url.to_string());
        }
    }

    pub fn has_next(&self) -> bool {
        self.next_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    /// The pending next page, if any, without consuming it.
    pub fn next_url(&self) -> Option<&str> {
        self.next_url.as_deref().filter(|url| !url.is_empty())
    }

    /// The next page to request, clearing it so it is only followed once.
    pub fn take_next(&mut self) -> Option<String> {
        if self.has_next() {
            self.next_url.take()
        } else {
            None
        }
    }
}
