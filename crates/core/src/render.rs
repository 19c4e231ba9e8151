//! Projection of validated items into template values, and rendering

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use crate::config::RenderConfig;
use crate::error::TemplateError;
use crate::template;
use crate::validate::{Asset, Media, Slide, ValidatedItem};

static HTTP_SCHEME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^https?:").unwrap());

/// Render one item with the template matching its type.
///
/// Items (and carousel entries) of unsupported types render as the empty
/// string.
pub fn render_item(item: &ValidatedItem, config: &RenderConfig) -> Result<String, TemplateError> {
    let values = Value::Object(template_values(item, config)?);
    let templates = &config.templates;

    match &item.media {
        Media::Image { .. } => template::render(&templates.image, &values),
        Media::Video { .. } => template::render(&templates.video, &values),
        Media::Carousel { .. } => template::render(&templates.carousel_frame, &values),
        Media::Unsupported { kind, .. } => {
            log::debug!("Skipping item {} of unsupported type '{}'", item.id, kind);
            Ok(String::new())
        }
    }
}

/// Build the value map an item's template is rendered against.
///
/// Carousel slides are rendered here, into `carousel`.
pub fn template_values(
    item: &ValidatedItem,
    config: &RenderConfig,
) -> Result<Map<String, Value>, TemplateError> {
    let mut values = Map::new();

    values.insert("id".into(), item.id.clone().into());
    values.insert("type".into(), item.kind().into());
    values.insert("userId".into(), item.user.id.clone().into());
    values.insert("fullName".into(), item.user.full_name.clone().into());
    values.insert(
        "profilePicture".into(),
        item.user.profile_picture.clone().into(),
    );
    values.insert("username".into(), item.user.username.clone().into());
    values.insert(
        "caption".into(),
        item.caption.clone().unwrap_or_default().into(),
    );
    values.insert(
        "userLiked".into(),
        Value::from(if item.user_has_liked { "true" } else { "false" }),
    );
    values.insert("likes".into(), Value::Number(item.likes.clone()));
    values.insert("comments".into(), Value::Number(item.comments.clone()));
    values.insert(
        "location".into(),
        item.location.clone().unwrap_or_default().into(),
    );
    values.insert("time".into(), item.created_time.clone().into());
    values.insert("link".into(), item.link.clone().into());
    values.insert("model".into(), item.raw().clone());

    match &item.media {
        Media::Image { preview } => {
            insert_asset(&mut values, "", preview, config.relative_scheme);
        }
        Media::Video { preview, video } => {
            insert_asset(&mut values, "preview", preview, config.relative_scheme);
            insert_asset(&mut values, "", video, config.relative_scheme);
        }
        Media::Carousel { preview, slides } => {
            insert_asset(&mut values, "preview", preview, config.relative_scheme);
            values.insert("carousel".into(), render_slides(slides, config)?.into());
        }
        Media::Unsupported { .. } => {}
    }

    Ok(values)
}

fn render_slides(slides: &[Slide], config: &RenderConfig) -> Result<String, TemplateError> {
    slides
        .iter()
        .map(|slide| {
            let (template, asset) = match slide {
                Slide::Image(asset) => (&config.templates.carousel_image, asset),
                Slide::Video(asset) => (&config.templates.carousel_video, asset),
                Slide::Unsupported(_) => return Ok(String::new()),
            };

            let mut values = Map::new();
            values.insert("type".into(), slide.kind().into());
            insert_asset(&mut values, "", asset, config.relative_scheme);
            template::render(template, &Value::Object(values))
        })
        .collect()
}

/// Insert `source`, `width`, `height` and `orientation`, optionally prefixed
/// (`previewSource`, `previewWidth`, ...).
fn insert_asset(values: &mut Map<String, Value>, prefix: &str, asset: &Asset, relative: bool) {
    let key = |name: &str| {
        if prefix.is_empty() {
            name.to_string()
        } else {
            let mut chars = name.chars();
            let first = chars.next().map(|c| c.to_ascii_uppercase());
            format!("{prefix}{}{}", first.unwrap_or_default(), chars.as_str())
        }
    };

    values.insert(key("source"), source_url(&asset.url, relative).into());
    values.insert(key("width"), Value::Number(asset.width.clone()));
    values.insert(key("height"), Value::Number(asset.height.clone()));
    values.insert(key("orientation"), asset.orientation().as_str().into());
}

/// Strip a leading `http:`/`https:` when scheme-relative URLs are requested.
pub fn source_url(url: &str, relative: bool) -> String {
    if relative {
        HTTP_SCHEME.replace(url, "").into_owned()
    } else {
        url.to_string()
    }
}
