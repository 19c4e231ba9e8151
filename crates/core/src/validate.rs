//! Structural validation of raw feed items
//!
//! Raw items are untyped JSON. [`validate_item`] checks every field the
//! renderer relies on and produces a [`ValidatedItem`]; nothing downstream
//! reads untyped input except through the `model` escape hatch.

use serde_json::{Number, Value};
use std::fmt;

use crate::config::{ImageResolution, VideoResolution};
use crate::error::SchemaError;
use crate::path;

/// Aspect classification of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Square,
    Landscape,
    Portrait,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Square => "square",
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One image or video variant: `{url, width, height}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub url: String,
    pub width: Number,
    pub height: Number,
}

impl Asset {
    pub fn orientation(&self) -> Orientation {
        let width = self.width.as_f64().unwrap_or_default();
        let height = self.height.as_f64().unwrap_or_default();

        if width == height {
            Orientation::Square
        } else if width > height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub profile_picture: String,
    pub username: String,
}

/// One entry of a carousel.
#[derive(Debug, Clone, PartialEq)]
pub enum Slide {
    Image(Asset),
    Video(Asset),
    /// Entry of a type that has no template; renders nothing.
    Unsupported(String),
}

impl Slide {
    pub fn kind(&self) -> &str {
        match self {
            Slide::Image(_) => "image",
            Slide::Video(_) => "video",
            Slide::Unsupported(kind) => kind,
        }
    }
}

/// Type-specific part of an item.
#[derive(Debug, Clone, PartialEq)]
pub enum Media {
    Image {
        preview: Asset,
    },
    Video {
        preview: Asset,
        video: Asset,
    },
    Carousel {
        preview: Asset,
        slides: Vec<Slide>,
    },
    /// Item of a type that has no template; renders nothing.
    Unsupported {
        kind: String,
        preview: Asset,
    },
}

impl Media {
    /// The `images[imageResolution]` asset every item carries.
    pub fn preview(&self) -> &Asset {
        match self {
            Media::Image { preview }
            | Media::Video { preview, .. }
            | Media::Carousel { preview, .. }
            | Media::Unsupported { preview, .. } => preview,
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            Media::Image { .. } => "image",
            Media::Video { .. } => "video",
            Media::Carousel { .. } => "carousel",
            Media::Unsupported { kind, .. } => kind,
        }
    }
}

/// A feed item whose shape has been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedItem {
    pub id: String,
    pub user: User,
    pub user_has_liked: bool,
    pub likes: Number,
    pub comments: Number,
    /// Opaque timestamp, compared lexicographically.
    pub created_time: String,
    pub link: String,
    pub caption: Option<String>,
    pub location: Option<String>,
    pub media: Media,
    raw: Value,
}

impl ValidatedItem {
    /// The `type` field of the item.
    pub fn kind(&self) -> &str {
        self.media.kind()
    }

    /// The untouched item as received.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl AsRef<Value> for ValidatedItem {
    fn as_ref(&self) -> &Value {
        &self.raw
    }
}

/// Validate one raw item.
///
/// Carousel entries are read from each entry's own `images`/`videos` maps,
/// not from the parent item. The parent's `images` map is required for every
/// item (it provides the preview); the parent's `videos` map is *not* required
/// for carousels, even when they contain video entries, since carousel parents
/// do not carry one.
pub fn validate_item(
    raw: Value,
    image_resolution: ImageResolution,
    video_resolution: VideoResolution,
) -> Result<ValidatedItem, SchemaError> {
    let id = required_str(&raw, "id")?;
    let kind = required_str(&raw, "type")?;
    required_present(&raw, "images")?;
    required_present(&raw, "user")?;

    let user = User {
        id: required_str(&raw, "user.id")?,
        full_name: required_str(&raw, "user.full_name")?,
        profile_picture: required_str(&raw, "user.profile_picture")?,
        username: required_str(&raw, "user.username")?,
    };

    let user_has_liked = required_bool(&raw, "user_has_liked")?;
    let likes = required_number(&raw, "likes.count")?;
    let comments = required_number(&raw, "comments.count")?;
    let created_time = required_str(&raw, "created_time")?;
    let link = required_str(&raw, "link")?;

    let caption = optional_str(&raw, "caption.text");
    let location = optional_str(&raw, "location.name");

    let preview = required_asset(&raw, &format!("images.{}", image_resolution.key()))?;

    let media = match kind.as_str() {
        "image" => Media::Image { preview },
        "video" => {
            required_present(&raw, "videos")?;
            let video = required_asset(&raw, &format!("videos.{}", video_resolution.key()))?;
            Media::Video { preview, video }
        }
        "carousel" => {
            let slides = validate_slides(&raw, image_resolution, video_resolution)?;
            Media::Carousel { preview, slides }
        }
        _ => Media::Unsupported {
            kind: kind.clone(),
            preview,
        },
    };

    Ok(ValidatedItem {
        id,
        user,
        user_has_liked,
        likes,
        comments,
        created_time,
        link,
        caption,
        location,
        media,
        raw,
    })
}

fn validate_slides(
    raw: &Value,
    image_resolution: ImageResolution,
    video_resolution: VideoResolution,
) -> Result<Vec<Slide>, SchemaError> {
    let entries = required_present(raw, "carousel_media")?
        .as_array()
        .ok_or_else(|| SchemaError::expected("carousel_media", "array"))?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let prefix = format!("carousel_media.{index}");
            let kind = entry
                .get("type")
                .and_then(Value::as_str)
                .ok_or_else(|| SchemaError::expected(format!("{prefix}.type"), "string"))?;

            match kind {
                "image" => {
                    let asset = required_asset(entry, &format!("images.{}", image_resolution.key()))
                        .map_err(|e| nested(&prefix, e))?;
                    Ok(Slide::Image(asset))
                }
                "video" => {
                    let asset = required_asset(entry, &format!("videos.{}", video_resolution.key()))
                        .map_err(|e| nested(&prefix, e))?;
                    Ok(Slide::Video(asset))
                }
                other => Ok(Slide::Unsupported(other.to_string())),
            }
        })
        .collect()
}

fn nested(prefix: &str, err: SchemaError) -> SchemaError {
    SchemaError {
        field: format!("{prefix}.{}", err.field),
        reason: err.reason,
    }
}

fn required_present<'a>(raw: &'a Value, field: &str) -> Result<&'a Value, SchemaError> {
    path::resolve(raw, field)
        .filter(|value| !value.is_null())
        .ok_or_else(|| SchemaError::missing(field))
}

fn required_str(raw: &Value, field: &str) -> Result<String, SchemaError> {
    path::resolve(raw, field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| SchemaError::expected(field, "string"))
}

fn required_bool(raw: &Value, field: &str) -> Result<bool, SchemaError> {
    path::resolve(raw, field)
        .and_then(Value::as_bool)
        .ok_or_else(|| SchemaError::expected(field, "boolean"))
}

fn required_number(raw: &Value, field: &str) -> Result<Number, SchemaError> {
    match path::resolve(raw, field) {
        Some(Value::Number(n)) => Ok(n.clone()),
        _ => Err(SchemaError::expected(field, "number")),
    }
}

fn optional_str(raw: &Value, field: &str) -> Option<String> {
    path::resolve(raw, field)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn required_asset(raw: &Value, field: &str) -> Result<Asset, SchemaError> {
    let asset = required_present(raw, field)?;

    Ok(Asset {
        url: required_str(asset, "url").map_err(|e| nested(field, e))?,
        width: required_number(asset, "width").map_err(|e| nested(field, e))?,
        height: required_number(asset, "height").map_err(|e| nested(field, e))?,
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};

    pub fn image_item(id: &str) -> Value {
        json!({
            "id": id,
            "type": "image",
            "images": {
                "thumbnail": {"url": "http://x/i.jpg", "width": 10, "height": 5},
                "standard_resolution": {"url": "https://x/big.jpg", "width": 640, "height": 640}
            },
            "user": {"id": "u1", "full_name": "A", "profile_picture": "p", "username": "a"},
            "user_has_liked": false,
            "likes": {"count": 2},
            "comments": {"count": 1},
            "created_time": "100",
            "link": "http://x"
        })
    }

    pub fn video_item(id: &str) -> Value {
        let mut item = image_item(id);
        item["type"] = json!("video");
        item["videos"] = json!({
            "standard_resolution": {"url": "https://x/v.mp4", "width": 480, "height": 640},
            "low_bandwidth": {"url": "http://x/v-low.mp4", "width": 240, "height": 320}
        });
        item
    }

    pub fn carousel_item(id: &str) -> Value {
        let mut item = image_item(id);
        item["type"] = json!("carousel");
        item["carousel_media"] = json!([
            {
                "type": "image",
                "images": {"thumbnail": {"url": "http://x/c1.jpg", "width": 3, "height": 4}}
            },
            {
                "type": "video",
                "videos": {"standard_resolution": {"url": "https://x/c2.mp4", "width": 8, "height": 8}}
            }
        ]);
        item
    }
}
