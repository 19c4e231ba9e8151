//! Feed options and their validated configuration
//!
//! [`FeedOptions`] is the loose, user-facing form: every field is optional and
//! can come from a TOML file, command-line flags, or both (see
//! [`FeedOptions::overlay`]). [`FeedConfig::from_options`] validates it once
//! and produces the immutable configuration a transform pass reads.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::order::SortSpec;

pub const DEFAULT_TARGET: &str = "instafeed";

pub const DEFAULT_IMAGE_TEMPLATE: &str =
    "<img src=\"{{source}}\" width=\"{{width}}\" height=\"{{height}}\">";

pub const DEFAULT_PREVIEW_TEMPLATE: &str =
    "<img src=\"{{previewSource}}\" width=\"{{previewWidth}}\" height=\"{{previewHeight}}\">";

/// Image quality tier used to pick `images[...]` variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageResolution {
    #[default]
    Thumbnail,
    LowResolution,
    StandardResolution,
}

impl ImageResolution {
    /// Key of this variant inside an `images` map.
    pub fn key(&self) -> &'static str {
        match self {
            ImageResolution::Thumbnail => "thumbnail",
            ImageResolution::LowResolution => "low_resolution",
            ImageResolution::StandardResolution => "standard_resolution",
        }
    }
}

impl FromStr for ImageResolution {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "thumbnail" => Ok(ImageResolution::Thumbnail),
            "low_resolution" => Ok(ImageResolution::LowResolution),
            "standard_resolution" => Ok(ImageResolution::StandardResolution),
            _ => Err(ConfigError::Invalid("image_resolution")),
        }
    }
}

impl fmt::Display for ImageResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Video quality tier used to pick `videos[...]` variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoResolution {
    #[default]
    StandardResolution,
    LowBandwidth,
    LowResolution,
}

impl VideoResolution {
    /// Key of this variant inside a `videos` map.
    pub fn key(&self) -> &'static str {
        match self {
            VideoResolution::StandardResolution => "standard_resolution",
            VideoResolution::LowBandwidth => "low_bandwidth",
            VideoResolution::LowResolution => "low_resolution",
        }
    }
}

impl FromStr for VideoResolution {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard_resolution" => Ok(VideoResolution::StandardResolution),
            "low_bandwidth" => Ok(VideoResolution::LowBandwidth),
            "low_resolution" => Ok(VideoResolution::LowResolution),
            _ => Err(ConfigError::Invalid("video_resolution")),
        }
    }
}

impl fmt::Display for VideoResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Markup templates, one per item kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    pub image: String,
    pub video: String,
    pub carousel_frame: String,
    pub carousel_image: String,
    pub carousel_video: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            image: DEFAULT_IMAGE_TEMPLATE.to_string(),
            video: DEFAULT_PREVIEW_TEMPLATE.to_string(),
            carousel_frame: DEFAULT_PREVIEW_TEMPLATE.to_string(),
            carousel_image: String::new(),
            carousel_video: String::new(),
        }
    }
}

/// Everything the item renderer needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderConfig {
    pub templates: Templates,
    pub image_resolution: ImageResolution,
    pub video_resolution: VideoResolution,
    /// Strip `http:`/`https:` from rendered source URLs.
    pub relative_scheme: bool,
}

/// Raw feed options.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedOptions {
    pub get: Option<String>,
    pub tag_name: Option<String>,
    pub location_id: Option<u64>,
    pub user_id: Option<u64>,
    pub access_token: Option<String>,
    pub limit: Option<u64>,
    pub sort: Option<String>,
    pub image_template: Option<String>,
    pub video_template: Option<String>,
    pub carousel_frame_template: Option<String>,
    pub carousel_image_template: Option<String>,
    pub carousel_video_template: Option<String>,
    pub image_resolution: Option<String>,
    pub video_resolution: Option<String>,
    pub relative_scheme: Option<bool>,
    pub target: Option<String>,
    pub mock: Option<bool>,
}

impl FeedOptions {
    /// Parse options from the contents of a TOML file.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::File(e.to_string()))
    }

    /// Fields set in `overrides` win over the ones in `self`.
    pub fn overlay(self, overrides: FeedOptions) -> FeedOptions {
        FeedOptions {
            get: overrides.get.or(self.get),
            tag_name: overrides.tag_name.or(self.tag_name),
            location_id: overrides.location_id.or(self.location_id),
            user_id: overrides.user_id.or(self.user_id),
            access_token: overrides.access_token.or(self.access_token),
            limit: overrides.limit.or(self.limit),
            sort: overrides.sort.or(self.sort),
            image_template: overrides.image_template.or(self.image_template),
            video_template: overrides.video_template.or(self.video_template),
            carousel_frame_template: overrides
                .carousel_frame_template
                .or(self.carousel_frame_template),
            carousel_image_template: overrides
                .carousel_image_template
                .or(self.carousel_image_template),
            carousel_video_template: overrides
                .carousel_video_template
                .or(self.carousel_video_template),
            image_resolution: overrides.image_resolution.or(self.image_resolution),
            video_resolution: overrides.video_resolution.or(self.video_resolution),
            relative_scheme: overrides.relative_scheme.or(self.relative_scheme),
            target: overrides.target.or(self.target),
            mock: overrides.mock.or(self.mock),
        }
    }
}

/// Validated, read-only configuration of a feed transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    /// Identifier of the container that receives the markup.
    pub target: String,
    pub render: RenderConfig,
    pub sort: SortSpec,
    /// Skip rendering and insertion, only report success and pagination.
    pub mock: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            render: RenderConfig::default(),
            sort: SortSpec::None,
            mock: false,
        }
    }
}

impl FeedConfig {
    /// Validate `options`, filling unset fields with defaults.
    pub fn from_options(options: &FeedOptions) -> Result<Self, ConfigError> {
        let sort = match &options.sort {
            Some(sort) => sort.parse()?,
            None => SortSpec::None,
        };

        let defaults = Templates::default();
        let templates = Templates {
            image: options.image_template.clone().unwrap_or(defaults.image),
            video: options.video_template.clone().unwrap_or(defaults.video),
            carousel_frame: options
                .carousel_frame_template
                .clone()
                .unwrap_or(defaults.carousel_frame),
            carousel_image: options
                .carousel_image_template
                .clone()
                .unwrap_or(defaults.carousel_image),
            carousel_video: options
                .carousel_video_template
                .clone()
                .unwrap_or(defaults.carousel_video),
        };

        let image_resolution = match &options.image_resolution {
            Some(resolution) => resolution.parse()?,
            None => ImageResolution::default(),
        };
        let video_resolution = match &options.video_resolution {
            Some(resolution) => resolution.parse()?,
            None => VideoResolution::default(),
        };

        let target = match &options.target {
            Some(target) if target.trim().is_empty() => {
                return Err(ConfigError::Invalid("target"));
            }
            Some(target) => target.clone(),
            None => DEFAULT_TARGET.to_string(),
        };

        Ok(Self {
            target,
            render: RenderConfig {
                templates,
                image_resolution,
                video_resolution,
                relative_scheme: options.relative_scheme.unwrap_or(false),
            },
            sort,
            mock: options.mock.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{Direction, Metric};

    #[test]
    fn test_defaults() {
        let config = FeedConfig::from_options(&FeedOptions::default()).unwrap();

        assert_eq!(config, FeedConfig::default());
        assert_eq!(config.target, "instafeed");
        assert_eq!(config.render.image_resolution, ImageResolution::Thumbnail);
        assert_eq!(
            config.render.video_resolution,
            VideoResolution::StandardResolution
        );
        assert_eq!(config.render.templates.image, DEFAULT_IMAGE_TEMPLATE);
        assert_eq!(config.render.templates.video, DEFAULT_PREVIEW_TEMPLATE);
        assert_eq!(
            config.render.templates.carousel_frame,
            DEFAULT_PREVIEW_TEMPLATE
        );
        assert!(config.render.templates.carousel_image.is_empty());
        assert!(config.render.templates.carousel_video.is_empty());
        assert!(!config.render.relative_scheme);
        assert!(!config.mock);
        assert_eq!(config.sort, SortSpec::None);
    }

    #[test]
    fn test_explicit_options() {
        let options = FeedOptions {
            sort: Some("least-commented".to_string()),
            image_template: Some("{{source}}".to_string()),
            image_resolution: Some("standard_resolution".to_string()),
            video_resolution: Some("low_bandwidth".to_string()),
            relative_scheme: Some(true),
            target: Some("gallery".to_string()),
            mock: Some(true),
            ..Default::default()
        };

        let config = FeedConfig::from_options(&options).unwrap();

        assert_eq!(config.target, "gallery");
        assert_eq!(config.render.templates.image, "{{source}}");
        assert_eq!(
            config.render.image_resolution,
            ImageResolution::StandardResolution
        );
        assert_eq!(config.render.video_resolution, VideoResolution::LowBandwidth);
        assert!(config.render.relative_scheme);
        assert!(config.mock);
        assert_eq!(
            config.sort,
            SortSpec::By {
                direction: Direction::Least,
                metric: Metric::Commented,
            }
        );
    }

    #[test]
    fn test_invalid_sort() {
        let options = FeedOptions {
            sort: Some("most-viewed".to_string()),
            ..Default::default()
        };

        assert_eq!(
            FeedConfig::from_options(&options),
            Err(ConfigError::Invalid("sort"))
        );
    }

    #[test]
    fn test_invalid_resolutions() {
        let options = FeedOptions {
            image_resolution: Some("low_bandwidth".to_string()),
            ..Default::default()
        };
        assert_eq!(
            FeedConfig::from_options(&options),
            Err(ConfigError::Invalid("image_resolution"))
        );

        let options = FeedOptions {
            video_resolution: Some("thumbnail".to_string()),
            ..Default::default()
        };
        assert_eq!(
            FeedConfig::from_options(&options),
            Err(ConfigError::Invalid("video_resolution"))
        );
    }

    #[test]
    fn test_blank_target_rejected() {
        let options = FeedOptions {
            target: Some("  ".to_string()),
            ..Default::default()
        };

        assert_eq!(
            FeedConfig::from_options(&options),
            Err(ConfigError::Invalid("target"))
        );
    }

    #[test]
    fn test_resolution_keys_round_trip_through_from_str() {
        for resolution in [
            ImageResolution::Thumbnail,
            ImageResolution::LowResolution,
            ImageResolution::StandardResolution,
        ] {
            assert_eq!(resolution.key().parse::<ImageResolution>(), Ok(resolution));
        }
        for resolution in [
            VideoResolution::StandardResolution,
            VideoResolution::LowBandwidth,
            VideoResolution::LowResolution,
        ] {
            assert_eq!(resolution.key().parse::<VideoResolution>(), Ok(resolution));
        }
    }

    #[test]
    fn test_from_toml_str() {
        let options = FeedOptions::from_toml_str(
            r#"
access_token = "abc"
get = "tag"
tag_name = "rust"
sort = "most-liked"
relative_scheme = true
"#,
        )
        .unwrap();

        assert_eq!(options.access_token.as_deref(), Some("abc"));
        assert_eq!(options.get.as_deref(), Some("tag"));
        assert_eq!(options.tag_name.as_deref(), Some("rust"));
        assert_eq!(options.sort.as_deref(), Some("most-liked"));
        assert_eq!(options.relative_scheme, Some(true));
        assert_eq!(options.limit, None);
    }

    #[test]
    fn test_from_toml_str_rejects_unknown_keys() {
        let result = FeedOptions::from_toml_str("acess_token = \"typo\"");
        assert!(matches!(result, Err(ConfigError::File(_))));
    }

    #[test]
    fn test_overlay_prefers_overrides() {
        let file = FeedOptions {
            access_token: Some("from-file".to_string()),
            sort: Some("random".to_string()),
            limit: Some(10),
            ..Default::default()
        };
        let flags = FeedOptions {
            sort: Some("most-recent".to_string()),
            mock: Some(true),
            ..Default::default()
        };

        let merged = file.overlay(flags);

        assert_eq!(merged.access_token.as_deref(), Some("from-file"));
        assert_eq!(merged.sort.as_deref(), Some("most-recent"));
        assert_eq!(merged.limit, Some(10));
        assert_eq!(merged.mock, Some(true));
    }
}
