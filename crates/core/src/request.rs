//! Request construction for the recent-media endpoints
//!
//! Pure: turns [`FeedOptions`] into the URL of the first page. Later pages
//! use the `next_url` the API hands back.

use crate::config::FeedOptions;
use crate::error::ConfigError;

pub const API_BASE: &str = "https://api.instagram.com/v1/";

/// Whose media is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// `None` is the authenticated user (`self`).
    User(Option<u64>),
    Tag(String),
    Location(u64),
}

/// A validated first-page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    pub source: FeedSource,
    pub access_token: String,
    /// Page size; `None` leaves it to the API.
    pub limit: Option<u64>,
}

impl FeedRequest {
    pub fn from_options(options: &FeedOptions) -> Result<Self, ConfigError> {
        let source = match options.get.as_deref() {
            Some("tag") => {
                let tag_name = options
                    .tag_name
                    .as_ref()
                    .filter(|tag| !tag.is_empty())
                    .ok_or(ConfigError::Missing("tag_name"))?;
                FeedSource::Tag(tag_name.clone())
            }
            Some("location") => {
                let location_id = options.location_id.ok_or(ConfigError::Missing("location_id"))?;
                FeedSource::Location(location_id)
            }
            None | Some("user") => FeedSource::User(options.user_id),
            Some(_) => return Err(ConfigError::Invalid("get")),
        };

        let access_token = options
            .access_token
            .as_ref()
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::Missing("access_token"))?
            .clone();

        Ok(Self {
            source,
            access_token,
            limit: options.limit.filter(|limit| *limit > 0),
        })
    }

    /// URL of the first page.
    pub fn url(&self) -> String {
        let path = match &self.source {
            FeedSource::User(Some(id)) => format!("users/{id}"),
            FeedSource::User(None) => "users/self".to_string(),
            FeedSource::Tag(tag) => format!("tags/{}", urlencoding::encode(tag)),
            FeedSource::Location(id) => format!("locations/{id}"),
        };

        let mut url = format!(
            "{API_BASE}{path}/media/recent?access_token={}",
            urlencoding::encode(&self.access_token)
        );
        if let Some(limit) = self.limit {
            url.push_str(&format!("&count={limit}"));
        }
        url
    }
}
