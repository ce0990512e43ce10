use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const PATCH_SMALL_PLACEHOLDER: &str = "https://via.placeholder.com/150";
pub const PATCH_PLACEHOLDER: &str = "https://via.placeholder.com/300";
pub const NO_DETAILS: &str = "No details available for this mission.";

/// Named media links attached to a launch. Every link is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchLinks {
    pub mission_patch: Option<String>,
    pub mission_patch_small: Option<String>,
    pub reddit_campaign: Option<String>,
    pub reddit_launch: Option<String>,
    pub reddit_recovery: Option<String>,
    pub reddit_media: Option<String>,
    pub presskit: Option<String>,
    pub article_link: Option<String>,
    pub wikipedia: Option<String>,
    pub video_link: Option<String>,
    pub youtube_id: Option<String>,
    pub flickr_images: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RocketInfo {
    pub rocket_id: String,
    pub rocket_name: String,
    pub rocket_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchSite {
    pub site_id: String,
    pub site_name: String,
    pub site_name_long: String,
}

/// One launch as returned by `/v3/launches`.
///
/// Records are never mutated after deserialization. The auxiliary fields
/// (static fire, timeline, crew) are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchRecord {
    pub flight_number: u32,
    pub mission_name: String,
    #[serde(default)]
    pub mission_id: Vec<String>,
    #[serde(default)]
    pub upcoming: bool,
    #[serde(default)]
    pub launch_year: String,
    #[serde(default)]
    pub launch_date_unix: i64,
    #[serde(default)]
    pub launch_date_utc: String,
    #[serde(default)]
    pub launch_date_local: String,
    #[serde(default)]
    pub is_tentative: bool,
    #[serde(default)]
    pub tentative_max_precision: String,
    #[serde(default)]
    pub tbd: bool,
    #[serde(default)]
    pub launch_window: Option<i64>,
    #[serde(default)]
    pub rocket: RocketInfo,
    #[serde(default)]
    pub ships: Vec<String>,
    #[serde(default)]
    pub launch_site: LaunchSite,
    #[serde(default)]
    pub launch_success: Option<bool>,
    #[serde(default)]
    pub links: LaunchLinks,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub static_fire_date_utc: Option<String>,
    #[serde(default)]
    pub static_fire_date_unix: Option<i64>,
    #[serde(default)]
    pub timeline: Option<serde_json::Value>,
    #[serde(default)]
    pub crew: Option<serde_json::Value>,
}

/// Identity of a card in the grid. Flight numbers alone have collided across
/// data revisions, so the launch timestamp is part of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardKey {
    pub flight_number: u32,
    pub launch_date_unix: i64,
}

impl fmt::Display for CardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.flight_number, self.launch_date_unix)
    }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

impl LaunchRecord {
    pub fn card_key(&self) -> CardKey {
        CardKey {
            flight_number: self.flight_number,
            launch_date_unix: self.launch_date_unix,
        }
    }

    /// Small patch image for cards, or the placeholder.
    pub fn patch_small_url(&self) -> &str {
        non_empty(&self.links.mission_patch_small).unwrap_or(PATCH_SMALL_PLACEHOLDER)
    }

    /// Full-size patch image for the detail overlay, or the placeholder.
    pub fn patch_url(&self) -> &str {
        non_empty(&self.links.mission_patch).unwrap_or(PATCH_PLACEHOLDER)
    }

    pub fn details_text(&self) -> &str {
        non_empty(&self.details).unwrap_or(NO_DETAILS)
    }

    pub fn launch_date(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.launch_date_utc).ok()
    }
}
