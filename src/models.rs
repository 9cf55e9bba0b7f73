use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Highest rating the star widget accepts.
pub const MAX_STARS: i32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Band {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub members: Vec<Member>,
}

/// An event as returned by the remote API.
///
/// Keys this client does not know about are kept in `extra` so that an
/// update (which sends the whole event back) does not drop them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub img_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub bands: Vec<Band>,
    #[serde(default)]
    pub nb_stars: Option<i32>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Event {
    pub fn new(id: i64, title: &str) -> Self {
        Self {
            id,
            title: Some(title.to_string()),
            img_url: None,
            bands: Vec::new(),
            nb_stars: None,
            comment: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Set the rating, rejecting values outside `0..=MAX_STARS`.
    pub fn set_stars(&mut self, stars: i32) -> Result<()> {
        validate_stars(stars)?;
        self.nb_stars = Some(stars);
        Ok(())
    }

    /// Names of every band member across all bands, skipping unnamed ones.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.bands
            .iter()
            .flat_map(|b| b.members.iter())
            .filter_map(|m| m.name.as_deref())
    }
}

pub fn validate_stars(stars: i32) -> Result<()> {
    if !(0..=MAX_STARS).contains(&stars) {
        return Err(anyhow!("stars must be between 0 and {}, got {}", MAX_STARS, stars));
    }
    Ok(())
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    let v: Option<Vec<T>> = Option::deserialize(deserializer)?;
    Ok(v.unwrap_or_default())
}
