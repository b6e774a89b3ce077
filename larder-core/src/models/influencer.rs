//! Influencer records

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Social media links for an influencer.
///
/// The well-known networks get their own fields; anything else stored in the
/// column is kept in `other` so a round trip never drops a link. Any JSON
/// object decodes: a known network holding a non-string value stays in
/// `other` untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct SocialMedia {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiktok: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

fn take_link(links: &mut Map<String, Value>, network: &str) -> Option<String> {
    match links.remove(network)? {
        Value::String(link) => Some(link),
        Value::Null => None,
        other => {
            links.insert(network.to_owned(), other);
            None
        }
    }
}

impl From<Map<String, Value>> for SocialMedia {
    fn from(mut links: Map<String, Value>) -> Self {
        Self {
            instagram: take_link(&mut links, "instagram"),
            youtube: take_link(&mut links, "youtube"),
            tiktok: take_link(&mut links, "tiktok"),
            website: take_link(&mut links, "website"),
            other: links.into_iter().collect(),
        }
    }
}

impl SocialMedia {
    pub fn is_empty(&self) -> bool {
        self.instagram.is_none()
            && self.youtube.is_none()
            && self.tiktok.is_none()
            && self.website.is_none()
            && self.other.is_empty()
    }
}

/// Influencer as the admin surface sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Influencer {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub cover_image: String,
    pub bio: String,
    pub social_media: SocialMedia,
    pub specialties: Vec<String>,
    pub followers: u64,
    pub recipes_count: u64,
}

/// Everything needed to create an influencer; the id is assigned by storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewInfluencer {
    pub name: String,
    pub avatar: String,
    pub cover_image: String,
    pub bio: String,
    pub social_media: SocialMedia,
    pub specialties: Vec<String>,
    pub followers: u64,
    pub recipes_count: u64,
}

/// Fields to change on an existing influencer. `None` means "leave alone".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InfluencerPatch {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
    pub bio: Option<String>,
    pub social_media: Option<SocialMedia>,
    pub specialties: Option<Vec<String>>,
    pub followers: Option<u64>,
    pub recipes_count: Option<u64>,
}

impl InfluencerPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<Influencer> for NewInfluencer {
    fn from(influencer: Influencer) -> Self {
        Self {
            name: influencer.name,
            avatar: influencer.avatar,
            cover_image: influencer.cover_image,
            bio: influencer.bio,
            social_media: influencer.social_media,
            specialties: influencer.specialties,
            followers: influencer.followers,
            recipes_count: influencer.recipes_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn social_media_keeps_unknown_networks() {
        let links: SocialMedia = serde_json::from_value(json!({
            "instagram": "@chef",
            "mastodon": "@chef@cooking.social"
        }))
        .unwrap();

        assert_eq!(links.instagram.as_deref(), Some("@chef"));
        assert_eq!(
            links.other.get("mastodon").and_then(Value::as_str),
            Some("@chef@cooking.social")
        );

        let back = serde_json::to_value(&links).unwrap();
        assert_eq!(back["mastodon"], "@chef@cooking.social");
        assert!(back.get("youtube").is_none());
    }

    #[test]
    fn social_media_accepts_any_json_object() {
        let stored = json!({
            "instagram": "@chef",
            "twitter": null,
            "youtube": {"url": "https://youtube.com/@chef", "subs": 5},
            "website": null
        });
        let links: SocialMedia = serde_json::from_value(stored.clone()).unwrap();

        assert_eq!(links.instagram.as_deref(), Some("@chef"));
        assert_eq!(links.youtube, None);
        assert_eq!(links.other["youtube"]["subs"], 5);
        assert_eq!(links.other["twitter"], Value::Null);

        let back = serde_json::to_value(&links).unwrap();
        assert_eq!(back["youtube"], stored["youtube"]);
        assert_eq!(back["twitter"], Value::Null);
        assert!(back.get("website").is_none());
    }

    #[test]
    fn empty_patch() {
        assert!(InfluencerPatch::default().is_empty());
        let patch = InfluencerPatch {
            bio: Some("bread".into()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn serializes_camel_case() {
        let value = serde_json::to_value(NewInfluencer {
            cover_image: "cover.png".into(),
            recipes_count: 3,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(value["coverImage"], "cover.png");
        assert_eq!(value["recipesCount"], 3);
    }
}
