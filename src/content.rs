// src/content.rs
//! # Content collections
//!
//! Typed schemas for the site's data collections (quick info, socials, tags,
//! posts, projects), loaded from JSON arrays.
//!
//! - Icons are either Lucide or Simple Icons, tagged by `type`.
//! - Link fields must be absolute URLs.
//! - Dates accept `YYYY-MM-DD` or a full RFC 3339 timestamp.
//! - Post tags must reference an existing tag id.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use std::{fs, path::Path};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Icon {
    Lucide { name: String },
    SimpleIcons { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuickInfo {
    pub id: u32,
    pub icon: Icon,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Social {
    pub id: u32,
    pub icon: Icon,
    pub text: String,
    #[serde(deserialize_with = "de_url")]
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tag {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectInfo {
    pub text: String,
    pub icon: Icon,
    #[serde(default, deserialize_with = "de_opt_url")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "de_date")]
    pub date: NaiveDate,
    /// Image path relative to the site's asset root.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "de_opt_url")]
    pub link: Option<String>,
    #[serde(default)]
    pub info: Vec<ProjectInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub title: String,
    #[serde(deserialize_with = "de_date")]
    pub created_at: NaiveDate,
    #[serde(default, deserialize_with = "de_opt_date")]
    pub updated_at: Option<NaiveDate>,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub draft: bool,
    pub image: String,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date '{s}': {e}"))
}

fn check_url(raw: &str) -> Result<String, String> {
    reqwest::Url::parse(raw.trim())
        .map(|_| raw.trim().to_string())
        .map_err(|e| format!("invalid url '{raw}': {e}"))
}

fn de_date<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
    let s = String::deserialize(d)?;
    parse_date(&s).map_err(serde::de::Error::custom)
}

fn de_opt_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    Option::<String>::deserialize(d)?
        .map(|s| parse_date(&s).map_err(serde::de::Error::custom))
        .transpose()
}

fn de_url<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let s = String::deserialize(d)?;
    check_url(&s).map_err(serde::de::Error::custom)
}

fn de_opt_url<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Option::<String>::deserialize(d)?
        .map(|s| check_url(&s).map_err(serde::de::Error::custom))
        .transpose()
}

/// Load one collection from a JSON array file.
pub fn load_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading collection from {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("parsing collection {}", path.display()))
}

// Missing file → empty collection; unreadable or malformed → error.
fn load_optional<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if path.exists() {
        load_collection(path)
    } else {
        Ok(Vec::new())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Collections {
    pub quick_info: Vec<QuickInfo>,
    pub socials: Vec<Social>,
    pub tags: Vec<Tag>,
    pub posts: Vec<Post>,
    pub projects: Vec<Project>,
}

impl Collections {
    /// Load `info.json`, `socials.json`, `tags.json`, `posts.json` and
    /// `projects.json` from `dir`, then check cross-references.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let c = Self {
            quick_info: load_optional(&dir.join("info.json"))?,
            socials: load_optional(&dir.join("socials.json"))?,
            tags: load_optional(&dir.join("tags.json"))?,
            posts: load_optional(&dir.join("posts.json"))?,
            projects: load_optional(&dir.join("projects.json"))?,
        };
        c.validate_references()?;
        info!(
            target: "content",
            posts = c.posts.len(),
            projects = c.projects.len(),
            tags = c.tags.len(),
            "content collections loaded"
        );
        Ok(c)
    }

    /// Every post tag must name an existing tag.
    pub fn validate_references(&self) -> Result<()> {
        let mut unknown: Vec<String> = Vec::new();
        for post in &self.posts {
            for tag in &post.tags {
                if !self.tags.iter().any(|t| &t.id == tag) {
                    unknown.push(format!("{} -> {}", post.title, tag));
                }
            }
        }
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("unknown tag references: {}", unknown.join(", ")))
        }
    }

    /// Non-draft posts, newest first.
    pub fn published_posts(&self) -> Vec<&Post> {
        let mut out: Vec<&Post> = self.posts.iter().filter(|p| !p.draft).collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    /// Projects for the carousel, newest first.
    pub fn featured_projects(&self) -> Vec<Project> {
        let mut out = self.projects.clone();
        out.sort_by(|a, b| b.date.cmp(&a.date));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_union_is_tagged_by_type() {
        let l: Icon = serde_json::from_str(r#"{"type":"lucide","name":"code"}"#).unwrap();
        assert_eq!(l, Icon::Lucide { name: "code".into() });
        let s: Icon = serde_json::from_str(r#"{"type":"simple-icons","name":"reddit"}"#).unwrap();
        assert_eq!(s, Icon::SimpleIcons { name: "reddit".into() });
        assert!(serde_json::from_str::<Icon>(r#"{"type":"emoji","name":"x"}"#).is_err());
    }

    #[test]
    fn dates_accept_plain_and_rfc3339() {
        assert_eq!(
            parse_date("2024-10-10").unwrap(),
            NaiveDate::from_ymd_opt(2024, 10, 10).unwrap()
        );
        assert_eq!(
            parse_date("2024-09-15T08:30:00Z").unwrap(),
            NaiveDate::from_ymd_opt(2024, 9, 15).unwrap()
        );
        assert!(parse_date("15/09/2024").is_err());
    }

    #[test]
    fn social_link_must_be_a_url() {
        let ok: Social = serde_json::from_str(
            r#"{
                "id": 1,
                "icon": { "type": "simple-icons", "name": "github" },
                "text": "GitHub",
                "link": "https://github.com/x"
            }"#,
        )
        .unwrap();
        assert_eq!(ok.link, "https://github.com/x");

        let bad = serde_json::from_str::<Social>(
            r#"{"id":1,"icon":{"type":"lucide","name":"x"},"text":"X","link":"not a url"}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn post_draft_defaults_to_false() {
        let p: Post = serde_json::from_str(
            r#"{
                "title": "Hello",
                "createdAt": "2024-01-02",
                "description": "d",
                "tags": ["rust"],
                "image": "hello.png"
            }"#,
        )
        .unwrap();
        assert!(!p.draft);
        assert!(p.updated_at.is_none());
    }
}
