use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::front_matter::FrontMatter;

/// Everything a listing needs to know about a post. The body is not part of
/// it; see [`Post`].
#[derive(Serialize, Debug, Clone, PartialEq)]
pub(crate) struct PostMetadata {
    pub slug: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    pub tags: Vec<String>,
    pub image: Option<String>,
    pub excerpt: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub(crate) struct Post {
    #[serde(flatten)]
    pub meta: PostMetadata,
    pub body: String,
}

impl PostMetadata {
    pub fn from_front_matter(slug: &str, fm: &FrontMatter) -> Self {
        Self {
            slug: slug.to_string(),
            title: fm.string("title"),
            author: fm.string("author"),
            date: fm.string("date"),
            tags: fm.list("tags").unwrap_or_default(),
            image: fm.string("image"),
            excerpt: fm.string("excerpt").unwrap_or_default(),
        }
    }

    /// Calendar date the post was published on, if `date` can be read as
    /// one. Time of day and offset are dropped.
    pub fn published(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_date)
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|d| d.date_naive()))
        .or_else(|| {
            ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|d| d.date())
        })
}

/// Orders posts newest first. Posts without a readable date count as the
/// oldest ones; the sort is stable so equal dates keep their input order.
pub(crate) fn sort_newest_first(posts: &mut [PostMetadata]) {
    posts.sort_by_cached_key(|p| std::cmp::Reverse(p.published()));
}
