use serde::Serialize;

use crate::metadata::PostMetadata;

#[derive(Serialize, Debug)]
pub(super) struct ArticlePageData<'a> {
    pub site_name: &'a str,
    pub page_title: &'a str,
    pub hero_image: String,
    pub body: String,
    pub meta: &'a PostMetadata,
}

#[derive(Serialize, Debug)]
pub(super) struct ListPageData<'a> {
    pub site_name: &'a str,
    pub page_title: &'a str,
    /// Pre-rendered html shown instead of the list when there are no posts.
    pub empty_state: Option<String>,
    pub posts: &'a [PostMetadata],
}
