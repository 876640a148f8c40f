use atom_syndication::{Entry, Feed, Link, Person, Text};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

use crate::{metadata::PostMetadata, posts::post_path};

fn to_timestamp(date: NaiveDate) -> DateTime<FixedOffset> {
    date.and_time(NaiveTime::MIN).and_utc().fixed_offset()
}

fn link(href: String, rel: &str) -> Link {
    let mut link = Link::default();
    link.set_href(href);
    link.set_rel(rel);
    link
}

/// Atom feed over `posts`, which are expected newest first.
///
/// Undated posts are stamped with the Unix epoch.
pub(super) fn build_feed(site_name: &str, site_url: &str, posts: &[PostMetadata]) -> Feed {
    let base = site_url.trim_end_matches('/');
    let epoch = NaiveDateTime::default().and_utc().fixed_offset();

    let entries: Vec<Entry> = posts
        .iter()
        .map(|post| {
            let url = format!("{base}{}", post_path(&post.slug));
            let published = post.published().map(to_timestamp);

            let mut entry = Entry::default();
            entry.set_id(url.clone());
            entry.set_title(Text::plain(post.title.clone().unwrap_or_else(|| post.slug.clone())));
            entry.set_updated(published.unwrap_or(epoch));
            entry.set_published(published);
            entry.set_links(vec![link(url, "alternate")]);
            if let Some(author) = &post.author {
                let mut person = Person::default();
                person.set_name(author.clone());
                entry.set_authors(vec![person]);
            }
            if !post.excerpt.is_empty() {
                entry.set_summary(Some(Text::plain(post.excerpt.clone())));
            }
            entry
        })
        .collect();

    let updated = entries
        .iter()
        .map(|e| *e.updated())
        .max()
        .unwrap_or(epoch);

    let mut feed = Feed::default();
    feed.set_id(format!("{base}/blog/"));
    feed.set_title(Text::plain(format!("{site_name} Blog")));
    feed.set_updated(updated);
    feed.set_links(vec![
        link(format!("{base}/blog/"), "alternate"),
        link(format!("{base}/blog/feed.xml"), "self"),
    ]);
    feed.set_entries(entries);
    feed
}
