use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context as _};
use log::{debug, warn};

use crate::{
    front_matter,
    metadata::{self, Post, PostMetadata},
};

pub(crate) const POST_EXTENSION: &str = "md";

/// `example.md` is the authoring template. It is never published.
pub(crate) const TEMPLATE_SLUG: &str = "example";

/// Read-only view of a directory of markdown posts.
///
/// Nothing is cached: every call goes back to the filesystem, so a post
/// disappears as soon as its file is removed.
#[derive(Debug, Clone)]
pub(crate) struct PostRepository {
    root: PathBuf,
}

impl PostRepository {
    pub fn open(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            bail!("content directory {root:?} must be a directory.");
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Metadata of every published post, newest first.
    ///
    /// A file that cannot be read is skipped with a warning. Failing to read
    /// the directory itself is an error.
    pub fn list(&self) -> anyhow::Result<Vec<PostMetadata>> {
        let mut posts = vec![];
        for (slug, path) in self.post_files()? {
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping {path:?}: {e}");
                    continue;
                }
            };
            let (fm, _) = front_matter::parse(&content);
            if fm.is_empty() {
                debug!("{path:?} has no metadata");
            }
            posts.push(PostMetadata::from_front_matter(&slug, &fm));
        }
        metadata::sort_newest_first(&mut posts);
        Ok(posts)
    }

    /// Looks up a single post. Unknown slugs, the template and unreadable
    /// files all come back as `None`.
    pub fn get(&self, slug: &str) -> Option<Post> {
        if !is_valid_slug(slug) || slug == TEMPLATE_SLUG {
            debug!("Refusing lookup of {slug:?}");
            return None;
        }
        let path = self.root.join(format!("{slug}.{POST_EXTENSION}"));
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                debug!("No post at {path:?}: {e}");
                return None;
            }
        };
        let (fm, body) = front_matter::parse(&content);
        Some(Post {
            meta: PostMetadata::from_front_matter(slug, &fm),
            body: body.to_string(),
        })
    }

    /// Slugs of every published post, in file name order.
    pub fn slugs(&self) -> anyhow::Result<Vec<String>> {
        Ok(self
            .post_files()?
            .into_iter()
            .map(|(slug, _)| slug)
            .collect())
    }

    fn post_files(&self) -> anyhow::Result<Vec<(String, PathBuf)>> {
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("while reading content directory {:?}", self.root))?;

        let mut files = vec![];
        for entry in entries {
            let entry =
                entry.with_context(|| format!("while reading content directory {:?}", self.root))?;
            let path = entry.path();
            let Some(slug) = slug_of(&path) else {
                continue;
            };
            if slug == TEMPLATE_SLUG || !path.is_file() {
                debug!("Ignoring {path:?}");
                continue;
            }
            files.push((slug, path));
        }
        // read_dir order is platform dependent
        files.sort();
        Ok(files)
    }
}

fn slug_of(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let slug = name.strip_suffix(POST_EXTENSION)?.strip_suffix('.')?;
    is_valid_slug(slug).then(|| slug.to_string())
}

/// Site-absolute path of a post page. The slug is percent-encoded, so any
/// file name yields a working link.
pub(crate) fn post_path(slug: &str) -> String {
    format!("/blog/{}/", urlencoding::encode(slug))
}

// Hidden files (`.draft.md`) are never published, and a slug can not name
// anything outside the content directory.
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && !slug.starts_with('.') && !slug.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn post(title: &str, date: &str) -> String {
        format!("---\ntitle: {title}\nauthor: Floresta Team\ndate: {date}\ntags: [bitcoin]\nimage: /images/{title}.png\nexcerpt: About {title}\n---\n\n# {title}\n\nBody of {title}.\n")
    }

    /// `a.md`, `b.md` and the `example.md` template.
    fn setup_posts() -> (TempDir, PostRepository) {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.md", &post("a", "2024-01-01"));
        write(tmp.path(), "b.md", &post("b", "2025-06-01"));
        write(tmp.path(), "example.md", &post("example", "2030-01-01"));
        let repo = PostRepository::open(tmp.path()).unwrap();
        (tmp, repo)
    }

    #[test]
    fn open_requires_a_directory() {
        let tmp = TempDir::new().unwrap();
        assert!(PostRepository::open(tmp.path().join("missing")).is_err());

        write(tmp.path(), "file.md", "");
        assert!(PostRepository::open(tmp.path().join("file.md")).is_err());
    }

    #[test]
    fn listing_is_newest_first_and_skips_template() {
        let (_tmp, repo) = setup_posts();
        let posts = repo.list().unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["b", "a"]);
        assert_eq!(posts[0].title.as_deref(), Some("b"));
        assert_eq!(posts[0].excerpt, "About b");
    }

    #[test]
    fn slugs_skip_template() {
        let (_tmp, repo) = setup_posts();
        let slugs: BTreeSet<_> = repo.slugs().unwrap().into_iter().collect();
        assert_eq!(slugs, BTreeSet::from(["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn template_is_never_returned() {
        let (_tmp, repo) = setup_posts();
        assert_eq!(repo.get("example"), None);
    }

    #[test]
    fn get_returns_metadata_and_body() {
        let (_tmp, repo) = setup_posts();
        let post = repo.get("a").unwrap();
        assert_eq!(post.meta.slug, "a");
        assert_eq!(post.meta.date.as_deref(), Some("2024-01-01"));
        assert_eq!(post.meta.tags, vec!["bitcoin"]);
        assert!(post.body.contains("Body of a."));
        assert!(!post.body.contains("excerpt:"));

        let listed = repo.list().unwrap().into_iter().find(|p| p.slug == "a").unwrap();
        assert_eq!(post.meta, listed);
    }

    #[test]
    fn unknown_slugs_are_absent() {
        let (_tmp, repo) = setup_posts();
        assert_eq!(repo.get("nonexistent"), None);
        assert_eq!(repo.get(""), None);
        assert_eq!(repo.get("../a"), None);
        assert_eq!(repo.get("a.md"), None);
    }

    #[test]
    fn removed_post_disappears() {
        let (tmp, repo) = setup_posts();
        fs::remove_file(tmp.path().join("a.md")).unwrap();
        assert_eq!(repo.get("a"), None);
        assert_eq!(repo.slugs().unwrap(), vec!["b"]);
        assert_eq!(repo.list().unwrap().len(), 1);
    }

    #[test]
    fn ignores_other_files_and_directories() {
        let (tmp, repo) = setup_posts();
        write(tmp.path(), "notes.txt", "not a post");
        write(tmp.path(), "README", "not a post");
        write(tmp.path(), ".hidden.md", &post("hidden", "2024-02-02"));
        fs::create_dir(tmp.path().join("drafts.md")).unwrap();
        fs::create_dir(tmp.path().join("images")).unwrap();

        assert_eq!(repo.slugs().unwrap(), vec!["a", "b"]);
        assert_eq!(repo.list().unwrap().len(), 2);
        assert_eq!(repo.get("drafts"), None);
    }

    #[test]
    fn missing_optional_fields_get_defaults() {
        let (tmp, repo) = setup_posts();
        write(tmp.path(), "bare.md", "---\ntitle: Bare\ndate: 2024-03-01\n---\ntext\n");
        let post = repo.get("bare").unwrap();
        assert!(post.meta.tags.is_empty());
        assert_eq!(post.meta.excerpt, "");
        assert_eq!(post.meta.author, None);
    }

    #[test]
    fn malformed_metadata_does_not_fail() {
        let (tmp, repo) = setup_posts();
        write(tmp.path(), "broken.md", "---\ntitle: [oops\n---\nstill readable\n");
        let post = repo.get("broken").unwrap();
        assert_eq!(post.meta.title, None);
        assert_eq!(post.body, "still readable\n");

        let slugs: Vec<_> = repo.list().unwrap().into_iter().map(|p| p.slug).collect();
        // no date sorts last
        assert_eq!(slugs, vec!["b", "a", "broken"]);
    }

    #[test]
    fn unreadable_file_is_skipped_in_listing() {
        let (tmp, repo) = setup_posts();
        fs::write(tmp.path().join("binary.md"), [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let slugs: Vec<_> = repo.list().unwrap().into_iter().map(|p| p.slug).collect();
        assert_eq!(slugs, vec!["b", "a"]);
        assert_eq!(repo.get("binary"), None);
    }

    #[test]
    fn listing_is_non_increasing_by_date() {
        let (tmp, repo) = setup_posts();
        write(tmp.path(), "c.md", &post("c", "2024-08-15"));
        write(tmp.path(), "d.md", &post("d", "not a date"));
        write(tmp.path(), "e.md", &post("e", "2025-06-01"));

        let posts = repo.list().unwrap();
        for pair in posts.windows(2) {
            assert!(pair[0].published() >= pair[1].published(), "{pair:?}");
        }
        // b and e share a date and keep file name order
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["b", "e", "c", "a", "d"]);
    }

    #[test]
    fn post_paths_are_url_safe() {
        assert_eq!(post_path("understanding-utreexo"), "/blog/understanding-utreexo/");
        assert_eq!(post_path("c#sharp"), "/blog/c%23sharp/");
        assert_eq!(post_path("what is utreexo?"), "/blog/what%20is%20utreexo%3F/");
    }

    #[test]
    fn unusual_file_names_keep_their_slug() {
        let (tmp, repo) = setup_posts();
        write(tmp.path(), "c#sharp.md", &post("c#sharp", "2024-06-01"));
        assert_eq!(repo.slugs().unwrap(), vec!["a", "b", "c#sharp"]);
        assert_eq!(repo.get("c#sharp").unwrap().meta.slug, "c#sharp");
    }

    #[test]
    fn reads_are_idempotent() {
        let (_tmp, repo) = setup_posts();
        assert_eq!(repo.list().unwrap(), repo.list().unwrap());
        assert_eq!(repo.slugs().unwrap(), repo.slugs().unwrap());
        assert_eq!(repo.get("b"), repo.get("b"));
    }

    #[test]
    fn empty_directory_has_no_posts() {
        let tmp = TempDir::new().unwrap();
        let repo = PostRepository::open(tmp.path()).unwrap();
        assert!(repo.list().unwrap().is_empty());
        assert!(repo.slugs().unwrap().is_empty());
    }

    #[test]
    fn listing_fails_when_directory_vanishes() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("posts");
        fs::create_dir(&dir).unwrap();
        let repo = PostRepository::open(&dir).unwrap();
        fs::remove_dir(&dir).unwrap();
        assert!(repo.list().is_err());
        assert!(repo.slugs().is_err());
    }
}
