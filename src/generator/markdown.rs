use std::{collections::HashSet, sync::LazyLock};

use ammonia::{Builder, UrlRelative};
use pulldown_cmark::{html, Options, Parser};

/// Tags kept in a rendered post: what markdown produces plus the raw html
/// used for call-to-action blocks. Anything else is dropped.
const ALLOWED_TAGS: &[&str] = &[
    "a",
    "b",
    "blockquote",
    "br",
    "code",
    "del",
    "div",
    "em",
    "figcaption",
    "figure",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "hr",
    "i",
    "img",
    "input",
    "li",
    "ol",
    "p",
    "pre",
    "section",
    "span",
    "strong",
    "sup",
    "table",
    "tbody",
    "td",
    "th",
    "thead",
    "tr",
    "ul",
];

static SANITIZER: LazyLock<Builder<'static>> = LazyLock::new(|| {
    let mut builder = Builder::empty();
    builder
        .add_tags(ALLOWED_TAGS)
        .clean_content_tags(HashSet::from(["script", "style"]))
        .add_generic_attributes(&["class", "id", "title"])
        .add_tag_attributes("a", &["href", "target"])
        .add_tag_attributes("img", &["src", "alt", "width", "height"])
        .add_tag_attributes("input", &["type", "checked", "disabled"])
        .add_tag_attributes("ol", &["start"])
        .add_tag_attributes("th", &["style"])
        .add_tag_attributes("td", &["style"])
        .url_schemes(HashSet::from(["http", "https", "mailto"]))
        .url_relative(UrlRelative::PassThrough)
        .link_rel(None);
    builder
});

/// Renders a post body to html: GitHub flavoured markdown plus the small
/// set of raw tags in `ALLOWED_TAGS`. Event handlers and urls outside
/// http, https, mailto and relative paths are removed.
pub(crate) fn render_markdown(body: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);

    let mut body_html = String::new();
    html::push_html(&mut body_html, Parser::new_ext(body, options));
    SANITIZER.clean(&body_html).to_string()
}
