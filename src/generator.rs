use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::Context as _;
use fs_extra::dir::CopyOptions;
use log::{debug, info, warn};
use serde_json::json;

use crate::{
    context::Context,
    metadata::{Post, PostMetadata},
};

mod data;
mod feed;
mod markdown;
mod utils;

use data::{ArticlePageData, ListPageData};

#[derive(Debug, PartialEq)]
pub(crate) enum RenderedPage {
    Post(String),
    NotFound(String),
}

fn write_page(path: &Path, html: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html).with_context(|| format!("while writing {path:?}"))
}

fn render_article(ctx: &Context, post: &Post) -> anyhow::Result<String> {
    let title = post.meta.title.as_deref().unwrap_or(&post.meta.slug);
    let data = ArticlePageData {
        site_name: &ctx.site_name,
        page_title: title,
        hero_image: utils::render_hero_image(post.meta.image.as_deref(), title),
        body: markdown::render_markdown(&post.body),
        meta: &post.meta,
    };
    ctx.handlebars
        .render("article", &data)
        .with_context(|| format!("while generating post {:?}", post.meta.slug))
}

fn render_not_found(ctx: &Context) -> anyhow::Result<String> {
    ctx.handlebars
        .render(
            "not_found",
            &json!({
                "site_name": ctx.site_name,
                "page_title": "Page Not Found",
            }),
        )
        .context("while generating not found page")
}

/// Renders the page for `slug`. A slug without a post renders the not
/// found page instead of failing.
pub(crate) fn render_post_page(ctx: &Context, slug: &str) -> anyhow::Result<RenderedPage> {
    match ctx.posts.get(slug) {
        Some(post) => Ok(RenderedPage::Post(render_article(ctx, &post)?)),
        None => Ok(RenderedPage::NotFound(render_not_found(ctx)?)),
    }
}

fn render_index(ctx: &Context, posts: &[PostMetadata]) -> anyhow::Result<String> {
    let empty_state = posts.is_empty().then(|| {
        utils::render_empty_state(
            "No publications yet",
            "Be the first to contribute! Check out our",
            Some(("contribution guide", "https://github.com/vinteumorg/Floresta")),
        )
    });
    let data = ListPageData {
        site_name: &ctx.site_name,
        page_title: "Blog",
        empty_state,
        posts,
    };
    ctx.handlebars
        .render("index", &data)
        .context("while generating blog index")
}

pub(crate) fn generate(ctx: &Context) -> anyhow::Result<()> {
    fs_extra::dir::remove(&ctx.out_dir)?;
    fs_extra::dir::create_all(&ctx.out_dir, false)?;

    // copy `public_dir`
    if let Some(public_dir) = &ctx.public_dir {
        let mut cp_opts = CopyOptions::new();
        cp_opts.content_only = true;
        cp_opts.overwrite = true;
        fs_extra::dir::copy(public_dir, &ctx.out_dir, &cp_opts)
            .with_context(|| format!("while copying {public_dir:?}"))?;
    }

    let blog_dir = ctx.out_dir.join("blog");
    let posts = ctx.posts.list()?;

    // index page
    write_page(&blog_dir.join("index.html"), &render_index(ctx, &posts)?)?;

    // article pages
    let mut generated = 0;
    for slug in ctx.posts.slugs()? {
        match render_post_page(ctx, &slug)? {
            RenderedPage::Post(html) => {
                debug!("Writing post {slug}");
                write_page(&blog_dir.join(&slug).join("index.html"), &html)?;
                generated += 1;
            }
            RenderedPage::NotFound(_) => {
                warn!("Post {slug:?} could not be read; no page generated");
            }
        }
    }

    write_page(&ctx.out_dir.join("404.html"), &render_not_found(ctx)?)?;

    // feed
    {
        let feed = feed::build_feed(&ctx.site_name, &ctx.site_url, &posts);
        let feed_path = blog_dir.join("feed.xml");
        let fd = File::create(&feed_path).with_context(|| format!("while writing {feed_path:?}"))?;
        let mut writer = feed.write_to(BufWriter::new(fd))?;
        writer.flush()?;
    }

    info!(
        "Generated {generated} posts from {:?} into {:?}",
        ctx.posts.root(),
        ctx.out_dir
    );
    Ok(())
}
