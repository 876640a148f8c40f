use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _};
use clap::{command, value_parser, Arg, ArgMatches};
use log::info;

use context::Context;
use generator::generate;
use posts::PostRepository;

mod context;
mod front_matter;
mod generator;
mod metadata;
mod posts;
mod renderer;

fn path_arg(matches: &ArgMatches, name: &str) -> anyhow::Result<PathBuf> {
    matches
        .get_one::<PathBuf>(name)
        .cloned()
        .with_context(|| format!("{name} is required"))
}

/// `out_dir` is wiped before every build, so it must not contain any of the
/// input directories.
fn check_out_dir(out_dir: &Path, inputs: &[&Path]) -> anyhow::Result<()> {
    if !out_dir.exists() {
        return Ok(());
    }
    let out_dir = out_dir
        .canonicalize()
        .with_context(|| format!("while resolving {out_dir:?}"))?;
    for input in inputs {
        let resolved = input
            .canonicalize()
            .with_context(|| format!("while resolving {input:?}"))?;
        if resolved.starts_with(&out_dir) {
            bail!("out_dir({out_dir:?}) contains {input:?}; refusing to remove it.");
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let matches = command!()
        .args([
            Arg::new("content_dir")
                .help("Directory path of blog posts")
                .value_parser(value_parser!(PathBuf))
                .default_value("content/posts"),
            Arg::new("out_dir")
                .help("Directory path of output. Existing contents will be removed.")
                .value_parser(value_parser!(PathBuf))
                .default_value("out"),
            Arg::new("public_dir")
                .help("Directory path of public. Contents will be copied as it is.")
                .value_parser(value_parser!(PathBuf))
                .default_value("public"),
            Arg::new("template_dir")
                .long("template-dir")
                .help("Directory of templates overriding the built-in ones")
                .value_parser(value_parser!(PathBuf)),
        ])
        .get_matches();

    let content_dir = path_arg(&matches, "content_dir")?;
    let posts = PostRepository::open(&content_dir)?;

    let out_dir = path_arg(&matches, "out_dir")?;
    if out_dir.exists() && !out_dir.is_dir() {
        bail!("if out_dir exists, it must be directory.");
    }

    let public_dir = path_arg(&matches, "public_dir")?;
    let public_dir = if public_dir.is_dir() {
        Some(public_dir)
    } else if public_dir.exists() {
        bail!("public_dir must be a directory.");
    } else {
        info!("public_dir({public_dir:?}) does not exist. ignoring...");
        None
    };

    let template_dir = matches.get_one::<PathBuf>("template_dir");
    if let Some(template_dir) = template_dir {
        if !template_dir.is_dir() {
            bail!("template_dir must be a directory.");
        }
    }
    let handlebars = renderer::generate_renderer(template_dir.map(PathBuf::as_path))?;

    let mut inputs = vec![content_dir.as_path()];
    inputs.extend(public_dir.as_deref());
    inputs.extend(template_dir.map(PathBuf::as_path));
    check_out_dir(&out_dir, &inputs)?;

    let ctx = Context {
        posts,
        out_dir,
        public_dir,
        site_name: std::env::var("SITE_NAME").unwrap_or_else(|_| "Floresta".to_string()),
        site_url: std::env::var("SITE_URL").unwrap_or_default(),
        handlebars,
    };

    generate(&ctx)
}
