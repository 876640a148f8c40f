use std::path::Path;

use anyhow::Context;
use handlebars::{handlebars_helper, Handlebars};

const LAYOUT: &str = include_str!("../templates/layout.hbs");

const TEMPLATES: &[(&str, &str)] = &[
    ("index", include_str!("../templates/index.hbs")),
    ("article", include_str!("../templates/article.hbs")),
    ("not_found", include_str!("../templates/not_found.hbs")),
];

handlebars_helper!(join: |items: array, sep: str| {
    items
        .iter()
        .filter_map(|v| v.as_str())
        .collect::<Vec<_>>()
        .join(sep)
});

handlebars_helper!(post_url: |slug: str| crate::posts::post_path(slug));

/// Builds the template registry. Built-in templates are used unless
/// `template_dir` holds a file of the same name (`index.hbs`,
/// `layout.hbs`, ...).
pub(crate) fn generate_renderer(template_dir: Option<&Path>) -> anyhow::Result<Handlebars<'static>> {
    let mut handlebars = Handlebars::new();
    handlebars.register_helper("join", Box::new(join));
    handlebars.register_helper("post_url", Box::new(post_url));

    handlebars
        .register_partial("layout", LAYOUT)
        .context("layout.hbs")?;
    for (name, source) in TEMPLATES {
        handlebars
            .register_template_string(name, source)
            .with_context(|| format!("{name}.hbs"))?;
    }

    let Some(template_dir) = template_dir else {
        return Ok(handlebars);
    };

    let layout_path = template_dir.join("layout.hbs");
    if layout_path.is_file() {
        handlebars.register_partial(
            "layout",
            std::fs::read_to_string(&layout_path).context("layout.hbs")?,
        )?;
    }
    for (name, _) in TEMPLATES {
        let path = template_dir.join(format!("{name}.hbs"));
        if path.is_file() {
            handlebars
                .register_template_file(name, &path)
                .with_context(|| format!("{name}.hbs"))?;
        }
    }

    Ok(handlebars)
}
