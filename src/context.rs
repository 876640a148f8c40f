use std::path::PathBuf;

use crate::posts::PostRepository;

/// Everything one build needs. Passed explicitly so tests can point it at
/// temporary directories.
#[derive(Debug)]
pub(crate) struct Context {
    pub posts: PostRepository,
    pub out_dir: PathBuf,
    pub public_dir: Option<PathBuf>,

    pub site_name: String,
    pub site_url: String,

    pub handlebars: handlebars::Handlebars<'static>,
}
