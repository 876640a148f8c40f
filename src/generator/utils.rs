use maud::html;

pub(super) fn render_empty_state(
    title: &str,
    description: &str,
    link: Option<(&str, &str)>,
) -> String {
    html! {
        div.empty-state {
            h2 { (title) }
            p {
                (description)
                @if let Some((text, href)) = link {
                    " "
                    a href=(href) target="_blank" rel="noopener noreferrer" { (text) }
                }
            }
        }
    }
    .into()
}

pub(super) fn render_hero_image(src: Option<&str>, alt: &str) -> String {
    match src {
        Some(src) => html! {
            figure.hero-image {
                img src=(src) alt=(alt);
            }
        }
        .into(),
        None => String::new(),
    }
}
