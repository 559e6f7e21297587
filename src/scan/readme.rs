use regex::Regex;
use std::sync::OnceLock;

static IMAGES: OnceLock<Option<Regex>> = OnceLock::new();
static LINKS: OnceLock<Option<Regex>> = OnceLock::new();
static MARKERS: OnceLock<Option<Regex>> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

/// README text with markdown syntax removed: images and links are dropped
/// whole, then emphasis, heading and code markers.
pub fn strip_markdown(text: &str) -> Option<String> {
    let images = compiled(&IMAGES, r"!\[[^\]]*\]\([^)]*\)")?;
    let links = compiled(&LINKS, r"\[[^\]]*\]\([^)]*\)")?;
    let markers = compiled(&MARKERS, r"[#*_`]")?;

    let text = images.replace_all(text, "");
    let text = links.replace_all(&text, "");
    Some(markers.replace_all(&text, "").into_owned())
}

pub fn is_big_readme(decoded: &str, big_readme_size: usize) -> bool {
    decoded.chars().count() > big_readme_size
}

/// Markdown is assumed when stripping shrank the text by more than `factor`.
pub fn uses_markdown(decoded: &str, raw: Option<&str>, factor: f64) -> bool {
    match raw {
        Some(raw) => decoded.chars().count() as f64 > factor * raw.chars().count() as f64,
        None => false,
    }
}
