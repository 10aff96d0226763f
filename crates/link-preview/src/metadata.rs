//! HTML metadata extraction.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use crate::PreviewError;

static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="description"]"#).unwrap());
static OG_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:image"]"#).unwrap());

/// Metadata scraped from one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    /// `og:image` resolved against the page URL.
    pub image_url: Option<Url>,
}

/// Extract title, description and `og:image` from an HTML document.
///
/// `title` and `description` are required; `og:image` is optional.
pub fn extract_metadata(html: &str, page_url: &Url) -> Result<PageMetadata, PreviewError> {
    let doc = Html::parse_document(html);

    let title = doc
        .select(&TITLE)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(PreviewError::MissingField("title"))?;

    let description = doc
        .select(&DESCRIPTION)
        .find_map(|el| el.value().attr("content"))
        .map(|d| d.trim().to_string())
        .ok_or(PreviewError::MissingField("description"))?;

    let image_url = doc
        .select(&OG_IMAGE)
        .find_map(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| page_url.join(s))
        .transpose()?;

    Ok(PageMetadata {
        title,
        description,
        image_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("https://example.com/articles/1").unwrap()
    }

    #[test]
    fn extracts_all_fields() {
        let html = r#"<html><head>
            <title> Example Domain </title>
            <meta name="description" content="An example page">
            <meta property="og:image" content="https://cdn.example.com/card.png">
        </head><body></body></html>"#;
        let meta = extract_metadata(html, &page()).unwrap();
        assert_eq!(meta.title, "Example Domain");
        assert_eq!(meta.description, "An example page");
        assert_eq!(
            meta.image_url.unwrap().as_str(),
            "https://cdn.example.com/card.png"
        );
    }

    #[test]
    fn relative_og_image_is_resolved_against_page() {
        let html = r#"<title>t</title>
            <meta name="description" content="d">
            <meta property="og:image" content="/img/card.jpg">"#;
        let meta = extract_metadata(html, &page()).unwrap();
        assert_eq!(
            meta.image_url.unwrap().as_str(),
            "https://example.com/img/card.jpg"
        );
    }

    #[test]
    fn og_image_is_optional() {
        let html = r#"<title>t</title><meta name="description" content="d">"#;
        let meta = extract_metadata(html, &page()).unwrap();
        assert!(meta.image_url.is_none());
    }

    #[test]
    fn missing_title_fails() {
        let html = r#"<meta name="description" content="d">"#;
        let err = extract_metadata(html, &page()).unwrap_err();
        assert!(matches!(err, PreviewError::MissingField("title")));
    }

    #[test]
    fn blank_title_counts_as_missing() {
        let html = r#"<title>   </title><meta name="description" content="d">"#;
        let err = extract_metadata(html, &page()).unwrap_err();
        assert!(matches!(err, PreviewError::MissingField("title")));
    }

    #[test]
    fn missing_description_fails() {
        let html = r#"<title>t</title><meta name="keywords" content="k">"#;
        let err = extract_metadata(html, &page()).unwrap_err();
        assert!(matches!(err, PreviewError::MissingField("description")));
    }

    #[test]
    fn description_without_content_fails() {
        let html = r#"<title>t</title><meta name="description">"#;
        let err = extract_metadata(html, &page()).unwrap_err();
        assert!(matches!(err, PreviewError::MissingField("description")));
    }
}
