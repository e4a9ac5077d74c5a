pub(crate) mod fetch;
pub mod matches;
pub mod results;

use ::scraper::{ElementRef, Selector};
use tracing::debug;

use crate::error::{Result, VlrError};

/// Fetch a URL and return the response body as text. Any status other than
/// `200 OK` is a [`VlrError::UnexpectedStatus`].
pub(crate) async fn get_body(client: &reqwest::Client, url: &str) -> Result<String> {
    debug!(url, "fetching page");

    let response = client.get(url).send().await.map_err(|e| VlrError::Http {
        url: url.to_owned(),
        source: e,
    })?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(VlrError::UnexpectedStatus {
            url: url.to_owned(),
            status,
        });
    }

    response.text().await.map_err(|e| VlrError::ResponseBody {
        url: url.to_owned(),
        source: e,
    })
}

/// Trimmed text of the first element matching `selector` inside `element`.
///
/// `None` when no element matches. An element that exists but holds no text
/// gives `Some("")`.
pub(crate) fn select_text_opt(element: &ElementRef, selector: &Selector) -> Option<String> {
    element.select(selector).next().map(|e| first_text(&e))
}

/// First non-blank text node of `element`, trimmed.
pub(crate) fn first_text(element: &ElementRef) -> String {
    element
        .text()
        .map(|t| t.trim())
        .find(|t| !t.is_empty())
        .unwrap_or_default()
        .replace(['\n', '\t'], "")
}

/// All text below `element` with newlines and tabs removed.
pub(crate) fn full_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .replace(['\n', '\t'], "")
        .trim()
        .to_string()
}

/// Attribute `attr` of the first element matching `selector`.
pub(crate) fn select_attr(element: &ElementRef, selector: &Selector, attr: &str) -> Option<String> {
    element
        .select(selector)
        .next()
        .and_then(|e| e.value().attr(attr))
        .map(|v| v.trim().to_string())
}

/// Resolve a link found on a page against the site origin.
pub(crate) fn absolute_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with("//") {
        format!("https:{href}")
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            href.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use ::scraper::Html;

    use super::*;

    #[test]
    fn test_absolute_url() {
        let base = "https://www.vlr.gg";
        assert_eq!(absolute_url(base, "/1234/a-vs-b"), "https://www.vlr.gg/1234/a-vs-b");
        assert_eq!(absolute_url("https://www.vlr.gg/", "/1"), "https://www.vlr.gg/1");
        assert_eq!(absolute_url(base, "//owcdn.net/img.png"), "https://owcdn.net/img.png");
        assert_eq!(absolute_url(base, "https://other.gg/x"), "https://other.gg/x");
    }

    #[test]
    fn test_text_helpers_distinguish_missing_from_empty() {
        let html = Html::parse_fragment(
            r#"<div><span class="a">
                 Ascent
                 <span class="pick">PICK</span>
               </span><span class="empty"></span>
               <div class="b">Playoffs:
		Grand Final</div></div>"#,
        );
        let root = html.root_element();
        let a = Selector::parse("span.a").unwrap();
        let empty = Selector::parse("span.empty").unwrap();
        let missing = Selector::parse("span.missing").unwrap();
        let b = Selector::parse("div.b").unwrap();

        assert_eq!(select_text_opt(&root, &a).as_deref(), Some("Ascent"));
        assert_eq!(select_text_opt(&root, &empty).as_deref(), Some(""));
        assert_eq!(select_text_opt(&root, &missing), None);

        let b = root.select(&b).next().unwrap();
        assert_eq!(full_text(&b), "Playoffs:Grand Final");
    }
}
