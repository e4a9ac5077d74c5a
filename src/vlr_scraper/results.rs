use ::scraper::{Html, Selector};
use itertools::Itertools;

use crate::error::Result;
use crate::vlr_scraper::{absolute_url, first_text};

/// Absolute match URLs from the cards of one results page, in page order.
pub fn parse_match_urls(document: &Html, base_url: &str) -> Result<Vec<String>> {
    let card_selector = Selector::parse("div.wf-card")?;
    let item_selector = Selector::parse("a.wf-module-item, a.match-item")?;
    let urls = document
        .select(&card_selector)
        .flat_map(|card| card.select(&item_selector).collect_vec())
        .filter_map(|a| a.value().attr("href"))
        .map(|href| absolute_url(base_url, href.trim()))
        .collect_vec();
    Ok(urls)
}

/// Highest page number offered by the pagination control, if there is one.
pub fn parse_last_page(document: &Html) -> Result<Option<u32>> {
    let page_selector = Selector::parse(
        "div.action-container div.action-container-pages a.btn.mod-page",
    )?;
    let last = document
        .select(&page_selector)
        .filter_map(|a| first_text(&a).parse::<u32>().ok())
        .max();
    Ok(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_PAGE: &str = r#"
<html><body><div id="wrapper"><div class="col mod-1">
  <div class="wf-label mod-large">Sun, March 2, 2025</div>
  <div class="wf-card">
    <a href="/449001/fnatic-vs-team-heretics-vct-2025" class="wf-module-item match-item mod-color mod-left mod-bg-after-striped_purple">
      <div class="match-item-time">6:00 pm</div>
    </a>
  </div>
  <div class="wf-card">
    <a href="/449002/sentinels-vs-g2-esports-vct-2025" class="wf-module-item match-item mod-color">
      <div class="match-item-time">9:00 pm</div>
    </a>
  </div>
  <div class="wf-card">
    <a href="/449003/drx-vs-t1-vct-2025" class="wf-module-item match-item">
      <div class="match-item-time">3:00 am</div>
    </a>
  </div>
  <a href="/449999/outside-a-card" class="wf-module-item match-item"></a>
  <div class="action-container">
    <div class="action-container-pages">
      <span class="btn mod-page mod-active">1</span>
      <a class="btn mod-page" href="/matches/results/?page=2">2</a>
      <a class="btn mod-page" href="/matches/results/?page=3">3</a>
      <span class="btn mod-page mod-disabled">...</span>
      <a class="btn mod-page" href="/matches/results/?page=611">611</a>
      <a class="btn mod-page" href="/matches/results/?page=2">&rsaquo;</a>
    </div>
  </div>
</div></div></body></html>"#;

    #[test]
    fn test_three_cards_give_three_absolute_urls() {
        let document = Html::parse_document(RESULTS_PAGE);
        let urls = parse_match_urls(&document, "https://www.vlr.gg").unwrap();
        assert_eq!(
            urls,
            vec![
                "https://www.vlr.gg/449001/fnatic-vs-team-heretics-vct-2025",
                "https://www.vlr.gg/449002/sentinels-vs-g2-esports-vct-2025",
                "https://www.vlr.gg/449003/drx-vs-t1-vct-2025",
            ]
        );
    }

    #[test]
    fn test_card_without_match_items_is_ignored() {
        let document = Html::parse_document(
            r#"<div class="wf-card"><a href="/news/1" class="news-item">n</a></div>
               <div class="wf-card"><a class="match-item">no href</a></div>
               <div class="wf-card"></div>"#,
        );
        let urls = parse_match_urls(&document, "https://www.vlr.gg").unwrap();
        assert!(urls.is_empty());

        let empty = Html::parse_document("<html><body></body></html>");
        assert!(parse_match_urls(&empty, "https://www.vlr.gg").unwrap().is_empty());
    }

    #[test]
    fn test_last_page_is_highest_numeric_label() {
        let document = Html::parse_document(RESULTS_PAGE);
        assert_eq!(parse_last_page(&document).unwrap(), Some(611));
    }

    #[test]
    fn test_last_page_unknown_without_pagination() {
        let no_control = Html::parse_document(r#"<div class="wf-card"></div>"#);
        assert_eq!(parse_last_page(&no_control).unwrap(), None);

        let no_links = Html::parse_document(
            r#"<div class="action-container"><div class="action-container-pages"></div></div>"#,
        );
        assert_eq!(parse_last_page(&no_links).unwrap(), None);
    }
}
