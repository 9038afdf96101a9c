use crate::models::total_pages;
use crate::search::params::{PageState, QueryParams, PAGE_KEY};
use reqwest::Url;
use serde::Serialize;

/// A numbered link in the pager below the results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub page_number: u32,
    /// Site-relative destination, `path?query`
    pub destination: String,
    /// The link for the page being shown; rendered but not navigable
    pub active: bool,
}

impl std::fmt::Display for PageLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.active {
            write!(f, "[{}]", self.page_number)
        } else {
            write!(f, "{} -> {}", self.page_number, self.destination)
        }
    }
}

/// Current path with `page` set to `target`, every other parameter untouched.
pub fn page_destination(current: &Url, target: u32) -> String {
    let mut params = QueryParams::from_url(current);
    params.set(PAGE_KEY, target.to_string());
    relative_destination(current, &params)
}

/// `path?query` of `base` with its query replaced by `params`.
pub(crate) fn relative_destination(base: &Url, params: &QueryParams) -> String {
    let mut url = base.clone();
    url.set_query(None);
    if !params.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(params.pairs().iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

pub fn page_link(current: &Url, target: u32) -> PageLink {
    let current_page = PageState::from_params(&QueryParams::from_url(current));
    PageLink {
        page_number: target,
        destination: page_destination(current, target),
        active: current_page.page_number() == target,
    }
}

/// One link per page of results; none when there are no results.
pub fn page_links(current: &Url, total_count: u64, page_size: u32) -> Vec<PageLink> {
    (1..=total_pages(total_count, page_size))
        .map(|n| page_link(current, n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn seven_results_make_three_links() {
        let links = page_links(&url("https://dealer.test/cars/"), 7, 3);
        let numbers: Vec<u32> = links.iter().map(|l| l.page_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(links[1].destination, "/cars/?page=2");
    }

    #[test]
    fn no_results_no_links() {
        assert!(page_links(&url("https://dealer.test/cars/?color=red"), 0, 3).is_empty());
    }

    #[test]
    fn exactly_one_active_link() {
        let links = page_links(&url("https://dealer.test/cars/?page=2&color=red"), 9, 3);
        let active: Vec<u32> = links
            .iter()
            .filter(|l| l.active)
            .map(|l| l.page_number)
            .collect();
        assert_eq!(active, vec![2]);
    }

    #[test]
    fn missing_page_means_first_is_active() {
        let links = page_links(&url("https://dealer.test/cars/?color=red"), 4, 3);
        assert!(links[0].active);
        assert!(!links[1].active);
    }

    #[test]
    fn invalid_page_means_first_is_active() {
        let links = page_links(&url("https://dealer.test/cars/?page=abc"), 4, 3);
        assert!(links[0].active);
    }

    #[test]
    fn link_changes_only_page() {
        let current = url("https://dealer.test/cars/?minPrice=10000&page=1&color=red");
        let link = page_link(&current, 3);
        assert_eq!(link.destination, "/cars/?minPrice=10000&page=3&color=red");

        let target = url(&format!("https://dealer.test{}", link.destination));
        let before = QueryParams::from_url(&current);
        let after = QueryParams::from_url(&target);
        for (key, value) in before.pairs() {
            if key != PAGE_KEY {
                assert_eq!(after.get(key), Some(value.as_str()));
            }
        }
        assert_eq!(after.get(PAGE_KEY), Some("3"));
    }

    #[test]
    fn encoded_values_survive() {
        let current = url("https://dealer.test/cars/?color=dark%20blue");
        let link = page_link(&current, 2);
        assert_eq!(link.destination, "/cars/?color=dark+blue&page=2");
    }
}
