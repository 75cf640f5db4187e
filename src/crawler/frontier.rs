//! Crawl frontier state
//!
//! Three collections track one crawl run: the product URLs accumulated
//! so far (sorted, deduplicated), the pending category work-list
//! (last-in, first-out), and the visited set that prevents revisits.

use crate::url::{is_category_url, is_product_url};
use std::collections::{BTreeSet, HashSet};

/// In-memory traversal state for a discovery crawl
pub struct CrawlFrontier {
    base_url: String,
    products: BTreeSet<String>,
    pending: Vec<String>,
    queued: HashSet<String>,
    visited: HashSet<String>,
}

impl CrawlFrontier {
    pub fn new(base_url: &str) -> Self {
        CrawlFrontier {
            base_url: base_url.trim_end_matches('/').to_string(),
            products: BTreeSet::new(),
            pending: Vec::new(),
            queued: HashSet::new(),
            visited: HashSet::new(),
        }
    }

    /// Classifies a normalized absolute URL into the frontier
    ///
    /// Product URLs accumulate; unseen category URLs join the pending
    /// work-list; everything else is dropped.
    pub fn observe(&mut self, url: &str) {
        if is_product_url(url, &self.base_url) {
            self.products.insert(url.to_string());
        } else if is_category_url(url, &self.base_url)
            && !self.visited.contains(url)
            && self.queued.insert(url.to_string())
        {
            self.pending.push(url.to_string());
        }
    }

    /// Pops the next unvisited category URL and marks it visited
    pub fn next_category(&mut self) -> Option<String> {
        while let Some(url) = self.pending.pop() {
            if self.visited.insert(url.clone()) {
                return Some(url);
            }
        }
        None
    }

    /// Discovered product URLs, in sorted order
    pub fn products(&self) -> impl Iterator<Item = &String> {
        self.products.iter()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.nisbets.co.uk";

    #[test]
    fn test_observe_classifies() {
        let mut frontier = CrawlFrontier::new(BASE);
        frontier.observe("https://www.nisbets.co.uk/widget/ab123");
        frontier.observe("https://www.nisbets.co.uk/c/catering-appliances");
        frontier.observe("https://www.nisbets.co.uk/about-us");

        assert_eq!(frontier.product_count(), 1);
        assert_eq!(frontier.pending_count(), 1);
    }

    #[test]
    fn test_products_dedupe_and_sort() {
        let mut frontier = CrawlFrontier::new(BASE);
        frontier.observe("https://www.nisbets.co.uk/b/cd456");
        frontier.observe("https://www.nisbets.co.uk/a/ab123");
        frontier.observe("https://www.nisbets.co.uk/b/cd456");

        let products: Vec<&String> = frontier.products().collect();
        assert_eq!(products.len(), 2);
        assert!(products[0].ends_with("ab123"));
    }

    #[test]
    fn test_category_not_requeued() {
        let mut frontier = CrawlFrontier::new(BASE);
        frontier.observe("https://www.nisbets.co.uk/c/catering");
        frontier.observe("https://www.nisbets.co.uk/c/catering");
        assert_eq!(frontier.pending_count(), 1);

        let url = frontier.next_category().unwrap();
        assert_eq!(url, "https://www.nisbets.co.uk/c/catering");
        assert!(frontier.next_category().is_none());

        // Already visited: observing it again does not re-enqueue
        frontier.observe("https://www.nisbets.co.uk/c/catering");
        assert!(frontier.next_category().is_none());
    }

    #[test]
    fn test_lifo_order() {
        let mut frontier = CrawlFrontier::new(BASE);
        frontier.observe("https://www.nisbets.co.uk/c/first");
        frontier.observe("https://www.nisbets.co.uk/c/second");
        assert_eq!(
            frontier.next_category().unwrap(),
            "https://www.nisbets.co.uk/c/second"
        );
    }
}
