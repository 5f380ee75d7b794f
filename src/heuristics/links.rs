//! Deterministic search links built from a condition name.

use reqwest::Url;

use crate::models::ReferenceLink;

pub const REGISTRY_SEARCH_BASE: &str = "https://clinicaltrials.gov/search";
pub const LITERATURE_SEARCH_BASE: &str = "https://scholar.google.com/scholar";
pub const WEB_SEARCH_BASE: &str = "https://www.google.com/search";

fn build_url(base: &str, params: &[(&str, &str)]) -> String {
    match Url::parse_with_params(base, params) {
        Ok(url) => url.to_string(),
        Err(e) => {
            tracing::warn!(base, error = %e, "Could not build search URL");
            base.to_string()
        }
    }
}

/// Registry search for gene-therapy trials in this condition.
pub fn registry_search_url(condition: &str) -> String {
    build_url(
        REGISTRY_SEARCH_BASE,
        &[("cond", condition.trim()), ("term", "gene therapy")],
    )
}

pub fn literature_search_url(condition: &str) -> String {
    let query = format!("{} gene therapy preclinical", condition.trim());
    build_url(LITERATURE_SEARCH_BASE, &[("q", query.trim())])
}

pub fn web_search_url(condition: &str) -> String {
    let query = format!("{} cell and gene therapy", condition.trim());
    build_url(WEB_SEARCH_BASE, &[("q", query.trim())])
}

pub fn registry_search_link(condition: &str) -> ReferenceLink {
    ReferenceLink::new(
        "ClinicalTrials.gov gene therapy search",
        registry_search_url(condition),
    )
}

/// The two links attached to every relevance result, whatever the label.
pub fn fallback_links(condition: &str) -> [ReferenceLink; 2] {
    [
        ReferenceLink::new("Literature search", literature_search_url(condition)),
        ReferenceLink::new("Web search", web_search_url(condition)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_url_encodes_condition() {
        let url = registry_search_url("Sickle Cell Disease");
        assert_eq!(
            url,
            "https://clinicaltrials.gov/search?cond=Sickle+Cell+Disease&term=gene+therapy"
        );
    }

    #[test]
    fn literature_url_matches_scholar_query() {
        let url = literature_search_url("krabbe disease");
        assert_eq!(
            url,
            "https://scholar.google.com/scholar?q=krabbe+disease+gene+therapy+preclinical"
        );
    }

    #[test]
    fn special_characters_are_escaped() {
        let url = web_search_url("C&GT / A+B");
        assert!(url.starts_with("https://www.google.com/search?q="));
        assert!(url.contains("C%26GT"), "url: {url}");
        assert!(url.contains("A%2BB"), "url: {url}");
    }

    #[test]
    fn fallback_links_always_two_and_deterministic() {
        let a = fallback_links("Rett syndrome");
        let b = fallback_links("Rett syndrome");
        assert_eq!(a, b);
        assert_eq!(a[0].title, "Literature search");
        assert_eq!(a[1].title, "Web search");
    }

    #[test]
    fn empty_condition_still_builds_links() {
        let links = fallback_links("   ");
        assert_eq!(
            links[0].url,
            "https://scholar.google.com/scholar?q=gene+therapy+preclinical"
        );
        assert!(links[1].url.starts_with(WEB_SEARCH_BASE));
    }
}
