//! Link-header pagination.
//!
//! GitHub list endpoints return at most `per_page` items and advertise the
//! following page in the `Link` header:
//!
//! ```text
//! Link: <https://api.github.com/organizations/1/members?page=2>; rel="next",
//!       <https://api.github.com/organizations/1/members?page=5>; rel="last"
//! ```
//!
//! A page without a `rel="next"` link is the last one.

use url::Url;

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Absolute URL of the following page, if any.
    pub next: Option<Url>,
}

impl<T> Page<T> {
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}

/// Extract the `rel="next"` target from a `Link` header value.
pub fn parse_next_link(header: &str) -> Option<Url> {
    header.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let is_next = pieces.any(|p| {
            let p = p.trim();
            p == r#"rel="next""# || p == "rel=next"
        });
        if !is_next {
            return None;
        }
        let target = target.strip_prefix('<')?.strip_suffix('>')?;
        Url::parse(target).ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_next_among_several_relations() {
        let header = r#"<https://api.github.com/organizations/1/members?page=1>; rel="prev", <https://api.github.com/organizations/1/members?page=3>; rel="next", <https://api.github.com/organizations/1/members?page=5>; rel="last""#;
        let next = parse_next_link(header).unwrap();
        assert_eq!(
            next.as_str(),
            "https://api.github.com/organizations/1/members?page=3"
        );
    }

    #[test]
    fn last_page_has_no_next() {
        let header = r#"<https://api.github.com/x?page=1>; rel="first", <https://api.github.com/x?page=4>; rel="prev""#;
        assert!(parse_next_link(header).is_none());
    }

    #[test]
    fn malformed_targets_are_ignored() {
        assert!(parse_next_link(r#"https://api.github.com/x?page=2; rel="next""#).is_none());
        assert!(parse_next_link(r#"<not a url>; rel="next""#).is_none());
        assert!(parse_next_link("").is_none());
    }
}
