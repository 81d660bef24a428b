//! Builds links that keep the current search while changing one or two parameters.

use crate::expense::criteria::SearchParams;

/// Encode `params` with `overrides` applied.
///
/// An overridden key keeps the position of its first occurrence and loses any
/// repeated values. Keys that were not in `params` are appended. Every other
/// pair is kept as received, including repeated keys such as `category`.
pub fn query_string_with(params: &SearchParams, overrides: &[(&str, &str)]) -> String {
    let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(params.pairs().len() + overrides.len());

    for (key, value) in params.pairs() {
        match overrides.iter().find(|(name, _)| *name == key.as_str()) {
            Some(&(name, new_value)) => {
                if !pairs.iter().any(|(existing, _)| *existing == name) {
                    pairs.push((name, new_value));
                }
            }
            None => pairs.push((key.as_str(), value.as_str())),
        }
    }

    for &(name, value) in overrides {
        if !pairs.iter().any(|(existing, _)| *existing == name) {
            pairs.push((name, value));
        }
    }

    serde_urlencoded::to_string(&pairs).unwrap_or_else(|error| {
        tracing::error!("could not encode query string {pairs:?}: {error}");
        String::new()
    })
}

/// `path` followed by the query string from [query_string_with].
pub fn url_with(path: &str, params: &SearchParams, overrides: &[(&str, &str)]) -> String {
    let query = query_string_with(params, overrides);

    if query.is_empty() {
        path.to_owned()
    } else {
        format!("{path}?{query}")
    }
}

#[cfg(test)]
mod tests {
    use crate::expense::criteria::SearchParams;

    use super::{query_string_with, url_with};

    #[test]
    fn changing_page_keeps_sort_and_repeated_categories() {
        let params = SearchParams::from_query(Some(
            "category=1&sort_by=category&category=2&order=desc&page=1",
        ));

        let got = query_string_with(&params, &[("page", "2")]);

        assert_eq!(
            got,
            "category=1&sort_by=category&category=2&order=desc&page=2"
        );
    }

    #[test]
    fn appends_missing_keys() {
        let params = SearchParams::from_query(Some("name=pizza"));

        let got = query_string_with(&params, &[("sort_by", "date"), ("order", "desc")]);

        assert_eq!(got, "name=pizza&sort_by=date&order=desc");
    }

    #[test]
    fn collapses_repeated_overridden_key() {
        let params = SearchParams::from_query(Some("page=1&name=a&page=3"));

        let got = query_string_with(&params, &[("page", "2")]);

        assert_eq!(got, "page=2&name=a");
    }

    #[test]
    fn encodes_special_characters() {
        let params = SearchParams::from_query(Some("name=fish+%26+chips"));

        let got = query_string_with(&params, &[("page", "2")]);

        assert_eq!(got, "name=fish+%26+chips&page=2");
    }

    #[test]
    fn url_without_params_is_just_the_path() {
        assert_eq!(url_with("/expenses", &SearchParams::default(), &[]), "/expenses");
        assert_eq!(
            url_with("/expenses", &SearchParams::default(), &[("page", "last")]),
            "/expenses?page=last"
        );
    }
}
