//! Query-string parsing and serialization.

use std::collections::BTreeMap;

/// Query parameters keyed by name. A `None` value is a bare key with no `=`.
pub type QueryParams = BTreeMap<String, Option<String>>;

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

/// Parses a location search string (with or without its leading `?`).
///
/// Malformed percent-escapes keep their raw text; repeated keys keep the last value.
pub fn parse_query(search: &str) -> QueryParams {
    let mut params = QueryParams::new();
    for pair in search
        .trim_start_matches('?')
        .split('&')
        .filter(|part| !part.is_empty())
    {
        match pair.split_once('=') {
            Some((key, value)) => {
                params.insert(decode_component(key), Some(decode_component(value)));
            }
            None => {
                params.insert(decode_component(pair), None);
            }
        }
    }
    params
}

/// Serializes params without a leading `?`, percent-encoding keys and values.
pub fn stringify_query(params: &QueryParams) -> String {
    params
        .iter()
        .map(|(key, value)| match value {
            Some(value) => format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            ),
            None => urlencoding::encode(key).into_owned(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_values_bare_keys_and_escapes() {
        let params = parse_query("?path=%2Fstory%2Fa--b&flag&name=two+words&bad=%E0%A4&&x=1&x=2");
        assert_eq!(
            params.get("path"),
            Some(&Some("/story/a--b".to_string()))
        );
        assert_eq!(params.get("flag"), Some(&None));
        assert_eq!(params.get("name"), Some(&Some("two words".to_string())));
        assert_eq!(params.get("bad"), Some(&Some("%E0%A4".to_string())));
        assert_eq!(params.get("x"), Some(&Some("2".to_string())));
        assert_eq!(params.len(), 5);
    }

    #[test]
    fn empty_search_yields_no_params() {
        assert!(parse_query("").is_empty());
        assert!(parse_query("?").is_empty());
    }

    #[test]
    fn stringify_encodes_and_keeps_bare_keys() {
        let params = parse_query("?b=x y&a&c=1/2");
        assert_eq!(stringify_query(&params), "a&b=x%20y&c=1%2F2");
    }
}
