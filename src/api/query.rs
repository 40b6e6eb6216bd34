//! Query-string assembly for API requests.

use chrono::{DateTime, SecondsFormat, Utc};

/// Ordered query parameters for a single request.
///
/// Absent and empty values are never recorded, so the request carries only
/// the parameters a caller actually set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required parameter.
    pub fn push(&mut self, key: &str, value: impl ToString) -> &mut Self {
        let value = value.to_string();
        if !value.is_empty() {
            self.pairs.push((key.to_string(), value));
        }
        self
    }

    pub fn push_opt<V: ToString>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(v) = value {
            self.push(key, v);
        }
        self
    }

    /// Add a list-valued parameter as one comma-joined value, dropping repeats.
    pub fn push_list<S: AsRef<str>>(&mut self, key: &str, values: &[S]) -> &mut Self {
        let joined = join_unique(values);
        self.push(key, joined)
    }

    pub fn push_time(&mut self, key: &str, value: Option<&DateTime<Utc>>) -> &mut Self {
        self.push_opt(key, value.map(format_timestamp))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

fn join_unique<S: AsRef<str>>(values: &[S]) -> String {
    let mut seen: Vec<&str> = Vec::with_capacity(values.len());
    for value in values.iter().map(AsRef::as_ref) {
        if !value.is_empty() && !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen.join(",")
}

/// RFC 3339 at second precision with a `Z` suffix, the form the service accepts.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Anything that contributes parameters to a request.
pub trait ToQuery {
    fn append_to(&self, query: &mut QueryParams);

    fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        self.append_to(&mut query);
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_list_joined_in_order() {
        let mut q = QueryParams::new();
        q.push_list("tweet.fields", &["created_at", "author_id", "public_metrics"]);
        assert_eq!(q.get("tweet.fields"), Some("created_at,author_id,public_metrics"));
    }

    #[test]
    fn test_empty_list_omitted() {
        let mut q = QueryParams::new();
        q.push_list::<&str>("expansions", &[]);
        assert!(q.is_empty());
        assert_eq!(q.get("expansions"), None);
    }

    #[test]
    fn test_repeats_dropped() {
        let mut q = QueryParams::new();
        q.push_list("user.fields", &["name", "username", "name"]);
        assert_eq!(q.get("user.fields"), Some("name,username"));
    }

    #[test]
    fn test_absent_and_empty_values_omitted() {
        let mut q = QueryParams::new();
        q.push_opt::<String>("next_token", None)
            .push_opt("since_id", Some(""))
            .push("query", "rust");
        assert_eq!(q.as_pairs(), &[("query".to_string(), "rust".to_string())]);
    }

    #[test]
    fn test_timestamp_format() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let mut q = QueryParams::new();
        q.push_time("start_time", Some(&ts));
        assert_eq!(q.get("start_time"), Some("2024-01-02T03:04:05Z"));
    }
}
