//! Query-string decoding and re-encoding for shareable search URLs.

use url::form_urlencoded;

/// Replacement value for one key when rewriting a query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Int(u64),
}

impl ParamValue {
    fn render(&self) -> String {
        match self {
            ParamValue::Text(s) => s.clone(),
            ParamValue::Int(i) => i.to_string(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        ParamValue::Int(value)
    }
}

/// An ordered parameter multiset. Order is the order of arrival.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn decode(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    pub fn from_pairs<K: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Self { pairs: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// First non-blank value for `key`, trimmed.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Space-as-plus percent encoding of every pair, in order.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.pairs {
            serializer.append_pair(k, v);
        }
        serializer.finish()
    }

    /// Copy with `updates` applied: an updated key loses all its current
    /// values; `Some` appends the replacement, `None` removes the key.
    /// Pairs with an empty value are dropped.
    pub fn changed(&self, updates: &[(&str, Option<ParamValue>)]) -> Self {
        let is_updated = |key: &str| updates.iter().any(|(k, _)| *k == key);
        let mut pairs = self
            .pairs
            .iter()
            .filter(|(k, v)| !v.is_empty() && !is_updated(k.as_str()))
            .cloned()
            .collect::<Vec<_>>();
        for (key, value) in updates {
            if let Some(value) = value {
                pairs.push((key.to_string(), value.render()));
            }
        }
        Self { pairs }
    }
}
