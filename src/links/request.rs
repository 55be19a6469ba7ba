//! Concrete request produced by resolving a link.

use std::collections::BTreeMap;

use serde_json::Value;

use super::link::HttpMethod;

/// A fully resolved request, ready for the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// Operation name the request was resolved from (for logging).
    pub operation: String,
    pub method: HttpMethod,
    /// Href with all placeholders substituted.
    pub url: String,
    /// Parameters not consumed by the href. Sent as query for GET/DELETE,
    /// as a JSON body for POST/PUT.
    pub params: BTreeMap<String, Value>,
}

impl RequestDescriptor {
    /// Plain GET without parameters.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            operation: "GET".to_string(),
            method: HttpMethod::Get,
            url: url.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Query pairs for body-less methods. Arrays and objects are sent as
    /// their JSON text.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(k, v)| {
                let text = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), text)
            })
            .collect()
    }

    /// JSON body for methods that carry one.
    pub fn body(&self) -> Value {
        Value::Object(self.params.clone().into_iter().collect())
    }
}

/// Ordered parameter set handed to [`LinkMap::resolve`](super::LinkMap::resolve).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(BTreeMap<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.0.insert(name.to_string(), value.into());
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn into_inner(self) -> BTreeMap<String, Value> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_pairs_stringify_non_strings() {
        let mut req = RequestDescriptor::get("https://h/api");
        req.params.insert("event".into(), json!("start"));
        req.params.insert("force".into(), json!(true));
        assert_eq!(
            req.query_pairs(),
            vec![
                ("event".to_string(), "start".to_string()),
                ("force".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_body_is_object() {
        let mut req = RequestDescriptor::get("https://h/api");
        req.params.insert("name".into(), json!("FOO"));
        assert_eq!(req.body(), json!({ "name": "FOO" }));
    }
}
