use crate::error::EvalError;
use crate::value::Value;
use serde_json::Value as Json;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Read-only source of variable values for [`crate::Expression::evaluate`].
pub trait Bindings {
    fn lookup(&self, name: &str) -> Option<&Value>;
}

/// Variable store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vars {
    vars: HashMap<String, Value>,
}

impl Vars {
    pub fn new() -> Self {
        Vars::default()
    }

    /// Builds bindings from a JSON object whose members are numbers or
    /// rectangular numeric arrays.
    pub fn from_json(json: &Json) -> Result<Self, EvalError> {
        let Json::Object(members) = json else {
            return Err(EvalError::InvalidValue(json.to_string()));
        };
        let mut vars = Vars::new();
        for (name, value) in members {
            vars.set(name, Value::from_json(value)?);
        }
        Ok(vars)
    }

    /// Binds `name`, returning the value it replaced.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Option<Value> {
        self.vars.insert(name.to_string(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn del(&mut self, name: &str) -> bool {
        self.vars.remove(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Vars
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Vars {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Bindings for Vars {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }
}

impl<S: BuildHasher> Bindings for HashMap<String, Value, S> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl<S: BuildHasher> Bindings for HashMap<&str, Value, S> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl Bindings for BTreeMap<String, Value> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_get_del() {
        let mut vars = Vars::new();
        assert!(vars.is_empty());
        assert_eq!(vars.set("a", 1), None);
        assert_eq!(vars.set("a", 2), Some(Value::from(1)));
        assert!(vars.has("a"));
        assert_eq!(vars.get("a"), Some(&Value::from(2)));
        assert_eq!(vars.len(), 1);
        assert!(vars.del("a"));
        assert!(!vars.del("a"));
        assert!(!vars.has("a"));
    }

    #[test]
    fn test_from_json() {
        let vars = Vars::from_json(&json!({"a": 1, "b": [1.5, 2.5]})).unwrap();
        assert_eq!(vars.lookup("a"), Some(&Value::from(1)));
        assert_eq!(vars.lookup("b"), Some(&Value::from(vec![1.5, 2.5])));
        assert_eq!(vars.lookup("c"), None);
    }

    #[test]
    fn test_from_json_requires_object() {
        assert!(matches!(
            Vars::from_json(&json!([1, 2])),
            Err(EvalError::InvalidValue(_))
        ));
        assert!(matches!(
            Vars::from_json(&json!({"s": "text"})),
            Err(EvalError::InvalidValue(_))
        ));
    }
}
