//! Per-request context accumulated by pipeline stages

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Context errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    /// The key was already written by an earlier stage
    #[error("context key '{0}' was already written by an earlier stage")]
    DuplicateKey(&'static str),
}

/// Mutable bag of resolved domain values for one request
///
/// Created empty when the pipeline starts and dropped when the request
/// completes. Keys are write-once and never removed: each stage's writes are
/// fully visible to every later stage, and no two stages may claim the same
/// key.
#[derive(Default)]
pub struct RequestContext {
    values: HashMap<&'static str, Box<dyn Any + Send + Sync>>,
}

impl RequestContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a resolved value under `key`
    ///
    /// Fails if the key was already written; the caller converts that into
    /// its fault outcome rather than silently overwriting another stage's
    /// work.
    pub fn insert<T: Send + Sync + 'static>(
        &mut self,
        key: &'static str,
        value: T,
    ) -> Result<(), ContextError> {
        if self.values.contains_key(key) {
            return Err(ContextError::DuplicateKey(key));
        }
        self.values.insert(key, Box::new(value));
        Ok(())
    }

    /// Fetch a previously resolved value
    ///
    /// Returns `None` when the key is absent or holds a different type.
    pub fn get<T: Send + Sync + 'static>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|value| value.downcast_ref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("RequestContext").field("keys", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut context = RequestContext::new();
        assert!(context.is_empty());

        context.insert("article", "the article".to_string()).unwrap();
        assert_eq!(
            context.get::<String>("article").map(String::as_str),
            Some("the article")
        );
        assert!(context.contains_key("article"));
        assert_eq!(context.len(), 1);
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let mut context = RequestContext::new();
        context.insert("role", 1_i64).unwrap();

        let err = context.insert("role", 2_i64).unwrap_err();
        assert_eq!(err, ContextError::DuplicateKey("role"));

        // The first write survives
        assert_eq!(context.get::<i64>("role"), Some(&1));
    }

    #[test]
    fn test_type_mismatch_reads_as_absent() {
        let mut context = RequestContext::new();
        context.insert("user", 7_i64).unwrap();

        assert!(context.get::<String>("user").is_none());
        assert_eq!(context.get::<i64>("user"), Some(&7));
    }
}
