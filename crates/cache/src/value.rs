//! Payloads that can be cached.

use std::collections::HashMap;
use std::sync::Arc;

/// A value the read-through cache can store and hand out.
///
/// [`is_empty_result`](Self::is_empty_result) lets the cache recognise a
/// well-formed upstream answer that carries no data (an empty result array,
/// a JSON `null`). Depending on the cache's
/// [`EmptyResultPolicy`](crate::EmptyResultPolicy) such a payload is treated
/// as a failed attempt.
pub trait CacheValue: Clone + Send + Sync + 'static {
    fn is_empty_result(&self) -> bool {
        false
    }
}

impl<T: Clone + Send + Sync + 'static> CacheValue for Vec<T> {
    fn is_empty_result(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Clone + Send + Sync + 'static> CacheValue for Option<T> {
    fn is_empty_result(&self) -> bool {
        self.is_none()
    }
}

impl<K, V> CacheValue for HashMap<K, V>
where
    K: Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn is_empty_result(&self) -> bool {
        self.is_empty()
    }
}

impl<T: CacheValue> CacheValue for Arc<T> {
    fn is_empty_result(&self) -> bool {
        self.as_ref().is_empty_result()
    }
}

impl CacheValue for String {
    fn is_empty_result(&self) -> bool {
        self.trim().is_empty()
    }
}

impl CacheValue for serde_json::Value {
    fn is_empty_result(&self) -> bool {
        match self {
            serde_json::Value::Null => true,
            serde_json::Value::Array(items) => items.is_empty(),
            serde_json::Value::Object(fields) => fields.is_empty(),
            _ => false,
        }
    }
}

impl CacheValue for f64 {}
impl CacheValue for i64 {}
impl CacheValue for u32 {}
impl CacheValue for u64 {}
