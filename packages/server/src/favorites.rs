//! Session-scoped favorite products.
//!
//! In-memory only: favorites live as long as the process. Mutations take
//! the write lock for the whole read-modify-write so concurrent adds for
//! the same session cannot lose entries.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Clone, Default)]
pub struct Favorites {
    by_session: Arc<RwLock<HashMap<String, Vec<String>>>>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self, session_id: &str) -> Vec<String> {
        self.by_session
            .read()
            .ok()
            .and_then(|map| map.get(session_id).cloned())
            .unwrap_or_default()
    }

    /// Add a product to a session's favorites. Idempotent.
    /// Returns the updated list.
    pub fn add(&self, session_id: &str, product_id: &str) -> Vec<String> {
        let Ok(mut map) = self.by_session.write() else {
            return Vec::new();
        };
        let favorites = map.entry(session_id.to_string()).or_default();
        if !favorites.iter().any(|id| id == product_id) {
            favorites.push(product_id.to_string());
        }
        favorites.clone()
    }

    /// Remove a product from a session's favorites. Returns the updated list.
    pub fn remove(&self, session_id: &str, product_id: &str) -> Vec<String> {
        let Ok(mut map) = self.by_session.write() else {
            return Vec::new();
        };
        let favorites = map.entry(session_id.to_string()).or_default();
        favorites.retain(|id| id != product_id);
        favorites.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent() {
        let favorites = Favorites::new();
        favorites.add("s1", "web-newegg-0");
        favorites.add("s1", "web-newegg-0");
        assert_eq!(favorites.list("s1"), vec!["web-newegg-0"]);
    }

    #[test]
    fn sessions_are_isolated() {
        let favorites = Favorites::new();
        favorites.add("s1", "a");
        favorites.add("s2", "b");
        assert_eq!(favorites.list("s1"), vec!["a"]);
        assert_eq!(favorites.list("s2"), vec!["b"]);
    }

    #[test]
    fn remove_returns_updated_list() {
        let favorites = Favorites::new();
        favorites.add("s1", "a");
        favorites.add("s1", "b");
        assert_eq!(favorites.remove("s1", "a"), vec!["b"]);
        assert!(favorites.remove("s1", "missing").contains(&"b".to_string()));
    }

    #[test]
    fn concurrent_adds_do_not_lose_entries() {
        let favorites = Favorites::new();
        let mut handles = Vec::new();
        for i in 0..16 {
            let favorites = favorites.clone();
            handles.push(std::thread::spawn(move || {
                favorites.add("s1", &format!("p{i}"));
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(favorites.list("s1").len(), 16);
    }
}
