use std::cell::RefCell;
use std::collections::HashMap;

use anyhow::Result;

use super::KeyValueStore;

#[derive(Default)]
pub struct InMemoryKvStore {
    items: RefCell<HashMap<String, String>>,
}

impl InMemoryKvStore {
    pub fn with_seed<K, V>(seed: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::default();
        store
            .items
            .borrow_mut()
            .extend(seed.into_iter().map(|(k, v)| (k.into(), v.into())));
        store
    }
}

impl KeyValueStore for InMemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let store = InMemoryKvStore::with_seed([("theme", "dark")]);
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));

        store.set("theme", "light").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("light"));

        store.remove("theme").unwrap();
        assert!(store.get("theme").unwrap().is_none());
    }
}
