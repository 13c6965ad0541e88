use crate::error::StoreError;
use crate::model::Entity;
use crate::store::EntityStore;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// In-process table keyed by the identifier field. Scans return items in key order.
pub struct MemoryStore {
    key_field: String,
    items: RwLock<BTreeMap<String, Entity>>,
}

impl MemoryStore {
    pub fn new(key_field: impl Into<String>) -> Self {
        Self {
            key_field: key_field.into(),
            items: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned() -> StoreError {
        StoreError::Poisoned
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn scan_all(&self) -> Result<Vec<Entity>, StoreError> {
        let items = self.items.read().map_err(|_| Self::poisoned())?;
        Ok(items.values().cloned().collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Entity>, StoreError> {
        let items = self.items.read().map_err(|_| Self::poisoned())?;
        Ok(items.get(id).cloned())
    }

    async fn put(&self, entity: &Entity) -> Result<(), StoreError> {
        let id = entity
            .id(&self.key_field)
            .ok_or_else(|| StoreError::MissingKey(self.key_field.clone()))?
            .to_string();
        let mut items = self.items.write().map_err(|_| Self::poisoned())?;
        items.insert(id, entity.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut items = self.items.write().map_err(|_| Self::poisoned())?;
        items.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn actor(id: &str, name: &str) -> Entity {
        let mut e = Entity::new();
        e.insert("id", json!(id));
        e.insert("name", json!(name));
        e
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MemoryStore::new("id");
        assert!(store.is_empty());
        store.put(&actor("a1", "X")).await.unwrap();
        assert_eq!(store.get("a1").await.unwrap(), Some(actor("a1", "X")));
        store.put(&actor("a1", "Y")).await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a1").await.unwrap().unwrap().get_str("name"), Some("Y"));
        store.delete("a1").await.unwrap();
        assert_eq!(store.get("a1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_scan_in_key_order() {
        let store = MemoryStore::new("id");
        store.put(&actor("b", "B")).await.unwrap();
        store.put(&actor("a", "A")).await.unwrap();
        let ids: Vec<_> = store
            .scan_all()
            .await
            .unwrap()
            .iter()
            .map(|e| e.id("id").unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_put_without_key() {
        let store = MemoryStore::new("id");
        let mut entity = Entity::new();
        entity.insert("name", json!("X"));
        assert!(matches!(store.put(&entity).await, Err(StoreError::MissingKey(_))));
    }
}
