use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use domain::Sale;
use tokio::sync::RwLock;

use crate::{Result, SaleId, store::SaleRepository};

/// In-memory sale store.
///
/// Provides the same interface as the PostgreSQL implementation. Clones share
/// the same underlying map.
#[derive(Clone, Default)]
pub struct InMemorySaleStore {
    sales: Arc<RwLock<HashMap<SaleId, Sale>>>,
}

impl InMemorySaleStore {
    /// Creates a new empty in-memory sale store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored sales.
    pub async fn sale_count(&self) -> usize {
        self.sales.read().await.len()
    }

    /// Removes every stored sale.
    pub async fn clear(&self) {
        self.sales.write().await.clear();
    }
}

#[async_trait]
impl SaleRepository for InMemorySaleStore {
    async fn find_by_id(&self, id: SaleId) -> Result<Option<Sale>> {
        Ok(self.sales.read().await.get(&id).cloned())
    }

    async fn save(&self, sale: &Sale) -> Result<()> {
        self.sales.write().await.insert(sale.id(), sale.clone());
        tracing::debug!(sale_id = %sale.id(), items = sale.item_count(), "sale saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use domain::{Money, SaleLine};

    use super::*;

    fn create_test_sale(item_count: u32) -> Sale {
        let lines = (0..item_count)
            .map(|i| SaleLine::new(format!("Product {i}"), i + 1, Money::from_cents(999)))
            .collect();
        Sale::new("S-TEST", Utc::now(), "ACME", "Downtown", lines)
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let store = InMemorySaleStore::new();
        let sale = create_test_sale(4);

        store.save(&sale).await.unwrap();

        let loaded = store.find_by_id(sale.id()).await.unwrap().unwrap();
        assert_eq!(loaded, sale);
        assert_eq!(loaded.items().len(), 4);
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let store = InMemorySaleStore::new();
        assert!(store.find_by_id(SaleId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites_existing_sale() {
        let store = InMemorySaleStore::new();
        let mut sale = create_test_sale(4);
        store.save(&sale).await.unwrap();

        sale.replace_details("Globex", "Uptown", vec![SaleLine::new("Keg", 1, Money::from_cents(5))])
            .unwrap();
        store.save(&sale).await.unwrap();

        let loaded = store.find_by_id(sale.id()).await.unwrap().unwrap();
        assert_eq!(loaded.customer(), "Globex");
        assert_eq!(loaded.item_count(), 1);
        assert_eq!(store.sale_count().await, 1);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = InMemorySaleStore::new();
        let other = store.clone();
        let sale = create_test_sale(1);

        store.save(&sale).await.unwrap();

        assert!(other.find_by_id(sale.id()).await.unwrap().is_some());
        other.clear().await;
        assert_eq!(store.sale_count().await, 0);
    }
}
