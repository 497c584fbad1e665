use async_trait::async_trait;
use domain::Sale;

use crate::{Result, SaleId};

/// Persistence gateway for sales.
///
/// A sale and its items are one unit: they are always saved and loaded
/// together. All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait SaleRepository: Send + Sync {
    /// Loads a sale together with its full item collection.
    ///
    /// Returns None if no sale has this id.
    async fn find_by_id(&self, id: SaleId) -> Result<Option<Sale>>;

    /// Upserts a sale and replaces its stored items with `sale.items()`.
    ///
    /// The write is atomic: either the sale and every item are stored, or
    /// nothing changes. A successful save is visible to the next `find_by_id`.
    /// There is no version check; the last writer wins.
    async fn save(&self, sale: &Sale) -> Result<()>;
}
