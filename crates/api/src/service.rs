//! Sale operations: validate, persist, notify.
//!
//! Each operation is a single load/validate/save/notify pass. Nothing is held
//! across the steps, so concurrent writers to the same sale race at the store
//! and the last save wins.

use chrono::{DateTime, Utc};
use common::{SaleId, SaleItemId};
use domain::{EventNotifier, RuleViolation, Sale, SaleError, SaleLine, check_sale};
use sale_store::{SaleRepository, StoreError};
use thiserror::Error;

/// Errors returned by [`SalesService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A business rule or state transition was rejected.
    #[error(transparent)]
    Sale(#[from] SaleError),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// No sale has this id.
    #[error("Sale {0} not found")]
    NotFound(SaleId),

    /// The id in the request path differs from the one in the body.
    #[error("The sale ID in the URL ({path}) does not match the sale ID in the body ({body})")]
    IdMismatch { path: SaleId, body: SaleId },
}

/// Data for a new sale.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub sale_number: String,
    /// Defaults to the current time.
    pub sale_date: Option<DateTime<Utc>>,
    pub customer: String,
    pub branch: String,
    pub items: Vec<SaleLine>,
}

/// Replacement data for an existing sale.
#[derive(Debug, Clone)]
pub struct SaleUpdate {
    /// Must match the id the update is addressed to.
    pub id: SaleId,
    pub customer: String,
    pub branch: String,
    pub items: Vec<SaleLine>,
}

/// Service for managing sales.
pub struct SalesService<R: SaleRepository, N: EventNotifier> {
    store: R,
    notifier: N,
}

impl<R: SaleRepository, N: EventNotifier> SalesService<R, N> {
    /// Creates a new sales service.
    pub fn new(store: R, notifier: N) -> Self {
        Self { store, notifier }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &R {
        &self.store
    }

    /// Returns a reference to the notifier.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Creates and stores a new sale.
    ///
    /// Nothing is stored if the sale breaks a business rule.
    #[tracing::instrument(skip(self, new_sale), fields(sale_number = %new_sale.sale_number))]
    pub async fn create(&self, new_sale: NewSale) -> Result<Sale, ServiceError> {
        let sale = Sale::new(
            new_sale.sale_number,
            new_sale.sale_date.unwrap_or_else(Utc::now),
            new_sale.customer,
            new_sale.branch,
            new_sale.items,
        );
        check_sale(&sale).map_err(reject)?;

        self.store.save(&sale).await?;

        metrics::counter!("sales_created_total").increment(1);
        self.notifier.sale_created(sale.id());
        Ok(sale)
    }

    /// Loads a sale with its items.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: SaleId) -> Result<Sale, ServiceError> {
        self.load(id).await
    }

    /// Replaces customer, branch and items of an existing sale.
    ///
    /// The id check happens before anything is read or written.
    #[tracing::instrument(skip(self, update))]
    pub async fn update(&self, id: SaleId, update: SaleUpdate) -> Result<Sale, ServiceError> {
        if update.id != id {
            return Err(ServiceError::IdMismatch {
                path: id,
                body: update.id,
            });
        }

        let mut sale = self.load(id).await?;
        sale.replace_details(update.customer, update.branch, update.items)?;
        check_sale(&sale).map_err(reject)?;

        self.store.save(&sale).await?;

        metrics::counter!("sales_modified_total").increment(1);
        self.notifier.sale_modified(id);
        Ok(sale)
    }

    /// Cancels a sale. Cancelling twice is rejected.
    #[tracing::instrument(skip(self))]
    pub async fn cancel(&self, id: SaleId) -> Result<Sale, ServiceError> {
        let mut sale = self.load(id).await?;
        sale.cancel()?;

        self.store.save(&sale).await?;

        metrics::counter!("sales_cancelled_total").increment(1);
        self.notifier.sale_cancelled(id);
        Ok(sale)
    }

    /// Cancels one line item of a sale.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_item(&self, id: SaleId, item_id: SaleItemId) -> Result<Sale, ServiceError> {
        let mut sale = self.load(id).await?;
        sale.cancel_item(item_id)?;

        self.store.save(&sale).await?;

        metrics::counter!("sales_items_cancelled_total").increment(1);
        self.notifier.item_cancelled(id, item_id);
        Ok(sale)
    }

    async fn load(&self, id: SaleId) -> Result<Sale, ServiceError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }
}

fn reject(violation: RuleViolation) -> ServiceError {
    metrics::counter!("sales_rejected_total", "reason" => violation.as_str()).increment(1);
    tracing::info!(reason = %violation, "sale rejected by business rules");
    ServiceError::Sale(SaleError::InvalidSale(violation))
}
