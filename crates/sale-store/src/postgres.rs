use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{Money, Sale, SaleItem};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{Result, SaleId, SaleItemId, StoreError, store::SaleRepository};

/// PostgreSQL-backed sale store.
///
/// Sales live in `sales`; their items live in `sale_items`, joined by
/// `sale_id` and ordered by `position`.
#[derive(Clone)]
pub struct PostgresSaleStore {
    pool: PgPool,
}

impl PostgresSaleStore {
    /// Creates a new PostgreSQL sale store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_item(row: PgRow) -> Result<SaleItem> {
        let quantity: i64 = row.try_get("quantity")?;
        let quantity = u32::try_from(quantity)
            .map_err(|_| StoreError::Corrupt(format!("item quantity {quantity} out of range")))?;

        Ok(SaleItem {
            id: SaleItemId::from_uuid(row.try_get::<Uuid, _>("id")?),
            sale_id: SaleId::from_uuid(row.try_get::<Uuid, _>("sale_id")?),
            product: row.try_get("product")?,
            quantity,
            unit_price: Money::from_cents(row.try_get("unit_price_cents")?),
            discount: Money::from_cents(row.try_get("discount_cents")?),
            is_cancelled: row.try_get("is_cancelled")?,
        })
    }
}

#[async_trait]
impl SaleRepository for PostgresSaleStore {
    #[tracing::instrument(skip(self))]
    async fn find_by_id(&self, id: SaleId) -> Result<Option<Sale>> {
        let Some(row) = sqlx::query(
            r#"
            SELECT id, sale_number, sale_date, customer, branch, is_cancelled
            FROM sales
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let item_rows = sqlx::query(
            r#"
            SELECT id, sale_id, product, quantity, unit_price_cents, discount_cents, is_cancelled
            FROM sale_items
            WHERE sale_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let items = item_rows
            .into_iter()
            .map(Self::row_to_item)
            .collect::<Result<Vec<_>>>()?;

        let sale_date: DateTime<Utc> = row.try_get("sale_date")?;
        Ok(Some(Sale::from_parts(
            SaleId::from_uuid(row.try_get::<Uuid, _>("id")?),
            row.try_get("sale_number")?,
            sale_date,
            row.try_get("customer")?,
            row.try_get("branch")?,
            row.try_get("is_cancelled")?,
            items,
        )))
    }

    #[tracing::instrument(skip(self, sale), fields(sale_id = %sale.id()))]
    async fn save(&self, sale: &Sale) -> Result<()> {
        let sale_id = sale.id().as_uuid();

        // Sale row and item rows commit together
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (id, sale_number, sale_date, customer, branch, total_amount_cents, is_cancelled)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                sale_number = EXCLUDED.sale_number,
                sale_date = EXCLUDED.sale_date,
                customer = EXCLUDED.customer,
                branch = EXCLUDED.branch,
                total_amount_cents = EXCLUDED.total_amount_cents,
                is_cancelled = EXCLUDED.is_cancelled
            "#,
        )
        .bind(sale_id)
        .bind(sale.sale_number())
        .bind(sale.sale_date())
        .bind(sale.customer())
        .bind(sale.branch())
        .bind(sale.total_amount().cents())
        .bind(sale.is_cancelled())
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM sale_items WHERE sale_id = $1")
            .bind(sale_id)
            .execute(&mut *tx)
            .await?;

        for (position, item) in sale.items().iter().enumerate() {
            let position = i32::try_from(position)
                .map_err(|_| StoreError::Corrupt(format!("item position {position} out of range")))?;

            sqlx::query(
                r#"
                INSERT INTO sale_items (id, sale_id, position, product, quantity, unit_price_cents, discount_cents, total_amount_cents, is_cancelled)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(item.id.as_uuid())
            .bind(sale_id)
            .bind(position)
            .bind(&item.product)
            .bind(i64::from(item.quantity))
            .bind(item.unit_price.cents())
            .bind(item.discount.cents())
            .bind(item.total_amount().cents())
            .bind(item.is_cancelled)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(items = sale.item_count(), "sale saved");
        Ok(())
    }
}
