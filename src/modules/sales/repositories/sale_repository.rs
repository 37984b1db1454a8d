// Persistence boundary for sales.
//
// Every row leaving the store goes through `Sale::try_from(SaleRow)` so callers
// only ever see well-formed sales.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::core::Result;
use crate::modules::sales::models::{NewSale, Sale, SaleRow};

/// Storage operations the rest of the application needs
#[async_trait]
pub trait SaleRepository: Send + Sync {
    /// Persist a new sale and return it with its generated id
    async fn create(&self, sale: NewSale) -> Result<Sale>;

    /// Delete a sale; returns false when nothing matched
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Sales attributed to one day, newest `created_at` first
    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Sale>>;

    /// Sales attributed to an inclusive day range, latest `date` first
    async fn list_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Sale>>;

    /// Sales recorded in `[from, until)`, ordered by `date` then `created_at`
    async fn list_by_created_at_range(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Sale>>;

    /// Cheap connectivity check for readiness probes
    async fn ping(&self) -> Result<()>;
}

const SELECT_COLUMNS: &str = "SELECT id, price, comment, order_id, date, created_at FROM sales";

/// MySQL-backed sale repository
pub struct MySqlSaleRepository {
    pool: MySqlPool,
}

impl MySqlSaleRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn into_sales(rows: Vec<SaleRow>) -> Result<Vec<Sale>> {
    rows.into_iter().map(Sale::try_from).collect()
}

#[async_trait]
impl SaleRepository for MySqlSaleRepository {
    async fn create(&self, sale: NewSale) -> Result<Sale> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO sales (id, price, comment, order_id, date, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(sale.price)
        .bind(&sale.comment)
        .bind(&sale.order_id)
        .bind(sale.date)
        .bind(sale.created_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(sale_id = %id, date = %sale.date, "Sale stored");

        Ok(sale.into_sale(id))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sales WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Sale>> {
        let sql = format!("{} WHERE date = ? ORDER BY created_at DESC", SELECT_COLUMNS);
        let rows = sqlx::query_as::<_, SaleRow>(&sql)
            .bind(date)
            .fetch_all(&self.pool)
            .await?;
        into_sales(rows)
    }

    async fn list_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Sale>> {
        let sql = format!(
            "{} WHERE date >= ? AND date <= ? ORDER BY date DESC, created_at DESC",
            SELECT_COLUMNS
        );
        let rows = sqlx::query_as::<_, SaleRow>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;
        into_sales(rows)
    }

    async fn list_by_created_at_range(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Sale>> {
        let sql = format!(
            "{} WHERE created_at >= ? AND created_at < ? ORDER BY date ASC, created_at ASC",
            SELECT_COLUMNS
        );
        let rows = sqlx::query_as::<_, SaleRow>(&sql)
            .bind(from)
            .bind(until)
            .fetch_all(&self.pool)
            .await?;
        into_sales(rows)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
