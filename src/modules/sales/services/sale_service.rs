use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

use crate::core::{AppError, BusinessTimezone, Result};
use crate::modules::auth::AuthenticatedUser;
use crate::modules::sales::models::{CreateSaleRequest, NewSale, Sale};
use crate::modules::sales::repositories::SaleRepository;

/// Recording, removing, and listing sales
pub struct SaleService {
    repository: Arc<dyn SaleRepository>,
    timezone: BusinessTimezone,
}

impl SaleService {
    pub fn new(repository: Arc<dyn SaleRepository>, timezone: BusinessTimezone) -> Self {
        Self {
            repository,
            timezone,
        }
    }

    /// Validate and record a new sale on behalf of the signed-in operator
    pub async fn create_sale(
        &self,
        request: CreateSaleRequest,
        operator: &AuthenticatedUser,
    ) -> Result<Sale> {
        let new_sale = NewSale::from_request(request, &self.timezone, Utc::now())?;
        let sale = self.repository.create(new_sale).await?;

        info!(
            sale_id = %sale.id,
            date = %sale.date,
            price = %sale.price,
            operator = %operator.username,
            "Sale recorded"
        );

        Ok(sale)
    }

    /// Delete a sale by id
    ///
    /// # Errors
    /// `NotFound` when no sale has this id
    pub async fn delete_sale(&self, id: &str) -> Result<()> {
        if !self.repository.delete(id).await? {
            return Err(AppError::not_found(format!("Sale {}", id)));
        }

        info!(sale_id = %id, "Sale deleted");
        Ok(())
    }

    /// Sales attributed to `date` (local today when absent), newest first
    pub async fn list_for_day(&self, date: Option<NaiveDate>) -> Result<(NaiveDate, Vec<Sale>)> {
        let date = date.unwrap_or_else(|| self.timezone.today());
        let sales = self.repository.list_by_date(date).await?;
        Ok((date, sales))
    }
}
