// A sale is one point-of-sale entry. `date` is the calendar day the sale is
// attributed to and drives daily/period grouping; `created_at` is the moment it
// was recorded and drives ordering and hour-of-day bucketing.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{money, AppError, BusinessTimezone, Result};

/// Well-formed sale, as consumed by the aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    pub price: Decimal,
    pub comment: Option<String>,
    pub order_id: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    pub fn comment_or_empty(&self) -> &str {
        self.comment.as_deref().unwrap_or("")
    }

    pub fn order_id_or_empty(&self) -> &str {
        self.order_id.as_deref().unwrap_or("")
    }
}

/// Raw `sales` row as returned by the store
#[derive(Debug, Clone, FromRow)]
pub struct SaleRow {
    pub id: String,
    pub price: Decimal,
    pub comment: Option<String>,
    pub order_id: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<SaleRow> for Sale {
    type Error = AppError;

    fn try_from(row: SaleRow) -> Result<Self> {
        if row.price <= Decimal::ZERO {
            return Err(AppError::internal(format!(
                "Sale {} has non-positive price {}",
                row.id, row.price
            )));
        }

        Ok(Sale {
            id: row.id,
            price: row.price,
            comment: non_blank(row.comment),
            order_id: non_blank(row.order_id),
            date: row.date,
            created_at: row.created_at,
        })
    }
}

/// Payload for `POST /api/sales`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSaleRequest {
    pub price: Decimal,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    /// Defaults to the current local day
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Validated sale ready to be persisted; the store assigns the id
#[derive(Debug, Clone, PartialEq)]
pub struct NewSale {
    pub price: Decimal,
    pub comment: Option<String>,
    pub order_id: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl NewSale {
    /// Validate a create request against the business calendar
    pub fn from_request(
        request: CreateSaleRequest,
        timezone: &BusinessTimezone,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        money::validate_price(request.price)?;

        let today = now.with_timezone(&timezone.offset()).date_naive();
        let date = request.date.unwrap_or(today);
        if date > today {
            return Err(AppError::validation(format!(
                "Sale date {} cannot be in the future (today is {})",
                date, today
            )));
        }

        Ok(Self {
            price: money::round_amount(request.price),
            comment: non_blank(request.comment),
            order_id: non_blank(request.order_id),
            date,
            created_at: now,
        })
    }

    pub fn into_sale(self, id: String) -> Sale {
        Sale {
            id,
            price: self.price,
            comment: self.comment,
            order_id: self.order_id,
            date: self.date,
            created_at: self.created_at,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
