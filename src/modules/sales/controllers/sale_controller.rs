//! Sale controller for HTTP endpoints
//!
//! Recording, deleting, and listing the sales of a single day.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{money, BusinessTimezone, Result};
use crate::modules::auth::AuthenticatedUser;
use crate::modules::sales::models::{CreateSaleRequest, Sale};
use crate::modules::sales::repositories::SaleRepository;
use crate::modules::sales::services::SaleService;

/// Query parameters for the daily sales list
#[derive(Debug, Deserialize)]
pub struct DailySalesQuery {
    /// Day to list (format: YYYY-MM-DD), defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Sale as rendered to clients
#[derive(Debug, Serialize)]
pub struct SaleResponse {
    pub id: String,
    pub price: String, // Decimal as string for JSON precision
    pub comment: Option<String>,
    pub order_id: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<Sale> for SaleResponse {
    fn from(sale: Sale) -> Self {
        Self {
            id: sale.id,
            price: money::format_amount(sale.price),
            comment: sale.comment,
            order_id: sale.order_id,
            date: sale.date,
            created_at: sale.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DailySalesResponse {
    pub date: NaiveDate,
    pub sales: Vec<SaleResponse>,
}

fn service(
    repository: &web::Data<dyn SaleRepository>,
    timezone: &web::Data<BusinessTimezone>,
) -> SaleService {
    SaleService::new(repository.clone().into_inner(), *timezone.get_ref())
}

/// POST /api/sales
pub async fn create_sale(
    repository: web::Data<dyn SaleRepository>,
    timezone: web::Data<BusinessTimezone>,
    user: web::ReqData<AuthenticatedUser>,
    payload: web::Json<CreateSaleRequest>,
) -> Result<HttpResponse> {
    let sale = service(&repository, &timezone)
        .create_sale(payload.into_inner(), &user)
        .await?;

    Ok(HttpResponse::Created().json(SaleResponse::from(sale)))
}

/// DELETE /api/sales/{id}
pub async fn delete_sale(
    repository: web::Data<dyn SaleRepository>,
    timezone: web::Data<BusinessTimezone>,
    sale_id: web::Path<String>,
) -> Result<HttpResponse> {
    service(&repository, &timezone)
        .delete_sale(&sale_id)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/sales?date=YYYY-MM-DD
pub async fn list_daily_sales(
    repository: web::Data<dyn SaleRepository>,
    timezone: web::Data<BusinessTimezone>,
    query: web::Query<DailySalesQuery>,
) -> Result<HttpResponse> {
    let (date, sales) = service(&repository, &timezone)
        .list_for_day(query.date)
        .await?;

    Ok(HttpResponse::Ok().json(DailySalesResponse {
        date,
        sales: sales.into_iter().map(SaleResponse::from).collect(),
    }))
}

/// Configure sale routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/sales")
            .route("", web::post().to(create_sale))
            .route("", web::get().to(list_daily_sales))
            .route("/{id}", web::delete().to(delete_sale)),
    );
}
