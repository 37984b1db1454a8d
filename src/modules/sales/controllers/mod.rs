mod sale_controller;

pub use sale_controller::{DailySalesResponse, SaleResponse};

pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    sale_controller::configure(cfg);
}
