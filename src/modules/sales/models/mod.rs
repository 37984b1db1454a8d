mod sale;

pub use sale::{CreateSaleRequest, NewSale, Sale, SaleRow};
