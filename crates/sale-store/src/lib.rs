pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use common::{SaleId, SaleItemId};
pub use error::{Result, StoreError};
pub use memory::InMemorySaleStore;
pub use postgres::PostgresSaleStore;
pub use store::SaleRepository;
