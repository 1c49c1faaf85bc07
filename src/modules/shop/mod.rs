pub mod catalog;
pub mod menu;
pub mod orders;
pub mod payments;
pub mod products;

pub use catalog::Product;
pub use menu::{run_main_menu, StoreContext};
pub use orders::{OrderContext, OrderItem};
