// First, declare the modules folder itself
mod modules;

// Re-export everything from modules for easier access
pub use modules::{auth, shop, utils};

// Re-export commonly used types
pub use modules::auth::service::{AuthError, AuthService, PublicUser};
pub use modules::auth::store::{AuthStore, Document};
pub use modules::shop::catalog::Product;
pub use modules::shop::orders::OrderContext;

// Constants
pub const DB_FILE: &str = "db.json";
pub const PRODUCTS_FILE: &str = "produtos_local.txt";
pub const ORDERS_FILE: &str = "Pedidos.txt";
pub const RECOVERY_TOKEN_TTL_SECS: u64 = 15 * 60;
