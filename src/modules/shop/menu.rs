use std::io;
use std::path::PathBuf;

use super::{catalog, orders, payments, products};
use crate::modules::utils::console::{alert, clear_screen, pause, show_menu, success};
use crate::modules::utils::io::read_line;

/// Everything the storefront session owns: the order being assembled and
/// the file paths it works against.
pub struct StoreContext {
    pub order: orders::OrderContext,
    pub products_path: PathBuf,
    pub orders_path: PathBuf,
    pub offline: bool,
}

impl StoreContext {
    pub fn new(offline: bool) -> Self {
        Self::with_paths(crate::PRODUCTS_FILE, crate::ORDERS_FILE, offline)
    }

    pub fn with_paths(
        products_path: impl Into<PathBuf>,
        orders_path: impl Into<PathBuf>,
        offline: bool,
    ) -> Self {
        Self {
            order: orders::OrderContext::new(),
            products_path: products_path.into(),
            orders_path: orders_path.into(),
            offline,
        }
    }
}

/// Post-login main menu.
pub fn run_main_menu(context: &mut StoreContext) -> io::Result<()> {
    loop {
        show_menu(
            &[
                "Registrations",
                "Payments",
                "Product catalog",
                "Orders",
                "Exit",
            ],
            "MAIN MENU",
        );

        let option = read_line()?;
        match option.as_str() {
            "1" => menu_registrations(context)?,
            "2" => payments::settle_orders(&context.orders_path),
            "3" => catalog::show_catalog(&context.products_path, context.offline),
            "4" => orders::menu_orders(
                &mut context.order,
                &context.products_path,
                &context.orders_path,
                context.offline,
            )?,
            "5" => {
                clear_screen();
                success("Thanks for shopping with us!");
                return Ok(());
            }
            _ => {
                alert("Invalid option.");
                pause();
            }
        }
    }
}

fn menu_registrations(context: &mut StoreContext) -> io::Result<()> {
    loop {
        show_menu(
            &[
                "Register product/clothing",
                "Delete product",
                "Edit product",
                "Back",
            ],
            "REGISTRATIONS MENU",
        );

        let option = read_line()?;
        match option.as_str() {
            "1" => products::register_product(&context.products_path),
            "2" => products::delete_product(&context.products_path),
            "3" => products::edit_product(&context.products_path),
            "4" => return Ok(()),
            _ => {
                alert("Invalid option.");
                pause();
            }
        }
    }
}
