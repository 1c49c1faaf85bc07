use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::catalog::{load_catalog, show_product_table, Product};
use crate::modules::utils::console::{alert, clear_screen, pause, show_menu, success, table};
use crate::modules::utils::io::{prompt, read_line};
use crate::modules::utils::logging::log_data_operation;
use crate::modules::utils::time::local_now_string;

/// One item of an in-session order. Field names are pinned to the JSON
/// written into the pending-orders file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub id: u32,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "preco")]
    pub price: f64,
}

/// Order being assembled during the session. Owned by the session and
/// passed explicitly, not shared module state.
#[derive(Debug, Default)]
pub struct OrderContext {
    items: Vec<OrderItem>,
}

impl OrderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, product: &Product) {
        self.items.push(OrderItem {
            id: product.id,
            name: product.title.clone(),
            price: product.price,
        });
    }

    /// Remove by zero-based index.
    pub fn remove(&mut self, index: usize) -> Option<OrderItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Pending-orders file line: `<timestamp>;<json array of items>`.
pub fn order_line(items: &[OrderItem], timestamp: &str) -> Result<String, serde_json::Error> {
    Ok(format!("{};{}", timestamp, serde_json::to_string(items)?))
}

pub fn append_order(path: &Path, line: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)
}

fn order_rows(items: &[OrderItem]) -> Vec<Vec<String>> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            vec![
                (i + 1).to_string(),
                item.name.clone(),
                format!("R$ {:.2}", item.price),
            ]
        })
        .collect()
}

fn show_order_table(items: &[OrderItem]) {
    table("Items in the Order", &["#", "Name", "Price (R$)"], &order_rows(items));
}

/// Order assembly menu.
pub fn menu_orders(
    context: &mut OrderContext,
    products_path: &Path,
    orders_path: &Path,
    offline: bool,
) -> io::Result<()> {
    loop {
        show_menu(
            &[
                "Add to order",
                "Finalize order",
                "View order items",
                "Remove item from order",
                "Back",
            ],
            "ORDERS MENU",
        );

        let option = read_line()?;
        match option.as_str() {
            "1" => add_item(context, products_path, offline),
            "2" => finalize_order(context, orders_path),
            "3" => list_items(context),
            "4" => remove_item(context),
            "5" => return Ok(()),
            _ => {
                alert("Invalid option.");
                pause();
            }
        }
    }
}

fn add_item(context: &mut OrderContext, products_path: &Path, offline: bool) {
    clear_screen();
    let catalog = load_catalog(products_path, offline);
    show_product_table("Available Products", &catalog);

    let input = match prompt("Enter the ID of the desired product", None) {
        Ok(input) => input,
        Err(e) => {
            alert(&format!("Error reading input: {}", e));
            return;
        }
    };

    match input.trim().parse::<u32>() {
        Ok(id) => match catalog.iter().find(|p| p.id == id) {
            Some(product) => {
                context.add(product);
                success("Product added to the order.");
            }
            None => alert("Product not found."),
        },
        Err(_) => alert("Invalid input."),
    }
    pause();
}

fn finalize_order(context: &mut OrderContext, orders_path: &Path) {
    clear_screen();
    if context.is_empty() {
        alert("No items in the order.");
        pause();
        return;
    }

    let outcome = (|| -> io::Result<()> {
        let customer = prompt("Customer name", None)?;
        let _document = prompt("Customer CPF", None)?;

        let line = order_line(context.items(), &local_now_string())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        append_order(orders_path, &line)?;

        context.clear();
        log_data_operation(
            "finalize_order",
            &orders_path.display().to_string(),
            true,
            Some(&format!("customer={}", customer)),
        );
        success("Order finalized.");
        Ok(())
    })();

    if let Err(e) = outcome {
        log_data_operation("finalize_order", &orders_path.display().to_string(), false, None);
        alert(&format!("Could not finalize the order: {}", e));
    }
    pause();
}

fn list_items(context: &OrderContext) {
    clear_screen();
    if context.is_empty() {
        alert("No items added yet.");
    } else {
        show_order_table(context.items());
    }
    pause();
}

fn remove_item(context: &mut OrderContext) {
    clear_screen();
    if context.is_empty() {
        alert("No items in the order.");
        pause();
        return;
    }

    show_order_table(context.items());

    let input = match prompt("Enter the item number to remove (0 to cancel)", None) {
        Ok(input) => input,
        Err(e) => {
            alert(&format!("Error reading input: {}", e));
            return;
        }
    };

    match input.trim().parse::<usize>() {
        Ok(0) => alert("Removal cancelled."),
        Ok(number) => match context.remove(number - 1) {
            Some(removed) => success(&format!("Item removed: {}", removed.name)),
            None => alert("Invalid number."),
        },
        Err(_) => alert("Invalid input."),
    }
    pause();
}
