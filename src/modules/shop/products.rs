use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use log::warn;

use super::catalog::{show_product_table, Product};
use crate::modules::utils::console::{alert, clear_screen, pause, success, title};
use crate::modules::utils::io::{confirm, prompt};
use crate::modules::utils::logging::log_data_operation;

/// Ids below this are reserved for the remote catalog; the first locally
/// registered product starts here.
const FIRST_LOCAL_ID: u32 = 21;

/// Read the local product file, one `id;title;price;description` line per
/// product. A missing file reads as empty; malformed lines are skipped.
pub fn read_local_products(path: &Path) -> Vec<Product> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!("Could not read {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    raw.lines().filter_map(parse_product_line).collect()
}

fn parse_product_line(line: &str) -> Option<Product> {
    let parts: Vec<&str> = line.splitn(4, ';').collect();
    if parts.len() != 4 {
        return None;
    }
    Some(Product {
        id: parts[0].trim().parse().ok()?,
        title: parts[1].to_string(),
        price: parts[2].trim().parse().ok()?,
        description: parts[3].to_string(),
    })
}

fn product_line(product: &Product) -> String {
    format!(
        "{};{};{};{}\n",
        product.id, product.title, product.price, product.description
    )
}

/// Rewrite the whole local product file.
pub fn write_local_products(path: &Path, products: &[Product]) -> io::Result<()> {
    let mut out = String::new();
    for product in products {
        out.push_str(&product_line(product));
    }
    std::fs::write(path, out)
}

pub fn append_local_product(path: &Path, product: &Product) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(product_line(product).as_bytes())
}

/// Next free id for a locally registered product.
pub fn next_product_id(products: &[Product]) -> u32 {
    products
        .iter()
        .map(|p| p.id)
        .max()
        .map(|max| max + 1)
        .unwrap_or(FIRST_LOCAL_ID)
}

/// Interactive registration of a new local product.
pub fn register_product(path: &Path) {
    clear_screen();
    title("PRODUCT REGISTRATION");

    let outcome = (|| -> io::Result<()> {
        let kind = prompt("Register (1) Product or (2) Clothing", None)?;
        if kind != "1" && kind != "2" {
            alert("Invalid option.");
            return Ok(());
        }

        let title_field = prompt("Name", None)?;
        let price_input = prompt("Price (R$)", None)?;
        let price: f64 = match price_input.trim().parse() {
            Ok(price) => price,
            Err(_) => {
                alert("Invalid price.");
                return Ok(());
            }
        };
        let description = prompt("Description", None)?;

        let existing = read_local_products(path);
        let product = Product {
            id: next_product_id(&existing),
            title: title_field,
            price,
            description,
        };
        append_local_product(path, &product)?;

        let kind_name = if kind == "1" { "Product" } else { "Clothing" };
        log_data_operation("register_product", &path.display().to_string(), true, None);
        success(&format!(
            "{} '{}' registered successfully.",
            kind_name, product.title
        ));
        Ok(())
    })();

    if let Err(e) = outcome {
        log_data_operation("register_product", &path.display().to_string(), false, None);
        alert(&format!("Could not register product: {}", e));
    }
    pause();
}

/// Interactive deletion of a local product.
pub fn delete_product(path: &Path) {
    clear_screen();
    let products = read_local_products(path);

    if products.is_empty() {
        alert("No local products to delete.");
        pause();
        return;
    }

    title("DELETE LOCAL PRODUCT");
    show_product_table("Local Products", &products);

    let outcome = (|| -> io::Result<()> {
        let input = prompt("Enter the ID of the product to delete", None)?;
        let id: u32 = match input.trim().parse() {
            Ok(id) => id,
            Err(_) => {
                alert("Invalid input.");
                return Ok(());
            }
        };

        let target = match products.iter().find(|p| p.id == id) {
            Some(product) => product.clone(),
            None => {
                alert("Product not found.");
                return Ok(());
            }
        };

        if !confirm(
            &format!("Are you sure you want to delete '{}'?", target.title),
            false,
        )? {
            alert("Deletion cancelled.");
            return Ok(());
        }

        let remaining: Vec<Product> = products.into_iter().filter(|p| p.id != id).collect();
        write_local_products(path, &remaining)?;
        log_data_operation("delete_product", &path.display().to_string(), true, None);
        success("Product deleted successfully.");
        Ok(())
    })();

    if let Err(e) = outcome {
        alert(&format!("Could not delete product: {}", e));
    }
    pause();
}

/// Interactive edit of a local product. Empty input keeps the current
/// value of each field.
pub fn edit_product(path: &Path) {
    clear_screen();
    let mut products = read_local_products(path);

    if products.is_empty() {
        alert("No local products to edit.");
        pause();
        return;
    }

    title("EDIT LOCAL PRODUCT");
    show_product_table("Local Products", &products);

    let outcome = (|| -> io::Result<()> {
        let input = prompt("Enter the ID of the product to edit", None)?;
        let id: u32 = match input.trim().parse() {
            Ok(id) => id,
            Err(_) => {
                alert("Invalid input.");
                return Ok(());
            }
        };

        let product = match products.iter_mut().find(|p| p.id == id) {
            Some(product) => product,
            None => {
                alert("Product not found.");
                return Ok(());
            }
        };

        let new_title = prompt("New name", Some(product.title.as_str()))?;
        let current_price = product.price.to_string();
        let price_input = prompt("New price", Some(current_price.as_str()))?;
        let new_price: f64 = match price_input.trim().parse() {
            Ok(price) => price,
            Err(_) => {
                alert("Invalid price.");
                return Ok(());
            }
        };
        let new_description = prompt("New description", Some(product.description.as_str()))?;

        product.title = new_title;
        product.price = new_price;
        product.description = new_description;

        write_local_products(path, &products)?;
        log_data_operation("edit_product", &path.display().to_string(), true, None);
        success("Product updated successfully.");
        Ok(())
    })();

    if let Err(e) = outcome {
        alert(&format!("Could not edit product: {}", e));
    }
    pause();
}
