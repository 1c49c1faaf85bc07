use std::path::Path;
use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use super::products::read_local_products;
use crate::modules::utils::console::{clear_screen, pause, table, title};
use crate::modules::utils::io::confirm;

pub const CATALOG_URL: &str = "https://fakestoreapi.com/products";

/// Products cheaper than this go into the promotional view.
pub const PROMO_PRICE_LIMIT: f64 = 60.0;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// One catalog entry, remote or locally registered. Matches the product
/// API's JSON shape.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Product {
    pub id: u32,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
}

/// Fetch the remote catalog. Network or parse failures are logged and
/// degrade to an empty list so the local catalog stays browsable.
pub fn fetch_remote_catalog() -> Vec<Product> {
    let client = match reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            warn!("Could not build HTTP client: {}", e);
            return Vec::new();
        }
    };

    match client
        .get(CATALOG_URL)
        .send()
        .and_then(|response| response.error_for_status())
    {
        Ok(response) => match response.json::<Vec<Product>>() {
            Ok(products) => products,
            Err(e) => {
                warn!("Product API response did not parse: {}", e);
                Vec::new()
            }
        },
        Err(e) => {
            warn!("Could not reach the product API: {}", e);
            Vec::new()
        }
    }
}

/// Remote products first, locally registered ones appended after.
pub fn merge_catalog(remote: Vec<Product>, local: Vec<Product>) -> Vec<Product> {
    let mut all = remote;
    all.extend(local);
    all
}

pub fn promotional(products: &[Product]) -> Vec<Product> {
    products
        .iter()
        .filter(|p| p.price < PROMO_PRICE_LIMIT)
        .cloned()
        .collect()
}

/// Full catalog as seen by the storefront: the remote list (unless
/// offline) merged with the local product file.
pub fn load_catalog(products_path: &Path, offline: bool) -> Vec<Product> {
    let remote = if offline {
        Vec::new()
    } else {
        fetch_remote_catalog()
    };
    merge_catalog(remote, read_local_products(products_path))
}

pub fn product_rows(products: &[Product]) -> Vec<Vec<String>> {
    products
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.title.clone(),
                format!("R$ {:.2}", p.price),
            ]
        })
        .collect()
}

pub fn show_product_table(heading: &str, products: &[Product]) {
    table(heading, &["ID", "Name", "Price (R$)"], &product_rows(products));
}

/// Interactive catalog screen with the optional promotional filter.
pub fn show_catalog(products_path: &Path, offline: bool) {
    clear_screen();
    title("PRODUCT CATALOG");

    let promo = confirm(
        &format!(
            "Show only the promotional catalog (price < R$ {:.0})?",
            PROMO_PRICE_LIMIT
        ),
        false,
    )
    .unwrap_or(false);

    let all = load_catalog(products_path, offline);
    let shown = if promo { promotional(&all) } else { all };
    show_product_table("Available Products", &shown);
    pause();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u32, title: &str, price: f64) -> Product {
        Product {
            id,
            title: title.to_string(),
            price,
            description: String::new(),
        }
    }

    #[test]
    fn test_merge_keeps_remote_first() {
        let remote = vec![product(1, "Shirt", 80.0)];
        let local = vec![product(21, "Cap", 25.0)];

        let merged = merge_catalog(remote, local);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, 1);
        assert_eq!(merged[1].id, 21);
    }

    #[test]
    fn test_promotional_filter_is_strictly_below_limit() {
        let products = vec![
            product(1, "Cheap", 59.99),
            product(2, "Boundary", 60.0),
            product(3, "Expensive", 120.0),
        ];

        let promo = promotional(&products);
        assert_eq!(promo.len(), 1);
        assert_eq!(promo[0].id, 1);
    }

    #[test]
    fn test_product_parses_api_shape() {
        let json = r#"[{"id": 1, "title": "Fjallraven Backpack", "price": 109.95,
                        "description": "Fits 15in laptops", "category": "men's clothing"}]"#;
        let products: Vec<Product> = serde_json::from_str(json).unwrap();
        assert_eq!(products[0].id, 1);
        assert_eq!(products[0].title, "Fjallraven Backpack");
    }

    #[test]
    fn test_product_description_is_optional() {
        let json = r#"{"id": 2, "title": "Hat", "price": 19.9}"#;
        let parsed: Product = serde_json::from_str(json).unwrap();
        assert!(parsed.description.is_empty());
    }

    #[test]
    fn test_product_rows_format_prices() {
        let rows = product_rows(&[product(1, "Shirt", 80.0)]);
        assert_eq!(rows[0], vec!["1", "Shirt", "R$ 80.00"]);
    }
}
