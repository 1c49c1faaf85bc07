use std::io;
use std::path::Path;

use super::orders::OrderItem;
use crate::modules::utils::console::{alert, clear_screen, pause, success, title};
use crate::modules::utils::io::prompt;
use crate::modules::utils::logging::log_data_operation;

/// Sum every item price across all pending-order lines. Lines that do not
/// follow the `timestamp;json` format are counted as skipped instead of
/// aborting the total.
pub fn pending_total(raw: &str) -> (f64, usize) {
    let mut total = 0.0;
    let mut skipped = 0;

    for line in raw.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let parsed = line
            .split_once(';')
            .and_then(|(_, json)| serde_json::from_str::<Vec<OrderItem>>(json).ok());
        match parsed {
            Some(items) => total += items.iter().map(|item| item.price).sum::<f64>(),
            None => skipped += 1,
        }
    }

    (total, skipped)
}

pub fn clear_orders(path: &Path) -> io::Result<()> {
    std::fs::write(path, "")
}

/// Payment screen: total up the pending orders, take a payment method and
/// clear the file.
pub fn settle_orders(orders_path: &Path) {
    clear_screen();
    title("ORDER PAYMENT");

    let raw = match std::fs::read_to_string(orders_path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            alert("Orders file not found.");
            pause();
            return;
        }
        Err(e) => {
            alert(&format!("Could not read the orders file: {}", e));
            pause();
            return;
        }
    };

    if raw.trim().is_empty() {
        alert("No pending orders.");
        pause();
        return;
    }

    let (total, skipped) = pending_total(&raw);
    if skipped > 0 {
        alert(&format!(
            "{} order line(s) could not be read and were ignored.",
            skipped
        ));
    }

    println!("\nTotal due: R$ {:.2}", total);
    let method = match prompt("Payment method (credit/debit/cash)", None) {
        Ok(method) => method,
        Err(e) => {
            alert(&format!("Error reading input: {}", e));
            pause();
            return;
        }
    };

    success(&format!(
        "Payment of R$ {:.2} completed via {}!",
        total,
        method.to_uppercase()
    ));

    match clear_orders(orders_path) {
        Ok(()) => {
            log_data_operation("settle_orders", &orders_path.display().to_string(), true, None);
            success("Orders settled and file cleared.");
        }
        Err(e) => {
            log_data_operation("settle_orders", &orders_path.display().to_string(), false, None);
            alert(&format!("Could not clear the orders file: {}", e));
        }
    }
    pause();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_pending_total_sums_all_lines() {
        let raw = concat!(
            "2024-05-01 10:00:00;[{\"id\":1,\"nome\":\"Shirt\",\"preco\":80.0}]\n",
            "2024-05-01 11:00:00;[{\"id\":2,\"nome\":\"Cap\",\"preco\":25.5},",
            "{\"id\":3,\"nome\":\"Sock\",\"preco\":4.5}]\n",
        );

        let (total, skipped) = pending_total(raw);
        assert!((total - 110.0).abs() < 1e-9);
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_pending_total_skips_malformed_lines() {
        let raw = concat!(
            "2024-05-01 10:00:00;[{\"id\":1,\"nome\":\"Shirt\",\"preco\":80.0}]\n",
            "garbage without separator\n",
            "2024-05-01 11:00:00;{not json}\n",
        );

        let (total, skipped) = pending_total(raw);
        assert!((total - 80.0).abs() < 1e-9);
        assert_eq!(skipped, 2);
    }

    #[test]
    fn test_pending_total_ignores_blank_lines() {
        let (total, skipped) = pending_total("\n   \n");
        assert_eq!(total, 0.0);
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_clear_orders_truncates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Pedidos.txt");
        std::fs::write(&path, "2024-05-01 10:00:00;[]\n").unwrap();

        clear_orders(&path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().is_empty());
    }
}
