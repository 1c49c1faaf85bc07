use std::io::{self, Write};

use super::io::read_line;

/// Clear the terminal and move the cursor to the top-left corner.
pub fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
    let _ = io::stdout().flush();
}

/// Print a boxed section title.
pub fn title(text: &str) {
    let width = text.chars().count() + 8;
    println!("+{}+", "-".repeat(width));
    println!("|    {}    |", text);
    println!("+{}+", "-".repeat(width));
}

/// Clear the screen and print a numbered option menu.
pub fn show_menu(options: &[&str], heading: &str) {
    clear_screen();
    title(heading);
    for (i, option) in options.iter().enumerate() {
        println!(" {} - {}", i + 1, option);
    }
    print!("Choose an option: ");
    let _ = io::stdout().flush();
}

/// Render rows as an aligned table with a title line. Column widths are
/// sized to the longest cell of each column, headers included.
pub fn table(heading: &str, headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    println!("\n{}", heading);
    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:<width$}", h, width = widths[i]))
        .collect();
    println!("  {}", header_line.join("  "));

    let rule: usize = widths.iter().sum::<usize>() + 2 * widths.len();
    println!("  {}", "-".repeat(rule));

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        println!("  {}", line.join("  "));
    }
    println!();
}

pub fn success(message: &str) {
    println!("[OK] {}", message);
}

pub fn alert(message: &str) {
    println!("[!] {}", message);
}

/// Block until the user presses Enter.
pub fn pause() {
    println!("\nPress Enter to continue...");
    let _ = read_line();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_does_not_panic_on_ragged_rows() {
        // Rows longer than the header list must not index past the widths.
        let rows = vec![
            vec!["1".to_string(), "Shirt".to_string()],
            vec!["2".to_string(), "Hat".to_string(), "extra".to_string()],
        ];
        table("Products", &["ID", "Name"], &rows);
    }
}
