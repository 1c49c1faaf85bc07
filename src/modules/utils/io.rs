use std::io::{self, Write};

/// Helper function to read a line from stdin
pub fn read_line() -> io::Result<String> {
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Prompt for a value, optionally showing a default used when the user
/// just presses Enter.
pub fn prompt(label: &str, default: Option<&str>) -> io::Result<String> {
    match default {
        Some(value) => {
            print!("{} [{}]: ", label, value);
            io::stdout().flush()?;
            let input = read_line()?;
            if input.is_empty() {
                Ok(value.to_string())
            } else {
                Ok(input)
            }
        }
        None => {
            print!("{}: ", label);
            io::stdout().flush()?;
            read_line()
        }
    }
}

/// Prompt for a secret without echoing it back to the terminal.
pub fn prompt_password(label: &str) -> io::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    rpassword::read_password()
}

/// Yes/no confirmation. Empty input picks the default; `s`, `sim`, `y`
/// and `yes` count as affirmative regardless of case.
pub fn confirm(label: &str, default: bool) -> io::Result<bool> {
    let suffix = if default { "S/n" } else { "s/N" };
    print!("{} ({}): ", label, suffix);
    io::stdout().flush()?;

    let response = read_line()?.to_lowercase();
    if response.is_empty() {
        return Ok(default);
    }
    Ok(matches!(response.as_str(), "s" | "sim" | "y" | "yes"))
}

/// Loose shape check for an e-mail address, applied before an account
/// is created.
pub fn is_valid_email(email: &str) -> bool {
    email.contains('@')
        && email.contains('.')
        && !email.contains(' ')
        && email.chars().filter(|&c| c == '@').count() == 1
        && email.len() >= 5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        // Valid emails
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("user.name@example.co.uk"));
        assert!(is_valid_email("user+tag@example.com"));

        // Invalid emails
        assert!(!is_valid_email("user@example")); // Missing TLD
        assert!(!is_valid_email("user example.com")); // Contains space
        assert!(!is_valid_email("user")); // No @ symbol
        assert!(!is_valid_email("")); // Empty string
        assert!(!is_valid_email("user@@example.com")); // Multiple @ symbols
    }
}
