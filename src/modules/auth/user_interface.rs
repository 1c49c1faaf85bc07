use std::io;

use log::{error, info};

use super::service::{AuthService, PublicUser};
use crate::modules::utils::console::{alert, clear_screen, pause, success, title};
use crate::modules::utils::io::{confirm, is_valid_email, prompt, prompt_password};
use crate::modules::utils::logging::log_auth_event;
use crate::modules::utils::time::format_timestamp;

/// Outcome of a single pass through the initial menu.
enum MenuResult {
    LoggedIn(PublicUser),
    Stay,
    Exit,
}

fn show_initial_options() {
    clear_screen();
    title("LOGIN");
    println!(" [1] Log in");
    println!(" [2] Create an account");
    println!(" [3] Forgot my password");
    println!(" [0] Exit");
}

/// Login/registration/recovery loop. Returns the sanitized user record on
/// a successful login, or `None` when the user chooses to leave.
pub fn run_auth_flow(service: &AuthService) -> Option<PublicUser> {
    loop {
        show_initial_options();

        let choice = match prompt("Option", Some("1")) {
            Ok(input) => input,
            Err(e) => {
                alert(&format!("Error reading input: {}", e));
                return None;
            }
        };

        let result = match choice.as_str() {
            "1" => handle_login(service),
            "2" => {
                if handle_registration(service) {
                    success("Account created! Please log in.");
                    pause();
                }
                MenuResult::Stay
            }
            "3" => {
                handle_recovery(service);
                MenuResult::Stay
            }
            "0" => MenuResult::Exit,
            _ => {
                alert("Invalid option.");
                pause();
                MenuResult::Stay
            }
        };

        match result {
            MenuResult::LoggedIn(user) => return Some(user),
            MenuResult::Stay => continue,
            MenuResult::Exit => return None,
        }
    }
}

fn handle_login(service: &AuthService) -> MenuResult {
    loop {
        let login = match prompt("Username or e-mail", None) {
            Ok(input) => input,
            Err(e) => {
                alert(&format!("Error reading input: {}", e));
                return MenuResult::Stay;
            }
        };
        let password = match prompt_password("Password") {
            Ok(input) => input,
            Err(e) => {
                alert(&format!("Error reading password: {}", e));
                return MenuResult::Stay;
            }
        };

        match service.validate_login(&login, &password) {
            Ok(user) => {
                log_auth_event("login", &login, true, None);
                success("Login successful!");
                pause();
                return MenuResult::LoggedIn(user);
            }
            Err(e) => {
                log_auth_event("login", &login, false, Some(&e.to_string()));
                alert(&e.to_string());
                match confirm("Try again?", true) {
                    Ok(true) => continue,
                    _ => return MenuResult::Stay,
                }
            }
        }
    }
}

/// Collect registration input and call the service. The password
/// confirmation is checked locally; a mismatch never reaches the service.
fn handle_registration(service: &AuthService) -> bool {
    clear_screen();
    title("CREATE ACCOUNT");

    let answers = (|| -> io::Result<bool> {
        let username = prompt("Username", None)?;
        let full_name = prompt("Full name", None)?;
        let email = prompt("E-mail", None)?;
        if !is_valid_email(&email) {
            alert("Invalid e-mail address.");
            pause();
            return Ok(false);
        }

        let password = prompt_password("Password")?;
        let confirmation = prompt_password("Confirm password")?;

        if password != confirmation {
            alert("Passwords do not match.");
            pause();
            return Ok(false);
        }

        let question = prompt("Security question (used to recover your password)", None)?;
        let answer = prompt("Answer", None)?;

        match service.create_user(&username, &full_name, &email, &password, &question, &answer) {
            Ok(_) => {
                info!("user '{}' registered", username);
                Ok(true)
            }
            Err(e) => {
                alert(&e.to_string());
                pause();
                Ok(false)
            }
        }
    })();

    match answers {
        Ok(created) => created,
        Err(e) => {
            alert(&format!("Error reading input: {}", e));
            false
        }
    }
}

fn handle_recovery(service: &AuthService) {
    clear_screen();
    title("FORGOT MY PASSWORD");

    let outcome = (|| -> io::Result<()> {
        let login = prompt("Enter your username or e-mail", None)?;

        let challenge = match service.begin_recovery(&login) {
            Ok(challenge) => challenge,
            Err(e) => {
                alert(&e.to_string());
                pause();
                return Ok(());
            }
        };

        println!("\nAnswer the security question:");
        println!("  {}", challenge.question);
        println!("(a temporary token was generated; it expires in 15 minutes)\n");

        let answer = prompt("Answer", None)?;
        let new_password = prompt_password("New password")?;
        let confirmation = prompt_password("Confirm new password")?;

        if new_password != confirmation {
            alert("Passwords do not match.");
            pause();
            return Ok(());
        }

        match service.conclude_recovery(&challenge.token, &answer, &new_password) {
            Ok(message) => {
                info!("password reset completed for '{}'", login);
                success(&message);
            }
            Err(e) => {
                info!("password reset failed for '{}': {}", login, e);
                alert(&e.to_string());
            }
        }
        pause();
        Ok(())
    })();

    if let Err(e) = outcome {
        alert(&format!("Error reading input: {}", e));
    }
}

/// Entry point: authenticate, then hand the session over to the post-login
/// menu. A failing menu is reported, never allowed to take the process
/// down with it.
pub fn start_session<F>(service: &AuthService, open_main_menu: F)
where
    F: FnOnce() -> io::Result<()>,
{
    info!("application started");

    let user = match run_auth_flow(service) {
        Some(user) => user,
        None => return,
    };

    info!(
        "session opened for '{}' (account created {})",
        user.username,
        format_timestamp(user.created_at)
    );
    if let Err(e) = open_main_menu() {
        error!("main menu failed: {}", e);
        alert(&format!("Logged in, but the main menu failed: {}", e));
        pause();
    }
}
