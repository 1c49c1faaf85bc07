use clap::{Arg, ArgAction, Command};

use storefront::auth::service::AuthService;
use storefront::auth::store::AuthStore;
use storefront::auth::user_interface::start_session;
use storefront::shop::menu::{run_main_menu, StoreContext};
use storefront::utils::logging::initialize_logging;

fn main() {
    let matches = Command::new("storefront")
        .about("Console storefront with local accounts")
        .arg(
            Arg::new("db")
                .long("db")
                .help("Path to the backing user database")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("offline")
                .long("offline")
                .help("Skip the remote catalog fetch")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    if let Err(e) = initialize_logging() {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    let db_path = matches
        .get_one::<String>("db")
        .map(String::as_str)
        .unwrap_or(storefront::DB_FILE);
    let offline = matches.get_flag("offline");

    let service = AuthService::new(AuthStore::new(db_path));
    let mut context = StoreContext::new(offline);
    start_session(&service, || run_main_menu(&mut context));
}
