pub mod console;
pub mod io;
pub mod logging;
pub mod time;
