// Handler modules
pub mod menu;
pub mod tools;

pub use menu::{MenuChoice, run_menu};
pub use tools::{Session, bootstrap_environment, bootstrap_host, confirm_privileges, handle_command};
