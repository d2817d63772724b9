pub mod connection;
pub mod launch;
pub mod login;

pub use connection::connect_to_browser_and_page;
pub use launch::launch_browser;
pub use login::wait_for_login;
