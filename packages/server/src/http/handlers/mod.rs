mod config;
mod health;
mod not_found;
pub(crate) mod openapi;
mod prices;

pub use config::handle_config;
pub use health::handle_health;
pub use not_found::handle_not_found;
pub use prices::{handle_multiple_prices, handle_prices};
