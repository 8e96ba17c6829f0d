pub mod date;
pub mod price;

pub use date::{format_date_parts, validate_date_parts};
pub use price::validate_price;
