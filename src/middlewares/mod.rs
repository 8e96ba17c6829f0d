pub mod cors;
pub mod session;

pub use cors::create_cors;
pub use session::{SESSION_HEADER, SessionMiddleware};
