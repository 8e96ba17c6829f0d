pub mod form;
pub mod region;
pub mod session;

pub use form::form_config;
pub use region::region_config;
pub use session::session_config;
