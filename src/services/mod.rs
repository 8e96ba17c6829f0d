pub mod form_session;
pub mod record_collector;
pub mod region_service;
pub mod session_service;

pub use form_session::*;
pub use record_collector::*;
pub use region_service::*;
pub use session_service::*;
