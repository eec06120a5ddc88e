//! Gateway middleware: correlation IDs and access logging.

pub mod access_log;
pub mod request_id;

pub use access_log::access_log;
pub use request_id::{propagate_request_id, RequestId, REQUEST_ID_HEADER};
