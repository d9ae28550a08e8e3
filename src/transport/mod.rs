//! Transport layer: wire-format details (payload building and response decoding).

mod payload;
mod send;

pub use payload::{PayloadError, encode_json_payload, encode_plain_text_form};
pub use send::{TransportError, decode_send_json_response, reconcile};
