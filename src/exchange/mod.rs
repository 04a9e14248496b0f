//! The chat input handler and the transport it sends messages through.
//!
//! A submission is synchronous up to the point the request is spawned and
//! the input field is cleared; the reply is rendered by a continuation that
//! runs whenever the response arrives.

mod handler;
mod order;
mod transport;

pub use handler::{ChatInputHandler, ExchangeOutcome, PendingExchange};
pub use order::ReplyOrder;
pub use transport::{
    DEFAULT_FIELD, DEFAULT_PATH, HttpTransport, Reply, Transport, TransportError, endpoint_url,
    parse_reply,
};
