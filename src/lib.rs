pub mod builder;
pub mod config;
pub mod daemon;
pub mod envelope;
pub mod error;
pub mod forwarder;
pub mod responder;
pub mod router;

pub use crate::config::Config;
pub use crate::envelope::Envelope;
pub use crate::error::{OvonAgentError, Result};
pub use crate::forwarder::{ForwardOutcome, Forwarder};
pub use crate::router::Action;
