use crate::frame::Frame;
use crate::{Error, Result};

/// A single request/reply pair. Implementations are pure: building the request and interpreting
/// the reply never touch the network, the connection drives the exchange in between.
pub trait Command: Sized {
    type Output;

    /// Command name, used for tracing.
    fn name(&self) -> &'static str;

    fn to_frame(&self) -> Frame;

    /// Interprets any reply that is not an error frame.
    fn from_frame(self, frame: Frame) -> Result<Self::Output>;

    /// Called with the message of a simple or bulk error reply.
    fn on_error(self, message: String) -> Result<Self::Output> {
        Err(Error::Server(message))
    }
}
