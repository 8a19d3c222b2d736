use crate::commands::{into_string, Command, RequestBuilder};
use crate::frame::Frame;
use crate::Result;

/// Returns the username the current connection is authenticated with.
///
/// Ref: <https://redis.io/docs/latest/commands/acl-whoami/>
#[derive(Debug, PartialEq)]
pub struct Whoami;

impl Command for Whoami {
    type Output = String;

    fn name(&self) -> &'static str {
        "ACL WHOAMI"
    }

    fn to_frame(&self) -> Frame {
        RequestBuilder::new("ACL").arg("WHOAMI").build()
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        into_string(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn whoami() {
        assert_eq!(
            Whoami.to_frame(),
            Frame::Array(vec![
                Frame::Bulk(Bytes::from("ACL")),
                Frame::Bulk(Bytes::from("WHOAMI")),
            ])
        );
        assert_eq!(
            Whoami.from_frame(Frame::Bulk(Bytes::from("default"))).unwrap(),
            "default"
        );
    }
}
