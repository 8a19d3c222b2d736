use crate::commands::{into_string, unexpected, Command, RequestBuilder};
use crate::frame::Frame;
use crate::Result;

const STARTED: &str = "Background saving started";
const SCHEDULED: &str = "Background saving scheduled";

/// Save the DB in background. With `SCHEDULE` the save is queued when an AOF rewrite is in
/// progress instead of failing.
///
/// Ref: <https://redis.io/docs/latest/commands/bgsave/>
#[derive(Debug, PartialEq)]
pub struct BgSave {
    pub schedule: bool,
}

impl Command for BgSave {
    type Output = ();

    fn name(&self) -> &'static str {
        "BGSAVE"
    }

    fn to_frame(&self) -> Frame {
        let request = RequestBuilder::new("BGSAVE");
        if self.schedule {
            request.arg("SCHEDULE").build()
        } else {
            request.build()
        }
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        // A scheduled save starts right away when nothing else is running.
        match into_string(frame)?.as_str() {
            STARTED => Ok(()),
            SCHEDULED if self.schedule => Ok(()),
            other => unexpected(STARTED, Frame::Simple(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use bytes::Bytes;

    #[test]
    fn schedule() {
        let cmd = BgSave { schedule: true };

        assert_eq!(
            cmd.to_frame(),
            Frame::Array(vec![
                Frame::Bulk(Bytes::from("BGSAVE")),
                Frame::Bulk(Bytes::from("SCHEDULE")),
            ])
        );
        assert!(cmd
            .from_frame(Frame::Simple("Background saving scheduled".to_string()))
            .is_ok());
    }

    #[test]
    fn started() {
        let cmd = BgSave { schedule: false };

        assert!(cmd
            .from_frame(Frame::Simple("Background saving started".to_string()))
            .is_ok());
    }

    #[test]
    fn unexpected_status() {
        let cmd = BgSave { schedule: false };

        let result = cmd.from_frame(Frame::Simple("Background saving scheduled".to_string()));

        assert!(matches!(result, Err(Error::UnexpectedResponse { .. })));
    }
}
