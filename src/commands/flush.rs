use crate::commands::{Command, RequestBuilder};
use crate::frame::Frame;
use crate::types::SyncOption;
use crate::Result;

/// Delete all the keys of all the existing databases. Reports whether the server acknowledged
/// with `OK`.
///
/// Ref: <https://redis.io/docs/latest/commands/flushall/>
#[derive(Debug, PartialEq)]
pub struct FlushAll {
    pub mode: Option<SyncOption>,
}

/// Delete all the keys of the currently selected database.
///
/// Ref: <https://redis.io/docs/latest/commands/flushdb/>
#[derive(Debug, PartialEq)]
pub struct FlushDb {
    pub mode: Option<SyncOption>,
}

fn flush_request(name: &str, mode: Option<SyncOption>) -> Frame {
    let request = RequestBuilder::new(name);
    match mode {
        Some(mode) => request.arg(mode.to_string()).build(),
        None => request.build(),
    }
}

fn flushed(frame: &Frame) -> bool {
    matches!(frame, Frame::Simple(s) if s == "OK")
}

impl Command for FlushAll {
    type Output = bool;

    fn name(&self) -> &'static str {
        "FLUSHALL"
    }

    fn to_frame(&self) -> Frame {
        flush_request("FLUSHALL", self.mode)
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        Ok(flushed(&frame))
    }
}

impl Command for FlushDb {
    type Output = bool;

    fn name(&self) -> &'static str {
        "FLUSHDB"
    }

    fn to_frame(&self) -> Frame {
        flush_request("FLUSHDB", self.mode)
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        Ok(flushed(&frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn flushall_async() {
        let cmd = FlushAll {
            mode: Some(SyncOption::Async),
        };

        assert_eq!(
            cmd.to_frame(),
            Frame::Array(vec![
                Frame::Bulk(Bytes::from("FLUSHALL")),
                Frame::Bulk(Bytes::from("ASYNC")),
            ])
        );
        assert!(cmd.from_frame(Frame::Simple("OK".to_string())).unwrap());
    }

    #[test]
    fn flushdb_default_mode() {
        let cmd = FlushDb { mode: None };

        assert_eq!(
            cmd.to_frame(),
            Frame::Array(vec![Frame::Bulk(Bytes::from("FLUSHDB"))])
        );
        assert!(!cmd.from_frame(Frame::Null).unwrap());
    }
}
