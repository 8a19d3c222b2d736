use bytes::Bytes;

use crate::commands::{into_bytes, unexpected, Command, RequestBuilder};
use crate::frame::Frame;
use crate::types::{ExpireOption, PreviousKeyHandling, SetOptions, SetResult};
use crate::Result;

/// Set `key` to hold the string `value`. If `key` already holds a value, it is overwritten,
/// regardless of its type. Any previous time to live associated with the key is discarded on
/// successful SET operation, unless `KEEPTTL` is given.
///
/// The reply shape depends on the options:
///
/// * without `GET`, `OK` means written and nil means the `NX`/`XX` condition was not met.
/// * with `GET`, nil means the key did not exist and a bulk string is the old value.
///
/// Ref: <https://redis.io/docs/latest/commands/set/>
#[derive(Debug, PartialEq)]
pub struct Set {
    pub key: String,
    pub value: Bytes,
    pub options: SetOptions,
}

impl Command for Set {
    type Output = SetResult<Bytes>;

    fn name(&self) -> &'static str {
        "SET"
    }

    fn to_frame(&self) -> Frame {
        let mut request = RequestBuilder::new("SET")
            .arg(&self.key)
            .arg_bytes(self.value.clone());

        request = match self.options.previous_key_handling {
            PreviousKeyHandling::Override => request,
            PreviousKeyHandling::KeepIfExists => request.arg("NX"),
            PreviousKeyHandling::OverrideOnly => request.arg("XX"),
        };

        if self.options.get_previous_value {
            request = request.arg("GET");
        }

        request = match self.options.expire {
            None => request,
            Some(ExpireOption::Seconds(n)) => request.arg("EX").arg(n.to_string()),
            Some(ExpireOption::Milliseconds(n)) => request.arg("PX").arg(n.to_string()),
            Some(ExpireOption::AtUnixSecond(n)) => request.arg("EXAT").arg(n.to_string()),
            Some(ExpireOption::AtUnixMillisecond(n)) => request.arg("PXAT").arg(n.to_string()),
            Some(ExpireOption::KeepTtl) => request.arg("KEEPTTL"),
        };

        request.build()
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        match (self.options.get_previous_value, frame) {
            (false, Frame::Null) => Ok(SetResult::Aborted),
            (false, Frame::Simple(ref s)) if s == "OK" => Ok(SetResult::Ok),
            (false, frame) => unexpected("OK or nil", frame),
            (true, Frame::Null) => Ok(SetResult::NotFound),
            (true, frame) => into_bytes(frame).map(SetResult::PreviousValue),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn set(options: SetOptions) -> Set {
        Set {
            key: String::from("key"),
            value: Bytes::from("value"),
            options,
        }
    }

    fn request(args: &[&str]) -> Frame {
        Frame::Array(
            args.iter()
                .map(|arg| Frame::Bulk(Bytes::copy_from_slice(arg.as_bytes())))
                .collect(),
        )
    }

    #[test]
    fn plain_set() {
        let cmd = set(SetOptions::default());

        assert_eq!(cmd.to_frame(), request(&["SET", "key", "value"]));
        assert_eq!(
            cmd.from_frame(Frame::Simple("OK".to_string())).unwrap(),
            SetResult::Ok
        );
    }

    #[test]
    fn all_options() {
        let cmd = set(
            SetOptions::new()
                .if_exists()
                .get()
                .expire(ExpireOption::AtUnixMillisecond(1700000000000)),
        );

        assert_eq!(
            cmd.to_frame(),
            request(&["SET", "key", "value", "XX", "GET", "PXAT", "1700000000000"])
        );
    }

    #[test]
    fn keep_ttl() {
        let cmd = set(SetOptions::new().expire(ExpireOption::KeepTtl));

        assert_eq!(cmd.to_frame(), request(&["SET", "key", "value", "KEEPTTL"]));
    }

    #[test]
    fn nx_not_written() {
        let cmd = set(SetOptions::new().if_not_exists());

        assert_eq!(cmd.to_frame(), request(&["SET", "key", "value", "NX"]));
        assert_eq!(cmd.from_frame(Frame::Null).unwrap(), SetResult::Aborted);
    }

    #[test]
    fn get_previous_value() {
        let cmd = set(SetOptions::new().get());

        assert_eq!(
            cmd.from_frame(Frame::Bulk(Bytes::from("old"))).unwrap(),
            SetResult::PreviousValue(Bytes::from("old"))
        );

        let cmd = set(SetOptions::new().get());

        assert_eq!(cmd.from_frame(Frame::Null).unwrap(), SetResult::NotFound);
    }

    #[test]
    fn unexpected_reply() {
        let cmd = set(SetOptions::default());

        let result = cmd.from_frame(Frame::Integer(1));

        assert!(matches!(result, Err(Error::UnexpectedResponse { .. })));
    }
}
