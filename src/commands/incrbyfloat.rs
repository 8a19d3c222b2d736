use crate::commands::{into_string, unexpected, Command, RequestBuilder};
use crate::frame::Frame;
use crate::Result;

/// Increment the string representing a floating point number stored at key by the specified
/// increment. By using a negative increment value, the result is that the value stored at the key
/// is decremented. If the key does not exist, it is set to 0 before performing the operation.
///
/// The new value comes back as a bulk string and is parsed here.
///
/// Ref: <https://redis.io/docs/latest/commands/incrbyfloat/>
#[derive(Debug, PartialEq)]
pub struct IncrByFloat {
    pub key: String,
    pub increment: f64,
}

impl Command for IncrByFloat {
    type Output = f64;

    fn name(&self) -> &'static str {
        "INCRBYFLOAT"
    }

    fn to_frame(&self) -> Frame {
        RequestBuilder::new("INCRBYFLOAT")
            .arg(&self.key)
            .arg(self.increment.to_string())
            .build()
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        if let Frame::Double(value) = frame {
            return Ok(value);
        }

        let text = into_string(frame)?;
        match text.parse::<f64>() {
            Ok(value) => Ok(value),
            Err(_) => unexpected("floating point number", Frame::Bulk(text.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use bytes::Bytes;

    #[test]
    fn incrbyfloat() {
        let cmd = IncrByFloat {
            key: String::from("key1"),
            increment: 0.1,
        };

        assert_eq!(
            cmd.to_frame(),
            Frame::Array(vec![
                Frame::Bulk(Bytes::from("INCRBYFLOAT")),
                Frame::Bulk(Bytes::from("key1")),
                Frame::Bulk(Bytes::from("0.1")),
            ])
        );
        assert_eq!(cmd.from_frame(Frame::Bulk(Bytes::from("10.6"))).unwrap(), 10.6);
    }

    #[test]
    fn exponent_reply() {
        let cmd = IncrByFloat {
            key: String::from("key1"),
            increment: 2.0e3,
        };

        assert_eq!(
            cmd.from_frame(Frame::Bulk(Bytes::from("5.0e3"))).unwrap(),
            5000.0
        );
    }

    #[test]
    fn not_a_number() {
        let cmd = IncrByFloat {
            key: String::from("key1"),
            increment: 1.0,
        };

        let result = cmd.from_frame(Frame::Bulk(Bytes::from("abc")));

        assert!(matches!(result, Err(Error::UnexpectedResponse { .. })));
    }
}
