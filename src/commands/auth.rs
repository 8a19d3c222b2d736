use std::fmt;

use crate::commands::{expect_ok, Command, RequestBuilder};
use crate::frame::Frame;
use crate::Result;

/// Authenticates the current connection, either with the `requirepass` password or with an ACL
/// user.
///
/// Ref: <https://redis.io/docs/latest/commands/auth/>
#[derive(PartialEq)]
pub struct Auth {
    pub username: Option<String>,
    pub password: String,
}

// Keeps the password out of logs.
impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Command for Auth {
    type Output = ();

    fn name(&self) -> &'static str {
        "AUTH"
    }

    fn to_frame(&self) -> Frame {
        let request = RequestBuilder::new("AUTH");
        let request = match &self.username {
            Some(username) => request.arg(username),
            None => request,
        };
        request.arg(&self.password).build()
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        expect_ok(frame)
    }
}
