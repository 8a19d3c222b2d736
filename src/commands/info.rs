use crate::commands::{into_string, Command, RequestBuilder};
use crate::frame::Frame;
use crate::types::InfoSectionName;
use crate::Result;

/// Returns information and statistics about the server as `field:value` lines grouped under
/// `# Section` headers. Without sections the server picks its default set.
///
/// Ref: <https://redis.io/docs/latest/commands/info/>
#[derive(Debug, PartialEq)]
pub struct Info {
    pub sections: Vec<InfoSectionName>,
}

impl Command for Info {
    type Output = Option<String>;

    fn name(&self) -> &'static str {
        "INFO"
    }

    fn to_frame(&self) -> Frame {
        RequestBuilder::new("INFO")
            .args(self.sections.iter().map(|section| section.to_string()))
            .build()
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        match frame {
            Frame::Null => Ok(None),
            frame => into_string(frame).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn with_sections() {
        let cmd = Info {
            sections: vec![InfoSectionName::Server, InfoSectionName::Keyspace],
        };

        assert_eq!(
            cmd.to_frame(),
            Frame::Array(vec![
                Frame::Bulk(Bytes::from("INFO")),
                Frame::Bulk(Bytes::from("server")),
                Frame::Bulk(Bytes::from("keyspace")),
            ])
        );
    }

    #[test]
    fn verbatim_reply() {
        let cmd = Info { sections: vec![] };

        let text = cmd
            .from_frame(Frame::Verbatim {
                format: *b"txt",
                text: "# Server\r\nredis_version:7.2.4\r\n".to_string(),
            })
            .unwrap();

        assert_eq!(text.as_deref(), Some("# Server\r\nredis_version:7.2.4\r\n"));
    }
}
