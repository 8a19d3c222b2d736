use std::time::{Duration, SystemTime};

use strum_macros::{Display, EnumString};

/// What `SET` does when the key already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PreviousKeyHandling {
    /// Always write.
    #[default]
    Override,
    /// Only write when the key does not exist yet (`NX`).
    KeepIfExists,
    /// Only write when the key already exists (`XX`).
    OverrideOnly,
}

/// Expiration attached to a `SET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpireOption {
    Seconds(u64),
    Milliseconds(u64),
    AtUnixSecond(u64),
    AtUnixMillisecond(u64),
    /// Retain the TTL already associated with the key.
    KeepTtl,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    pub previous_key_handling: PreviousKeyHandling,
    /// Adds `GET`, making the reply carry the old value.
    pub get_previous_value: bool,
    pub expire: Option<ExpireOption>,
}

impl SetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn if_not_exists(mut self) -> Self {
        self.previous_key_handling = PreviousKeyHandling::KeepIfExists;
        self
    }

    pub fn if_exists(mut self) -> Self {
        self.previous_key_handling = PreviousKeyHandling::OverrideOnly;
        self
    }

    pub fn get(mut self) -> Self {
        self.get_previous_value = true;
        self
    }

    pub fn expire(mut self, expire: ExpireOption) -> Self {
        self.expire = Some(expire);
        self
    }
}

/// Outcome of a `SET`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetResult<T> {
    /// The `NX`/`XX` condition was not met, nothing was written.
    Aborted,
    /// Written.
    Ok,
    /// Written, and the key did not exist before. Only returned when the previous value was
    /// requested.
    NotFound,
    /// Written, the key held this value before.
    PreviousValue(T),
}

impl<T> SetResult<T> {
    /// Whether the value was stored. With `GET` and `NX`/`XX` combined the server does not tell
    /// an abort apart from a missing key, so [`SetResult::NotFound`] counts as written.
    pub fn written(&self) -> bool {
        !matches!(self, SetResult::Aborted)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SetResult<U> {
        match self {
            SetResult::Aborted => SetResult::Aborted,
            SetResult::Ok => SetResult::Ok,
            SetResult::NotFound => SetResult::NotFound,
            SetResult::PreviousValue(value) => SetResult::PreviousValue(f(value)),
        }
    }
}

/// Remaining time to live of a key, from `TTL` or `PTTL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlResult {
    NotFound,
    Never,
    Expires(Duration),
}

/// Absolute expiration of a key, from `EXPIRETIME` or `PEXPIRETIME`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpireTimeResult {
    NotFound,
    Never,
    At(SystemTime),
}

/// Modifier for `FLUSHALL` and `FLUSHDB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum SyncOption {
    Sync,
    Async,
}

/// Argument of `INFO`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum InfoSectionName {
    All,
    Default,
    Everything,
    Server,
    Clients,
    Memory,
    Persistence,
    Stats,
    Replication,
    Cpu,
    CommandStats,
    LatencyStats,
    Sentinel,
    Cluster,
    Modules,
    Keyspace,
    ErrorStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn set_result_written() {
        assert!(!SetResult::<String>::Aborted.written());
        assert!(SetResult::<String>::Ok.written());
        assert!(SetResult::<String>::NotFound.written());
        assert!(SetResult::PreviousValue("old".to_string()).written());
    }

    #[test]
    fn set_result_map() {
        let result = SetResult::PreviousValue("42").map(|v| v.len());

        assert_eq!(result, SetResult::PreviousValue(2));
        assert_eq!(SetResult::<&str>::Ok.map(|v| v.len()), SetResult::Ok);
    }

    #[test]
    fn set_options_builder() {
        let options = SetOptions::new()
            .if_not_exists()
            .get()
            .expire(ExpireOption::Seconds(10));

        assert_eq!(
            options,
            SetOptions {
                previous_key_handling: PreviousKeyHandling::KeepIfExists,
                get_previous_value: true,
                expire: Some(ExpireOption::Seconds(10)),
            }
        );
    }

    #[test]
    fn option_names() {
        assert_eq!(SyncOption::Async.to_string(), "ASYNC");
        assert_eq!(InfoSectionName::CommandStats.to_string(), "commandstats");
        assert_eq!(
            InfoSectionName::from_str("KEYSPACE"),
            Ok(InfoSectionName::Keyspace)
        );
    }
}
