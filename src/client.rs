use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::Mutex;

use crate::commands::{
    bytes_to_string, Append, Auth, BgSave, Command, Decr, DecrBy, Del, Exists, Expire, ExpireTime,
    FlushAll, FlushDb, Get, GetRange, HDel, HExists, HGet, HGetAll, HKeys, HSet, Incr, IncrBy,
    IncrByFloat, Info, PExpire, PExpireTime, Ping, Pttl, Set, Ttl, Whoami,
};
use crate::config::Config;
use crate::connection::Connection;
use crate::info::{self, InfoSection};
use crate::types::{
    ExpireTimeResult, InfoSectionName, SetOptions, SetResult, SyncOption, TtlResult,
};
use crate::Result;

/// A client managing a single connection.
///
/// Clones share the connection. Commands issued concurrently are queued behind an execution lock
/// so that only one request/reply exchange is in flight at any time.
///
/// ```no_run
/// # async fn run() -> redwire::Result<()> {
/// use redwire::{Client, Config};
/// use redwire::types::SetOptions;
///
/// let client = Client::new(Config::default());
/// client.set("greeting", "hello", SetOptions::default()).await?;
/// assert_eq!(client.get("greeting").await?.as_deref(), Some("hello"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    connection: Arc<Mutex<Connection>>,
}

impl Client {
    /// Creates the client without connecting, the first command connects.
    pub fn new(config: Config) -> Client {
        Client {
            connection: Arc::new(Mutex::new(Connection::new(config))),
        }
    }

    /// Waits for any in-flight exchange to finish before answering.
    pub async fn is_connected(&self) -> bool {
        self.connection.lock().await.is_connected()
    }

    pub async fn connect(&self) -> Result<()> {
        self.connection.lock().await.connect().await
    }

    /// Flushes and closes the connection. The next command reconnects.
    pub async fn close(&self) {
        self.connection.lock().await.shutdown().await
    }

    /// Closes the connection without awaiting.
    ///
    /// # Panics
    ///
    /// Panics when called from within an asynchronous execution context while another exchange
    /// holds the connection, in the same way [`Mutex::blocking_lock`] does.
    pub fn close_blocking(&self) {
        match self.connection.try_lock() {
            Ok(mut connection) => connection.close(),
            Err(_) => self.connection.blocking_lock().close(),
        }
    }

    /// Runs any [`Command`] through the connection.
    pub async fn execute<C: Command>(&self, command: C) -> Result<C::Output> {
        self.connection.lock().await.execute(command).await
    }

    // -------------------------------------------------------------------------
    // Server
    // -------------------------------------------------------------------------

    pub async fn ping(&self, message: Option<&str>) -> Result<String> {
        self.execute(Ping {
            message: message.map(str::to_string),
        })
        .await
    }

    /// Authenticates on demand, independently of the configured auto-auth.
    pub async fn auth(&self, username: Option<&str>, password: &str) -> Result<()> {
        self.execute(Auth {
            username: username.map(str::to_string),
            password: password.to_string(),
        })
        .await
    }

    pub async fn whoami(&self) -> Result<String> {
        self.execute(Whoami).await
    }

    /// Typed view of the requested INFO sections.
    pub async fn info(&self, sections: &[InfoSectionName]) -> Result<Vec<InfoSection>> {
        let map = self.info_map(sections).await?;
        Ok(info::parse(map))
    }

    /// INFO as section name to key/value pairs. Lines before the first header are keyed by
    /// `None`.
    pub async fn info_map(
        &self,
        sections: &[InfoSectionName],
    ) -> Result<HashMap<Option<String>, HashMap<String, String>>> {
        let raw = self.info_raw(sections).await?;
        Ok(raw.map(|raw| info::parse_map(&raw)).unwrap_or_default())
    }

    pub async fn info_raw(&self, sections: &[InfoSectionName]) -> Result<Option<String>> {
        self.execute(Info {
            sections: sections.to_vec(),
        })
        .await
    }

    pub async fn flush_all(&self, mode: Option<SyncOption>) -> Result<bool> {
        self.execute(FlushAll { mode }).await
    }

    pub async fn flush_db(&self, mode: Option<SyncOption>) -> Result<bool> {
        self.execute(FlushDb { mode }).await
    }

    pub async fn bgsave(&self, schedule: bool) -> Result<()> {
        self.execute(BgSave { schedule }).await
    }

    // -------------------------------------------------------------------------
    // Values
    // -------------------------------------------------------------------------

    pub async fn get(&self, key: impl Into<String>) -> Result<Option<String>> {
        self.get_binary(key).await?.map(bytes_to_string).transpose()
    }

    pub async fn get_binary(&self, key: impl Into<String>) -> Result<Option<Bytes>> {
        self.execute(Get { key: key.into() }).await
    }

    pub async fn set(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
        options: SetOptions,
    ) -> Result<SetResult<String>> {
        let result = self
            .set_binary(key, Bytes::from(value.into()), options)
            .await?;

        Ok(match result {
            SetResult::Aborted => SetResult::Aborted,
            SetResult::Ok => SetResult::Ok,
            SetResult::NotFound => SetResult::NotFound,
            SetResult::PreviousValue(value) => SetResult::PreviousValue(bytes_to_string(value)?),
        })
    }

    pub async fn set_binary(
        &self,
        key: impl Into<String>,
        value: impl Into<Bytes>,
        options: SetOptions,
    ) -> Result<SetResult<Bytes>> {
        self.execute(Set {
            key: key.into(),
            value: value.into(),
            options,
        })
        .await
    }

    /// Returns the number of removed keys. An empty key list is answered locally.
    pub async fn del<I, K>(&self, keys: I) -> Result<i64>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            return Ok(0);
        }
        self.execute(Del { keys }).await
    }

    /// Returns how many of the keys exist. An empty key list is answered locally.
    pub async fn exists<I, K>(&self, keys: I) -> Result<i64>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            return Ok(0);
        }
        self.execute(Exists { keys }).await
    }

    pub async fn append(&self, key: impl Into<String>, value: impl Into<Bytes>) -> Result<i64> {
        self.execute(Append {
            key: key.into(),
            value: value.into(),
        })
        .await
    }

    pub async fn incr(&self, key: impl Into<String>) -> Result<i64> {
        self.execute(Incr { key: key.into() }).await
    }

    pub async fn incr_by(&self, key: impl Into<String>, increment: i64) -> Result<i64> {
        self.execute(IncrBy {
            key: key.into(),
            increment,
        })
        .await
    }

    pub async fn decr(&self, key: impl Into<String>) -> Result<i64> {
        self.execute(Decr { key: key.into() }).await
    }

    pub async fn decr_by(&self, key: impl Into<String>, decrement: i64) -> Result<i64> {
        self.execute(DecrBy {
            key: key.into(),
            decrement,
        })
        .await
    }

    pub async fn incr_by_float(&self, key: impl Into<String>, increment: f64) -> Result<f64> {
        self.execute(IncrByFloat {
            key: key.into(),
            increment,
        })
        .await
    }

    pub async fn get_range(&self, key: impl Into<String>, start: i64, end: i64) -> Result<String> {
        let bytes = self
            .execute(GetRange {
                key: key.into(),
                start,
                end,
            })
            .await?;
        bytes_to_string(bytes)
    }

    pub async fn ttl(&self, key: impl Into<String>) -> Result<TtlResult> {
        self.execute(Ttl { key: key.into() }).await
    }

    pub async fn pttl(&self, key: impl Into<String>) -> Result<TtlResult> {
        self.execute(Pttl { key: key.into() }).await
    }

    pub async fn expire_time(&self, key: impl Into<String>) -> Result<ExpireTimeResult> {
        self.execute(ExpireTime { key: key.into() }).await
    }

    pub async fn pexpire_time(&self, key: impl Into<String>) -> Result<ExpireTimeResult> {
        self.execute(PExpireTime { key: key.into() }).await
    }

    pub async fn expire(&self, key: impl Into<String>, seconds: u64) -> Result<bool> {
        self.execute(Expire {
            key: key.into(),
            seconds,
        })
        .await
    }

    pub async fn pexpire(&self, key: impl Into<String>, milliseconds: u64) -> Result<bool> {
        self.execute(PExpire {
            key: key.into(),
            milliseconds,
        })
        .await
    }

    // -------------------------------------------------------------------------
    // Hashes
    // -------------------------------------------------------------------------

    pub async fn hset<I, F, V>(&self, key: impl Into<String>, fields: I) -> Result<i64>
    where
        I: IntoIterator<Item = (F, V)>,
        F: Into<String>,
        V: Into<Bytes>,
    {
        let fields = fields
            .into_iter()
            .map(|(field, value)| (field.into(), value.into()))
            .collect();
        self.execute(HSet {
            key: key.into(),
            fields,
        })
        .await
    }

    pub async fn hget(
        &self,
        key: impl Into<String>,
        field: impl Into<String>,
    ) -> Result<Option<String>> {
        self.hget_binary(key, field)
            .await?
            .map(bytes_to_string)
            .transpose()
    }

    pub async fn hget_binary(
        &self,
        key: impl Into<String>,
        field: impl Into<String>,
    ) -> Result<Option<Bytes>> {
        self.execute(HGet {
            key: key.into(),
            field: field.into(),
        })
        .await
    }

    pub async fn hgetall(&self, key: impl Into<String>) -> Result<Option<HashMap<String, Bytes>>> {
        self.execute(HGetAll { key: key.into() }).await
    }

    pub async fn hkeys(&self, key: impl Into<String>) -> Result<Vec<String>> {
        self.execute(HKeys { key: key.into() }).await
    }

    pub async fn hexists(&self, key: impl Into<String>, field: impl Into<String>) -> Result<bool> {
        self.execute(HExists {
            key: key.into(),
            field: field.into(),
        })
        .await
    }

    pub async fn hdel<I, F>(&self, key: impl Into<String>, fields: I) -> Result<i64>
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.execute(HDel {
            key: key.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_key_lists_skip_the_round_trip() {
        // Nothing listens on this port, any exchange would fail to connect.
        let config = Config::builder()
            .endpoint(crate::config::Endpoint::host_port("127.0.0.1", 1))
            .build()
            .unwrap();
        let client = Client::new(config);

        assert_eq!(client.del(Vec::<String>::new()).await.unwrap(), 0);
        assert_eq!(client.exists(Vec::<&str>::new()).await.unwrap(), 0);
        assert!(!client.is_connected().await);
    }

    #[test]
    fn close_blocking_outside_runtime() {
        let client = Client::new(Config::default());

        client.close_blocking();
    }
}
