//! Parsing of the text returned by `INFO`.
//!
//! The reply is a list of `key:value` lines grouped under `# Section` headers. [`parse_map`]
//! keeps everything as strings, [`parse`] turns the well known sections into typed values.

use std::collections::HashMap;
use std::str::FromStr;

use strum_macros::{Display, EnumString};

const SECTION_START: char = '#';
const VALUE_DELIMITER: char = ':';

/// Groups the `key:value` lines by section. Section names are lower-cased, lines that appear
/// before any header are stored under `None`. Lines without a delimiter, with an empty key or
/// with an empty value are skipped.
pub fn parse_map(text: &str) -> HashMap<Option<String>, HashMap<String, String>> {
    let mut result: HashMap<Option<String>, HashMap<String, String>> = HashMap::new();
    let mut section: Option<String> = None;

    for line in text.split('\n').map(str::trim).filter(|line| !line.is_empty()) {
        if let Some(name) = line.strip_prefix(SECTION_START) {
            let name = name.trim().to_lowercase();
            section = (!name.is_empty()).then_some(name);
            result.entry(section.clone()).or_default();
            continue;
        }

        let Some((key, value)) = line.split_once(VALUE_DELIMITER) else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            continue;
        }

        result
            .entry(section.clone())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    result
}

/// Builds typed sections out of [`parse_map`] output. Unnamed and empty sections are dropped,
/// sections without a dedicated type end up as [`InfoSection::Other`]. The result is ordered by
/// section name.
pub fn parse(map: HashMap<Option<String>, HashMap<String, String>>) -> Vec<InfoSection> {
    let mut sections: Vec<InfoSection> = map
        .into_iter()
        .filter_map(|(name, values)| {
            let name = name?;
            if values.is_empty() {
                return None;
            }
            Some(InfoSection::from_values(name, values))
        })
        .collect();

    sections.sort_by(|a, b| a.name().cmp(b.name()));
    sections
}

#[derive(Debug, Clone, PartialEq)]
pub enum InfoSection {
    Server(ServerInfo),
    Clients(ClientsInfo),
    Memory(MemoryInfo),
    Persistence(PersistenceInfo),
    Stats(StatsInfo),
    Replication(ReplicationInfo),
    Cpu(CpuInfo),
    Keyspace(KeyspaceInfo),
    Other {
        name: String,
        values: HashMap<String, String>,
    },
}

impl InfoSection {
    fn from_values(name: String, values: HashMap<String, String>) -> InfoSection {
        let v = Values(&values);
        match name.as_str() {
            "server" => InfoSection::Server(ServerInfo::from_values(&v)),
            "clients" => InfoSection::Clients(ClientsInfo::from_values(&v)),
            "memory" => InfoSection::Memory(MemoryInfo::from_values(&v)),
            "persistence" => InfoSection::Persistence(PersistenceInfo::from_values(&v)),
            "stats" => InfoSection::Stats(StatsInfo::from_values(&v)),
            "replication" => InfoSection::Replication(ReplicationInfo::from_values(&v)),
            "cpu" => InfoSection::Cpu(CpuInfo::from_values(&v)),
            "keyspace" => InfoSection::Keyspace(KeyspaceInfo::from_values(&values)),
            _ => InfoSection::Other { name, values },
        }
    }

    /// Lower-cased section name as it appears in the header.
    pub fn name(&self) -> &str {
        match self {
            InfoSection::Server(_) => "server",
            InfoSection::Clients(_) => "clients",
            InfoSection::Memory(_) => "memory",
            InfoSection::Persistence(_) => "persistence",
            InfoSection::Stats(_) => "stats",
            InfoSection::Replication(_) => "replication",
            InfoSection::Cpu(_) => "cpu",
            InfoSection::Keyspace(_) => "keyspace",
            InfoSection::Other { name, .. } => name,
        }
    }
}

struct Values<'a>(&'a HashMap<String, String>);

impl Values<'_> {
    fn string(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    /// Values that fail to parse are treated as absent.
    fn parse<T: FromStr>(&self, key: &str) -> Option<T> {
        self.0.get(key).and_then(|value| value.parse().ok())
    }

    fn flag(&self, key: &str) -> Option<bool> {
        match self.0.get(key).map(String::as_str) {
            Some("0") => Some(false),
            Some("1") => Some(true),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum RedisMode {
    Standalone,
    Sentinel,
    Cluster,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServerInfo {
    pub redis_version: Option<String>,
    pub redis_git_sha1: Option<String>,
    pub redis_build_id: Option<String>,
    pub redis_mode: Option<RedisMode>,
    pub os: Option<String>,
    pub arch_bits: Option<u32>,
    pub multiplexing_api: Option<String>,
    pub gcc_version: Option<String>,
    pub process_id: Option<u32>,
    pub run_id: Option<String>,
    pub tcp_port: Option<u16>,
    pub server_time_usec: Option<u64>,
    pub uptime_in_seconds: Option<u64>,
    pub uptime_in_days: Option<u64>,
    pub hz: Option<u32>,
    pub configured_hz: Option<u32>,
    pub executable: Option<String>,
    pub config_file: Option<String>,
}

impl ServerInfo {
    fn from_values(v: &Values) -> Self {
        Self {
            redis_version: v.string("redis_version"),
            redis_git_sha1: v.string("redis_git_sha1"),
            redis_build_id: v.string("redis_build_id"),
            redis_mode: v.parse("redis_mode"),
            os: v.string("os"),
            arch_bits: v.parse("arch_bits"),
            multiplexing_api: v.string("multiplexing_api"),
            gcc_version: v.string("gcc_version"),
            process_id: v.parse("process_id"),
            run_id: v.string("run_id"),
            tcp_port: v.parse("tcp_port"),
            server_time_usec: v.parse("server_time_usec"),
            uptime_in_seconds: v.parse("uptime_in_seconds"),
            uptime_in_days: v.parse("uptime_in_days"),
            hz: v.parse("hz"),
            configured_hz: v.parse("configured_hz"),
            executable: v.string("executable"),
            config_file: v.string("config_file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClientsInfo {
    pub connected_clients: Option<u64>,
    pub cluster_connections: Option<u64>,
    pub maxclients: Option<u64>,
    pub blocked_clients: Option<u64>,
    pub tracking_clients: Option<u64>,
    pub pubsub_clients: Option<u64>,
    pub clients_in_timeout_table: Option<u64>,
}

impl ClientsInfo {
    fn from_values(v: &Values) -> Self {
        Self {
            connected_clients: v.parse("connected_clients"),
            cluster_connections: v.parse("cluster_connections"),
            maxclients: v.parse("maxclients"),
            blocked_clients: v.parse("blocked_clients"),
            tracking_clients: v.parse("tracking_clients"),
            pubsub_clients: v.parse("pubsub_clients"),
            clients_in_timeout_table: v.parse("clients_in_timeout_table"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemoryInfo {
    pub used_memory: Option<u64>,
    pub used_memory_human: Option<String>,
    pub used_memory_rss: Option<u64>,
    pub used_memory_peak: Option<u64>,
    pub used_memory_peak_human: Option<String>,
    pub total_system_memory: Option<u64>,
    pub maxmemory: Option<u64>,
    pub maxmemory_human: Option<String>,
    pub maxmemory_policy: Option<String>,
    pub mem_fragmentation_ratio: Option<f64>,
}

impl MemoryInfo {
    fn from_values(v: &Values) -> Self {
        Self {
            used_memory: v.parse("used_memory"),
            used_memory_human: v.string("used_memory_human"),
            used_memory_rss: v.parse("used_memory_rss"),
            used_memory_peak: v.parse("used_memory_peak"),
            used_memory_peak_human: v.string("used_memory_peak_human"),
            total_system_memory: v.parse("total_system_memory"),
            maxmemory: v.parse("maxmemory"),
            maxmemory_human: v.string("maxmemory_human"),
            maxmemory_policy: v.string("maxmemory_policy"),
            mem_fragmentation_ratio: v.parse("mem_fragmentation_ratio"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PersistenceInfo {
    pub loading: Option<bool>,
    pub rdb_changes_since_last_save: Option<u64>,
    pub rdb_bgsave_in_progress: Option<bool>,
    pub rdb_last_save_time: Option<u64>,
    pub rdb_last_bgsave_status: Option<String>,
    pub aof_enabled: Option<bool>,
    pub aof_rewrite_in_progress: Option<bool>,
    pub aof_last_write_status: Option<String>,
}

impl PersistenceInfo {
    fn from_values(v: &Values) -> Self {
        Self {
            loading: v.flag("loading"),
            rdb_changes_since_last_save: v.parse("rdb_changes_since_last_save"),
            rdb_bgsave_in_progress: v.flag("rdb_bgsave_in_progress"),
            rdb_last_save_time: v.parse("rdb_last_save_time"),
            rdb_last_bgsave_status: v.string("rdb_last_bgsave_status"),
            aof_enabled: v.flag("aof_enabled"),
            aof_rewrite_in_progress: v.flag("aof_rewrite_in_progress"),
            aof_last_write_status: v.string("aof_last_write_status"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatsInfo {
    pub total_connections_received: Option<u64>,
    pub total_commands_processed: Option<u64>,
    pub instantaneous_ops_per_sec: Option<u64>,
    pub rejected_connections: Option<u64>,
    pub expired_keys: Option<u64>,
    pub evicted_keys: Option<u64>,
    pub keyspace_hits: Option<u64>,
    pub keyspace_misses: Option<u64>,
}

impl StatsInfo {
    fn from_values(v: &Values) -> Self {
        Self {
            total_connections_received: v.parse("total_connections_received"),
            total_commands_processed: v.parse("total_commands_processed"),
            instantaneous_ops_per_sec: v.parse("instantaneous_ops_per_sec"),
            rejected_connections: v.parse("rejected_connections"),
            expired_keys: v.parse("expired_keys"),
            evicted_keys: v.parse("evicted_keys"),
            keyspace_hits: v.parse("keyspace_hits"),
            keyspace_misses: v.parse("keyspace_misses"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ReplicationRole {
    Master,
    Slave,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReplicationInfo {
    pub role: Option<ReplicationRole>,
    pub connected_slaves: Option<u64>,
    pub master_replid: Option<String>,
    pub master_repl_offset: Option<u64>,
}

impl ReplicationInfo {
    fn from_values(v: &Values) -> Self {
        Self {
            role: v.parse("role"),
            connected_slaves: v.parse("connected_slaves"),
            master_replid: v.string("master_replid"),
            master_repl_offset: v.parse("master_repl_offset"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CpuInfo {
    pub used_cpu_sys: Option<f64>,
    pub used_cpu_user: Option<f64>,
    pub used_cpu_sys_children: Option<f64>,
    pub used_cpu_user_children: Option<f64>,
}

impl CpuInfo {
    fn from_values(v: &Values) -> Self {
        Self {
            used_cpu_sys: v.parse("used_cpu_sys"),
            used_cpu_user: v.parse("used_cpu_user"),
            used_cpu_sys_children: v.parse("used_cpu_sys_children"),
            used_cpu_user_children: v.parse("used_cpu_user_children"),
        }
    }
}

/// Statistics of one logical database, from a `db0:keys=1,expires=0,avg_ttl=0` line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyspaceDatabase {
    pub index: u32,
    pub keys: Option<u64>,
    pub expires: Option<u64>,
    pub avg_ttl: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyspaceInfo {
    /// Ordered by database index.
    pub databases: Vec<KeyspaceDatabase>,
}

impl KeyspaceInfo {
    fn from_values(values: &HashMap<String, String>) -> Self {
        let mut databases: Vec<KeyspaceDatabase> = values
            .iter()
            .filter_map(|(key, value)| {
                let index = key.strip_prefix("db")?.parse().ok()?;
                let fields: HashMap<&str, &str> = value
                    .split(',')
                    .filter_map(|field| field.split_once('='))
                    .collect();
                let number = |name: &str| fields.get(name).and_then(|v| v.parse().ok());

                Some(KeyspaceDatabase {
                    index,
                    keys: number("keys"),
                    expires: number("expires"),
                    avg_ttl: number("avg_ttl"),
                })
            })
            .collect();

        databases.sort_by_key(|db| db.index);
        Self { databases }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INFO: &str = "\r
# Server\r
redis_version:7.2.4\r
redis_mode:standalone\r
os:Linux 5.15.0-1015-aws x86_64\r
arch_bits:64\r
process_id:1\r
uptime_in_seconds:1030110\r
tcp_port:6379\r
\r
# Clients\r
connected_clients:1\r
maxclients:10000\r
\r
# Memory\r
used_memory:68824640\r
used_memory_human:65.64M\r
used_memory_peak:68848456\r
maxmemory:4294967296\r
maxmemory_human:4.00G\r
mem_fragmentation_ratio:1.25\r
\r
# Persistence\r
loading:0\r
rdb_changes_since_last_save:1050288\r
aof_enabled:0\r
\r
# Stats\r
total_connections_received:21\r
total_commands_processed:1308336\r
instantaneous_ops_per_sec:0\r
\r
# Replication\r
role:master\r
connected_slaves:0\r
\r
# CPU\r
used_cpu_sys:850.545934\r
used_cpu_user:1777.532734\r
\r
# Errorstats\r
errorstat_ERR:count:1189\r
\r
# Cluster\r
\r
# Keyspace\r
db1:keys=3,expires=0,avg_ttl=0\r
db0:keys=397255,expires=845,avg_ttl=1527956522210785\r
";

    #[test]
    fn parse_map_groups_by_section() {
        let map = parse_map(INFO);

        let server = &map[&Some("server".to_string())];
        assert_eq!(server["redis_version"], "7.2.4");
        assert_eq!(server["os"], "Linux 5.15.0-1015-aws x86_64");

        // Only the first delimiter splits.
        let errorstats = &map[&Some("errorstats".to_string())];
        assert_eq!(errorstats["errorstat_ERR"], "count:1189");

        assert!(map[&Some("cluster".to_string())].is_empty());
        assert!(!map.contains_key(&None));
    }

    #[test]
    fn parse_map_edge_cases() {
        let map = parse_map("orphan:1\n#\nempty:\n:novalue\nnodelimiter\n  spaced : value  \n");

        let unnamed = &map[&None];
        assert_eq!(unnamed.len(), 2);
        assert_eq!(unnamed["orphan"], "1");
        assert_eq!(unnamed["spaced"], "value");
    }

    #[test]
    fn parse_typed_sections() {
        let sections = parse(parse_map(INFO));

        let names: Vec<&str> = sections.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec![
                "clients",
                "cpu",
                "errorstats",
                "keyspace",
                "memory",
                "persistence",
                "replication",
                "server",
                "stats"
            ]
        );

        for section in &sections {
            match section {
                InfoSection::Server(server) => {
                    assert_eq!(server.redis_version.as_deref(), Some("7.2.4"));
                    assert_eq!(server.redis_mode, Some(RedisMode::Standalone));
                    assert_eq!(server.tcp_port, Some(6379));
                    assert_eq!(server.gcc_version, None);
                }
                InfoSection::Memory(memory) => {
                    assert_eq!(memory.used_memory, Some(68824640));
                    assert_eq!(memory.mem_fragmentation_ratio, Some(1.25));
                }
                InfoSection::Persistence(persistence) => {
                    assert_eq!(persistence.loading, Some(false));
                    assert_eq!(persistence.aof_enabled, Some(false));
                }
                InfoSection::Replication(replication) => {
                    assert_eq!(replication.role, Some(ReplicationRole::Master));
                }
                InfoSection::Keyspace(keyspace) => {
                    assert_eq!(
                        keyspace.databases,
                        vec![
                            KeyspaceDatabase {
                                index: 0,
                                keys: Some(397255),
                                expires: Some(845),
                                avg_ttl: Some(1527956522210785),
                            },
                            KeyspaceDatabase {
                                index: 1,
                                keys: Some(3),
                                expires: Some(0),
                                avg_ttl: Some(0),
                            },
                        ]
                    );
                }
                InfoSection::Other { name, values } => {
                    assert_eq!(name, "errorstats");
                    assert_eq!(values.len(), 1);
                }
                _ => {}
            }
        }
    }

    #[test]
    fn unparseable_values_are_absent() {
        let sections = parse(parse_map("# Clients\nconnected_clients:many\nmaxclients:10\n"));

        assert_eq!(
            sections,
            vec![InfoSection::Clients(ClientsInfo {
                maxclients: Some(10),
                ..Default::default()
            })]
        );
    }
}
