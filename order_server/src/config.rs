use std::{env, fmt::Display, str::FromStr, time::Duration};

use log::*;

const DEFAULT_ORDERS_HOST: &str = "127.0.0.1";
const DEFAULT_ORDERS_PORT: u16 = 8081;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/orders.db";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_STORAGE_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_HYDRATION_TIMEOUT_MS: u64 = 60_000;
const DEFAULT_NATS_URL: &str = "nats://localhost:4222";
const DEFAULT_STREAM: &str = "ORDERS";
const DEFAULT_SUBJECT: &str = "orders_topic";
const DEFAULT_CONSUMER_GROUP: &str = "orders_consumer";
const DEFAULT_ACK_WAIT_SECS: u64 = 30;
const DEFAULT_MAX_DELIVER: i64 = 5;
const DEFAULT_MAX_ACK_PENDING: i64 = 1_000;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    /// Deadline for a single order read or write.
    pub storage_timeout: Duration,
    /// Deadline for loading the whole database into the cache at startup.
    pub hydration_timeout: Duration,
    pub queue: QueueConfig,
}

/// Where order messages come from.
#[derive(Clone, Debug)]
pub struct QueueConfig {
    pub nats_url: String,
    /// The JetStream stream that stores order messages. It is created if it does not exist.
    pub stream: String,
    pub subject: String,
    /// The durable consumer name. Every server sharing this name shares one read position.
    pub consumer_group: String,
    /// How long the broker waits for an acknowledgement before delivering a message again.
    pub ack_wait: Duration,
    /// How many times a message is delivered before the broker gives up on it. `-1` means no limit.
    pub max_deliver: i64,
    /// How many delivered but unacknowledged messages the consumer may hold before the broker stops delivering.
    pub max_ack_pending: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_ORDERS_HOST.to_string(),
            port: DEFAULT_ORDERS_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            storage_timeout: Duration::from_millis(DEFAULT_STORAGE_TIMEOUT_MS),
            hydration_timeout: Duration::from_millis(DEFAULT_HYDRATION_TIMEOUT_MS),
            queue: QueueConfig::default(),
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            nats_url: DEFAULT_NATS_URL.to_string(),
            stream: DEFAULT_STREAM.to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
            consumer_group: DEFAULT_CONSUMER_GROUP.to_string(),
            ack_wait: Duration::from_secs(DEFAULT_ACK_WAIT_SECS),
            max_deliver: DEFAULT_MAX_DELIVER,
            max_ack_pending: DEFAULT_MAX_ACK_PENDING,
        }
    }
}

impl ServerConfig {
    pub fn from_env_or_default() -> Self {
        let host = env::var("ORDERS_HOST").ok().unwrap_or_else(|| DEFAULT_ORDERS_HOST.into());
        let port = parse_env("ORDERS_PORT", DEFAULT_ORDERS_PORT);
        let database_url = env::var("ORDERS_DATABASE_URL").ok().unwrap_or_else(|| {
            info!("🪛️ ORDERS_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.into()
        });
        let db_max_connections = parse_env("ORDERS_DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS);
        let storage_timeout =
            Duration::from_millis(parse_env("ORDERS_STORAGE_TIMEOUT_MS", DEFAULT_STORAGE_TIMEOUT_MS));
        let hydration_timeout =
            Duration::from_millis(parse_env("ORDERS_HYDRATION_TIMEOUT_MS", DEFAULT_HYDRATION_TIMEOUT_MS));
        let queue = QueueConfig::from_env_or_default();
        Self { host, port, database_url, db_max_connections, storage_timeout, hydration_timeout, queue }
    }
}

impl QueueConfig {
    pub fn from_env_or_default() -> Self {
        let nats_url = env::var("ORDERS_NATS_URL").ok().unwrap_or_else(|| DEFAULT_NATS_URL.into());
        let stream = env::var("ORDERS_STREAM").ok().unwrap_or_else(|| DEFAULT_STREAM.into());
        let subject = env::var("ORDERS_SUBJECT").ok().unwrap_or_else(|| DEFAULT_SUBJECT.into());
        let consumer_group = env::var("ORDERS_CONSUMER_GROUP").ok().unwrap_or_else(|| DEFAULT_CONSUMER_GROUP.into());
        let ack_wait = Duration::from_secs(parse_env("ORDERS_ACK_WAIT_SECS", DEFAULT_ACK_WAIT_SECS));
        let max_deliver = parse_env("ORDERS_MAX_DELIVER", DEFAULT_MAX_DELIVER);
        let max_ack_pending = parse_env("ORDERS_MAX_ACK_PENDING", DEFAULT_MAX_ACK_PENDING);
        Self { nats_url, stream, subject, consumer_group, ack_wait, max_deliver, max_ack_pending }
    }
}

/// Reads and parses `name` from the environment. Missing or invalid values fall back to `default`.
fn parse_env<T>(name: &str, default: T) -> T
where
    T: FromStr + Display + Copy,
    T::Err: Display,
{
    env::var(name)
        .map(|s| {
            s.parse::<T>().unwrap_or_else(|e| {
                error!("🪛️ {s} is not a valid value for {name}. {e} Using the default, {default}, instead.");
                default
            })
        })
        .unwrap_or(default)
}
