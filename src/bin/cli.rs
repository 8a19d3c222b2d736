use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::debug;

use redwire::config::DEFAULT_PORT;
use redwire::types::{ExpireOption, InfoSectionName, SetOptions, SetResult, TtlResult};
use redwire::{Client, Config, Endpoint, Error};

#[derive(Parser, Debug)]
#[command(name = "redwire-cli", about = "Talk to a Redis server over RESP")]
struct Args {
    /// Server host
    #[arg(long, env = "REDWIRE_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short, long, env = "REDWIRE_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Unix socket path, takes precedence over host and port
    #[arg(short, long, env = "REDWIRE_SOCKET")]
    socket: Option<PathBuf>,

    /// ACL username sent along with the password
    #[arg(long, env = "REDWIRE_USERNAME", requires = "password")]
    username: Option<String>,

    /// Password for auto-auth
    #[arg(long, env = "REDWIRE_PASSWORD")]
    password: Option<String>,

    #[arg(long, default_value_t = 5000)]
    connect_timeout_ms: u64,

    #[arg(long)]
    read_timeout_ms: Option<u64>,

    /// Enable TCP keep-alive
    #[arg(long)]
    keep_alive: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ping the server
    Ping {
        message: Option<String>,
    },

    /// Get a value by key
    Get {
        key: String,
    },

    /// Set a key-value pair
    Set {
        key: String,
        value: String,

        /// Only set the key if it does not exist
        #[arg(long, conflicts_with = "xx")]
        nx: bool,

        /// Only set the key if it already exists
        #[arg(long)]
        xx: bool,

        /// Print the previous value
        #[arg(long)]
        get: bool,

        /// Expire after this many seconds
        #[arg(long, conflicts_with = "px")]
        ex: Option<u64>,

        /// Expire after this many milliseconds
        #[arg(long)]
        px: Option<u64>,
    },

    /// Delete keys
    Del {
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Increment a counter
    Incr {
        key: String,
    },

    /// Remaining time to live of a key
    Ttl {
        key: String,
    },

    /// Server information, optionally restricted to sections
    Info {
        sections: Vec<InfoSectionName>,
    },

    /// The authenticated user
    Whoami,
}

impl Args {
    fn config(&self) -> Result<Config, Error> {
        let endpoint = match &self.socket {
            Some(path) => Endpoint::unix(path),
            None => Endpoint::host_port(&self.host, self.port),
        };

        let mut builder = Config::builder()
            .endpoint(endpoint)
            .connect_timeout(Duration::from_millis(self.connect_timeout_ms))
            .read_timeout(self.read_timeout_ms.map(Duration::from_millis))
            .keep_alive(self.keep_alive);

        if let Some(password) = &self.password {
            builder = builder.auto_auth(self.username.clone(), password);
        }

        builder.build()
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| eprintln!("Failed to initialize global tracing: {}", e));

    let args = Args::parse();
    let client = Client::new(args.config()?);
    debug!(command = ?args.command, "running command");

    match args.command {
        Commands::Ping { message } => println!("{}", client.ping(message.as_deref()).await?),
        Commands::Get { key } => match client.get(key).await? {
            Some(value) => println!("{}", value),
            None => println!("(nil)"),
        },
        Commands::Set {
            key,
            value,
            nx,
            xx,
            get,
            ex,
            px,
        } => {
            let mut options = SetOptions::new();
            if nx {
                options = options.if_not_exists();
            }
            if xx {
                options = options.if_exists();
            }
            if get {
                options = options.get();
            }
            if let Some(seconds) = ex {
                options = options.expire(ExpireOption::Seconds(seconds));
            }
            if let Some(milliseconds) = px {
                options = options.expire(ExpireOption::Milliseconds(milliseconds));
            }

            match client.set(key, value, options).await? {
                SetResult::Ok => println!("OK"),
                SetResult::Aborted | SetResult::NotFound => println!("(nil)"),
                SetResult::PreviousValue(previous) => println!("{}", previous),
            }
        }
        Commands::Del { keys } => println!("(integer) {}", client.del(keys).await?),
        Commands::Incr { key } => println!("(integer) {}", client.incr(key).await?),
        Commands::Ttl { key } => match client.ttl(key).await? {
            TtlResult::NotFound => println!("(integer) -2"),
            TtlResult::Never => println!("(integer) -1"),
            TtlResult::Expires(ttl) => println!("(integer) {}", ttl.as_secs()),
        },
        Commands::Info { sections } => {
            if let Some(info) = client.info_raw(&sections).await? {
                print!("{}", info);
            }
        }
        Commands::Whoami => println!("{}", client.whoami().await?),
    }

    client.close().await;
    Ok(())
}
