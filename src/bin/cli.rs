//! memctl CLI
//!
//! Command-line interface for memcached nodes and auto-discovery clusters.

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use memctl::{Client, ClientConfig, HashAlgorithm, McError};

/// memctl CLI
#[derive(Parser, Debug)]
#[command(name = "memctl")]
#[command(about = "CLI for memcached and ElastiCache-style clusters")]
#[command(version)]
struct Args {
    /// Server address (host:port); repeatable for multi-node routing
    #[arg(short, long, global = true)]
    server: Vec<String>,

    /// Cluster configuration endpoint (host:port); enables auto-discovery
    #[arg(short, long, global = true, conflicts_with = "server")]
    cluster: Option<String>,

    /// Key-hashing algorithm for node routing
    #[arg(long, global = true, value_enum, default_value = "native")]
    hash: HashArg,

    /// Control-operation timeout in milliseconds (stats, topology, dumps)
    #[arg(long, global = true, default_value = "100")]
    timeout_ms: u64,

    /// Data-operation timeout in milliseconds (get, set, delete)
    #[arg(long, global = true, default_value = "10000")]
    data_timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HashArg {
    Native,
    Crc32,
}

impl From<HashArg> for HashAlgorithm {
    fn from(arg: HashArg) -> Self {
        match arg {
            HashArg::Native => HashAlgorithm::Native,
            HashArg::Crc32 => HashAlgorithm::Crc32,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a cached item
    Get {
        /// The key to fetch
        key: String,
    },

    /// Set an item
    Set {
        /// The key to store under
        key: String,

        /// The value to store
        value: String,

        /// Opaque item flags
        #[arg(long, default_value = "0")]
        flags: u16,

        /// Expiry in seconds (0 = no expiry)
        #[arg(long, default_value = "0")]
        expire: i64,
    },

    /// Delete a cached item
    Del {
        /// The key to delete
        key: String,
    },

    /// Print statistics from every node
    Stats {
        /// Statistics scope
        #[arg(value_enum, default_value = "general")]
        scope: StatsScope,
    },

    /// List cached items across every node
    List,

    /// Print the discovered cluster topology
    Cluster,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StatsScope {
    General,
    Items,
    Slabs,
    Settings,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,memctl=info"));

    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();

    let client = match build_client(&args) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to build client: {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&client, &args.command) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn build_client(args: &Args) -> memctl::Result<Client> {
    let config = ClientConfig::builder()
        .control_timeout_ms(args.timeout_ms)
        .data_timeout_ms(args.data_timeout_ms)
        .hash_algorithm(args.hash.into())
        .build();

    match &args.cluster {
        Some(endpoint) => Client::cluster_with_config(endpoint, config),
        None => {
            if args.server.is_empty() {
                return Err(McError::Config(
                    "at least one --server (or --cluster) is required".to_string(),
                ));
            }
            Client::with_config(&args.server, config)
        }
    }
}

fn run(client: &Client, command: &Commands) -> memctl::Result<()> {
    match command {
        Commands::Get { key } => {
            let item = client.get(key)?;
            println!("{}", String::from_utf8_lossy(&item.value));
        }
        Commands::Set {
            key,
            value,
            flags,
            expire,
        } => {
            client.set(key, value.clone().into_bytes(), *flags, *expire)?;
            println!("OK");
        }
        Commands::Del { key } => {
            client.delete(key)?;
            println!("OK");
        }
        Commands::Stats { scope } => {
            let stats_list = match scope {
                StatsScope::General => client.stats()?,
                StatsScope::Items => client.stats_items()?,
                StatsScope::Slabs => client.stats_slabs()?,
                StatsScope::Settings => client.stats_settings()?,
            };
            for stats in stats_list {
                let mut names: Vec<&String> = stats.keys().collect();
                names.sort();
                for name in names {
                    println!("{} : {}", name, stats[name]);
                }
            }
        }
        Commands::List => {
            for items in client.cluster_dump_items()? {
                for meta in items.values() {
                    println!("{},{},{}", meta.key, meta.size, meta.expire);
                }
            }
        }
        Commands::Cluster => {
            let config = client.cluster_config()?;
            tracing::info!("Cluster topology version {}", config.version);
            for host in config.hosts {
                println!("{}", host);
            }
        }
    }
    Ok(())
}
