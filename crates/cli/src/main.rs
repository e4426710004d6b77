use clap::{Parser, Subcommand};
use stubzone_domain::CliOverrides;
use tracing::info;

mod bootstrap;
mod commands;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "stubzone")]
#[command(version = "0.1.0")]
#[command(about = "Stubzone - forwards queries for delegated zones to their own nameservers")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long, global = true)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long, global = true)]
    bind: Option<String>,

    /// Authoritative domain (stub records live under stub.dns.<domain>)
    #[arg(long, global = true)]
    domain: Option<String>,

    /// Database path
    #[arg(long, global = true)]
    database: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the DNS listener and the stub zone refresh job (default)
    Serve,

    /// Register a nameserver for a stub zone
    AddStub {
        /// Zone to delegate, e.g. example.org
        domain: String,
        /// Nameserver IP address
        host: String,
        /// Nameserver port (0 means 53)
        #[arg(long, default_value_t = 0)]
        port: u16,
        /// Label distinguishing nameservers of the same zone
        #[arg(long, default_value = "ns1")]
        name: String,
    },

    /// Remove one nameserver, or the whole stub zone when --name is omitted
    RemoveStub {
        domain: String,
        #[arg(long)]
        name: Option<String>,
    },

    /// Print the stub zone table as currently derived from the backend
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind.clone(),
        domain: cli.domain.clone(),
        database_path: cli.database.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config.logging);

    let pool = bootstrap::init_database(&config.database).await?;
    let services = di::Services::new(&config, pool);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!("Starting Stubzone v{}", env!("CARGO_PKG_VERSION"));
            server::serve(&config, &services).await?;
        }
        Command::AddStub {
            domain,
            host,
            port,
            name,
        } => {
            commands::add_stub(&config, &services, &domain, &host, port, &name).await?;
        }
        Command::RemoveStub { domain, name } => {
            commands::remove_stub(&config, &services, &domain, name.as_deref()).await?;
        }
        Command::List => {
            commands::list_stubs(&services).await?;
        }
    }

    Ok(())
}
