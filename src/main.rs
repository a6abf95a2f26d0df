mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use systemd_net::config::{self, parse_mode, Config};

#[derive(Parser)]
#[command(name = "systemd-net")]
#[command(about = "Easily manage systemd services for your .NET applications")]
struct Args {
    /// Directory holding the unit files
    #[arg(short = 's', long, global = true, default_value = config::DEFAULT_SERVICE_DIR)]
    service_dir: PathBuf,

    /// Directory for environment files of new services
    #[arg(short = 'e', long, global = true, default_value = config::DEFAULT_ENV_DIR)]
    env_dir: PathBuf,

    /// Prefix that marks managed services
    #[arg(short = 'p', long, global = true, default_value = config::DEFAULT_PREFIX)]
    prefix: String,

    /// Path to the dotnet CLI
    #[arg(long, global = true, default_value = systemd_net::units::DOTNET_CLI)]
    dotnet: PathBuf,

    /// Permission bits for written files (octal)
    #[arg(long, global = true, default_value = "644", value_parser = parse_mode)]
    mode: u32,

    /// Show debug output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a new service
    Add(commands::AddArgs),

    /// Delete a registered service
    #[command(alias = "delete")]
    Del {
        /// Service name (prefix is added when missing)
        name: String,
        /// Delete even if the service is active
        #[arg(short = 'F', long)]
        force: bool,
        /// Also remove .bak files
        #[arg(long)]
        cleanup: bool,
    },

    /// List registered services
    List,

    /// Change an existing service
    Edit(commands::EditArgs),

    /// Start a service
    Start {
        /// Service name
        name: String,
    },

    /// Stop a service
    Stop {
        /// Service name
        name: String,
    },

    /// List installed .NET runtimes
    Runtimes,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            service_dir: self.service_dir.clone(),
            env_dir: self.env_dir.clone(),
            prefix: self.prefix.clone(),
            dotnet: self.dotnet.clone(),
            mode: self.mode,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = args.config();

    let result = match args.command {
        Command::Add(add) => commands::add(&config, add).await,
        Command::Del {
            name,
            force,
            cleanup,
        } => commands::delete(&config, &name, force, cleanup).await,
        Command::List => commands::list(&config).await,
        Command::Edit(edit) => commands::edit(&config, edit).await,
        Command::Start { name } => commands::start(&config, &name).await,
        Command::Stop { name } => commands::stop(&config, &name).await,
        Command::Runtimes => commands::runtimes(&config).await,
    };

    if let Err(e) = result {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}
