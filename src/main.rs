use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use clusterdash::api::ApiClient;
use clusterdash::model::InvocationId;
use clusterdash::tui;

#[derive(Parser)]
#[command(name = "clusterdash")]
#[command(about = "Dashboard for a build/test cluster", long_about = None)]
struct Cli {
    /// Address of the cluster server
    #[arg(short, long, default_value = "localhost")]
    server: String,

    /// Port of the cluster server
    #[arg(short, long, default_value_t = 8000)]
    port: u16,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive dashboard (the default)
    Watch,

    /// Show the currently running invocation
    Current {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// List the invocation history
    Invocations {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// List connected hosts
    Hosts {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the full detail of an invocation
    Show {
        id: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Clone a repository and start a new invocation
    Invoke { url: String },

    /// Re-run the descriptor of an existing invocation
    Reinvoke { id: String },

    /// Stop the active invocation
    Cancel,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let api = ApiClient::new(&cli.server, cli.port)?;

    match cli.command.unwrap_or(Commands::Watch) {
        Commands::Watch => tui::run(api),

        Commands::Current { json } => {
            let current = api.current().context("fetch current invocation")?;
            match (json, current) {
                (true, current) => println!("{}", serde_json::to_string_pretty(&current)?),
                (false, Some(id)) => println!("{}", id),
                (false, None) => println!("no active invocation"),
            }
            Ok(())
        }

        Commands::Invocations { json } => {
            let invocations = api.invocations().context("fetch invocations")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&invocations)?);
                return Ok(());
            }
            for inv in invocations {
                println!(
                    "{}  {}  {}  {}",
                    inv.id,
                    inv.name.as_deref().unwrap_or("(failed)"),
                    inv.commit.chars().take(10).collect::<String>(),
                    inv.start,
                );
            }
            Ok(())
        }

        Commands::Hosts { json } => {
            let hosts = api.hosts().context("fetch hosts")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&hosts)?);
                return Ok(());
            }
            for host in hosts {
                match &host.state.id {
                    Some(id) => println!("{}  {}  {}", host.hostname, host.state.desc, id),
                    None => println!("{}  {}", host.hostname, host.state.desc),
                }
            }
            Ok(())
        }

        Commands::Show { id, json } => {
            let detail = api
                .invocation(&InvocationId(id))
                .context("fetch invocation detail")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&detail)?);
                return Ok(());
            }
            println!("{}  {}", detail.descriptor.name, detail.id);
            println!("{} @ {}", detail.url, detail.commit);
            println!("started {}", detail.start);
            for hostname in detail.descriptor.hosts.keys() {
                match detail.logs.get(hostname) {
                    Some(url) => println!("{}  logs: {}", hostname, url),
                    None => println!("{}", hostname),
                }
            }
            Ok(())
        }

        Commands::Invoke { url } => {
            let detail = api.invoke(&url).context("invoke")?;
            println!("invoked {} as {}", url, detail.id);
            Ok(())
        }

        Commands::Reinvoke { id } => {
            let detail = api.reinvoke(&InvocationId(id)).context("reinvoke")?;
            println!("reinvoked as {}", detail.id);
            Ok(())
        }

        Commands::Cancel => {
            api.cancel().context("cancel")?;
            println!("cancelled the active invocation");
            Ok(())
        }
    }
}
