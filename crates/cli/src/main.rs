use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "handover")]
#[command(about = "Handover — LINE knowledge-base webhook bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Run the webhook server: verifies platform signatures and answers each text
    /// message from the knowledge document through the generation model.
    Serve {
        /// Config file path (default: HANDOVER_CONFIG_PATH or ~/.handover/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// HTTP listen port (default from config or 8080; PORT env also recognized)
        #[arg(long, short)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("handover {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Serve { config, port }) => {
            if let Err(e) = run_serve(config, port).await {
                log::error!("serve failed: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

async fn run_serve(
    config_path: Option<std::path::PathBuf>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let (mut config, _path) = lib::config::load_config(config_path)?;
    if let Some(p) = port {
        config.server.port = p;
    }
    log::info!(
        "starting webhook server on {}:{}",
        config.server.bind,
        config.server.port
    );
    lib::gateway::run_server(config).await
}
