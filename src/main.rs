mod cli;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use lus_core::config::Config;
use lus_drive::{Catalog, DriveClient};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging. Respect RUST_LOG if set, otherwise pick defaults
    // based on the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "luslabeler=trace,lus_server=trace,lus_drive=trace,lus_db=debug,tower_http=debug"
                .to_string()
        } else {
            "luslabeler=debug,lus_server=debug,lus_drive=debug,lus_db=info,tower_http=info"
                .to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let mut config = load_config(cli.config.as_deref());
            config.server.host = host;
            config.server.port = port;

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(lus_server::start(config))?;
            Ok(())
        }
        Commands::CheckDrive => {
            let config = load_config(cli.config.as_deref());
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(check_drive(config))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate(path.as_deref())
        }
        Commands::HashPassword { password } => {
            println!("{}", lus_server::password::hash_password(&password));
            Ok(())
        }
        Commands::Version => {
            println!("luslabeler {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Config {
    let mut config = Config::load_or_default(path);
    config.apply_env();
    config
}

async fn check_drive(config: Config) -> Result<()> {
    let drive = Arc::new(DriveClient::from_config(&config.drive)?);
    let catalog = Catalog::new(drive, config.drive.root_folder_id.clone());

    let patients = catalog.list_patients().await;
    if patients.is_empty() {
        println!("No patient folders found (check credentials, the root folder id, and sharing).");
    } else {
        println!("Found {} patient folder(s):", patients.len());
        for p in &patients {
            println!("  {p}");
        }
    }
    Ok(())
}

fn validate(path: Option<&Path>) -> Result<()> {
    let config = load_config(path);
    let warnings = config.validate();
    if warnings.is_empty() {
        println!("Config OK");
    } else {
        for w in &warnings {
            println!("warning: {w}");
        }
    }
    Ok(())
}
