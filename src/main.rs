use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{error, info};
use std::{error::Error, path::PathBuf, sync::Arc};
use typerush::{
    config::{Config, ConfigStore, FileConfigStore},
    server::Server,
    service::GameService,
    word_source::WordCache,
    word_store::read_word_file,
};

/// typing-practice game server
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Serves per-session typing games over line-delimited JSON: players type one word at a time against a shrinking time limit with three lives."
)]
pub struct Cli {
    /// path of the JSON config file
    #[clap(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// word database (sqlite)
    #[clap(short = 'd', long = "db", global = true)]
    database: Option<PathBuf>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// run the game server (default)
    Serve {
        /// address to bind to
        #[clap(short = 'H', long)]
        host: Option<String>,

        /// port to listen on
        #[clap(short, long)]
        port: Option<u16>,
    },
    /// add words from a CSV or one-word-per-line file to the word database
    Import {
        /// file to read; the first column of each line is the word
        file: PathBuf,
    },
    /// print how many words the word database holds
    Count,
}

impl Cli {
    fn load_config(&self) -> Config {
        let store = match self.config {
            Some(ref path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        };
        let mut config = store.load();
        if let Some(ref db) = self.database {
            config.database = Some(db.clone());
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = cli.load_config();

    match cli.command.clone().unwrap_or(Command::Serve {
        host: None,
        port: None,
    }) {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            serve(config).await
        }
        Command::Import { file } => {
            let words = read_word_file(&file)?;
            let added = config.word_store().insert_words(&words)?;
            println!(
                "{} of {} words added to {}",
                added,
                words.len(),
                config.word_store().path().display()
            );
            Ok(())
        }
        Command::Count => {
            let count = config.word_store().count()?;
            println!("{}", count);
            Ok(())
        }
    }
}

async fn serve(config: Config) -> Result<(), Box<dyn Error>> {
    let store = config.word_store();
    let words = tokio::task::spawn_blocking(move || WordCache::new(Box::new(store))).await?;
    info!("{} words available ({})", words.len(), words.origin());

    let service = Arc::new(GameService::new(Arc::new(words), config.rules));
    let server = Server::bind(&config.address(), service, &config.default_session_id).await?;

    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                error!("Server stopped: {}", e);
                return Err(e.into());
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
