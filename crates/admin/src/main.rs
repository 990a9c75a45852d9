use std::path::PathBuf;

use catalog::{
    Catalog,
    session::{FileTokenStore, Session},
};
use catalog_admin::{
    command::{self, Reply},
    config,
    console::Terminal,
    shell::Shell,
};
use clap::Parser;

/// Terminal admin for the music catalog API.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Extra config file, merged over the defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep the session in memory only
    #[arg(long)]
    ephemeral: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or("catalog=info,catalog_admin=info".into()),
        )
        // stdout is for the rendered pages
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = config::load(args.config.as_deref())?;

    let session = if args.ephemeral {
        Session::ephemeral()
    } else {
        let path = config.session.token_path()?;
        tracing::debug!(path = %path.display(), "using token file");
        Session::open(FileTokenStore::new(path))
    };

    let catalog = Catalog::new(&config.api.base_url, config.api.credentials(), session)?;
    tracing::info!(base_url = %catalog.base_url(), "starting");

    let mut shell = Shell::open(catalog).await;
    let mut terminal = Terminal::new();
    terminal.print(&shell.render()).await;

    while let Some(line) = terminal.read_line("> ").await {
        if line.trim().is_empty() {
            continue;
        }

        let reply = match command::parse(&line) {
            Ok(command) => command::execute(&mut shell, &mut terminal, command).await,
            Err(e) => Err(e),
        };

        match reply {
            Ok(Reply::Render) => terminal.print(&shell.render()).await,
            Ok(Reply::Text(text)) => terminal.print(&text).await,
            Ok(Reply::Quit) => break,
            Err(e) => terminal.print(&format!("{e}\n")).await,
        }
    }

    Ok(())
}
