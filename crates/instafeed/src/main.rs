use crate::prelude::*;
use clap::Parser;

mod error;
mod feed;
mod prelude;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Render Instagram media feeds into HTML using {{path}} templates"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "INSTAFEED_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Fetch recent media from the API and render it
    Fetch(crate::feed::fetch::FetchOptions),

    /// Render a response previously saved to disk (or read from stdin)
    Render(crate::feed::render::RenderOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Fetch(options) => crate::feed::fetch::run(options, app.global).await,
        SubCommands::Render(options) => crate::feed::render::run(options, app.global),
    }
}
