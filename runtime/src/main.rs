use anyhow::Result;
use chaff_runtime::cli::{self, Cli, Commands};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Output helpers read these, so flags reach every subcommand.
    if cli.json {
        std::env::set_var("CHAFF_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("CHAFF_QUIET", "1");
    }
    if cli.no_color {
        std::env::set_var("CHAFF_NO_COLOR", "1");
    }

    match cli.command {
        Commands::Run(args) => {
            cli::start::init_tracing(cli.log_json, cli.verbose);
            cli::start::run(args).await
        }
        Commands::Personas { plugins } => {
            cli::list_cmd::personas(&cli::start::load_catalog(plugins.as_deref()))
        }
        Commands::Issues { family } => cli::list_cmd::issues(family.as_deref()),
        Commands::Catalog { plugins } => {
            cli::list_cmd::catalog(&cli::start::load_catalog(plugins.as_deref()))
        }
    }
}
