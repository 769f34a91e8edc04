// PoMAIA CLI entry point

use clap::Parser;
use pomaia_cli::{logging, output, Cli, CommandRouter};

#[tokio::main]
async fn main() {
    // .env is optional
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.verbose, cli.quiet) {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }

    if let Err(e) = CommandRouter::execute(&cli).await {
        output::print_error(&e.user_message());
        if cli.verbose {
            eprintln!("{}", e.technical_details());
        }
        std::process::exit(1);
    }
}
