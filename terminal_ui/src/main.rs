use std::io;

use clap::Parser;
use tarefas_terminal_ui::{
    api::TarefasClient,
    cli::{Cli, CliCommand},
    logging::{self, LogTarget},
    script, terminal,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = TarefasClient::new(cli.url.clone())?;

    match cli.command.unwrap_or(CliCommand::Ui) {
        CliCommand::Ui => {
            let log_file = cli.log_file.unwrap_or_else(logging::default_log_file);
            logging::init(LogTarget::File(log_file))?;
            terminal::run(client, cli.page_size).await?;
        }
        command => {
            logging::init(cli.log_file.map_or(LogTarget::Stderr, LogTarget::File))?;
            script::run(&client, command, &mut io::stdout().lock()).await?;
        }
    }

    Ok(())
}
