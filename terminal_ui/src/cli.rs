use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tarefas_shared::{Status, TarefaId};
use url::Url;

use crate::api::DEFAULT_BASE_URL;
use crate::app::PAGE_SIZES;

#[derive(Debug, Parser)]
#[command(name = "tarefas", version, about = "Lists, creates, edits and deletes tarefas on a REST store")]
pub struct Cli {
    /// Collection URL of the remote store
    #[arg(long, env = "TAREFAS_URL", default_value = DEFAULT_BASE_URL)]
    pub url: Url,

    /// Log file (the interactive UI defaults to $TMPDIR/tarefas.log)
    #[arg(long, env = "TAREFAS_LOG")]
    pub log_file: Option<PathBuf>,

    /// Rows per page: 5, 10 or 50
    #[arg(long, default_value_t = PAGE_SIZES[0], value_parser = parse_page_size)]
    pub page_size: usize,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum CliCommand {
    /// Interactive grid (default)
    Ui,
    /// Print every tarefa
    List,
    /// Create a tarefa
    Create {
        #[arg(long)]
        titulo: String,
        #[arg(long, default_value = "")]
        descricao: String,
        #[arg(long, default_value_t = Status::Aberta)]
        status: Status,
    },
    /// Edit a tarefa; omitted fields keep their current value
    Update {
        id: TarefaId,
        #[arg(long)]
        titulo: Option<String>,
        #[arg(long)]
        descricao: Option<String>,
        #[arg(long)]
        status: Option<Status>,
    },
    /// Delete a tarefa
    Delete { id: TarefaId },
}

fn parse_page_size(raw: &str) -> Result<usize, String> {
    let size: usize = raw
        .parse()
        .map_err(|_| format!("`{}` is not a number", raw))?;
    if PAGE_SIZES.contains(&size) {
        Ok(size)
    } else {
        Err(format!("page size must be one of {:?}", PAGE_SIZES))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_point_at_local_store() {
        let cli = Cli::try_parse_from(["tarefas"]).unwrap();
        assert_eq!(cli.url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(cli.page_size, 5);
        assert_eq!(cli.command, None);
    }

    #[test]
    fn create_parses_status() {
        let cli = Cli::try_parse_from([
            "tarefas",
            "create",
            "--titulo",
            "Ler",
            "--status",
            "em_andamento",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(CliCommand::Create {
                titulo: "Ler".into(),
                descricao: String::new(),
                status: Status::EmAndamento,
            })
        );
    }

    #[test]
    fn update_takes_string_or_numeric_ids() {
        let cli = Cli::try_parse_from(["tarefas", "update", "12", "--status", "CONCLUIDA"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(CliCommand::Update { id: TarefaId::Number(12), status: Some(Status::Concluida), .. })
        ));
        let cli = Cli::try_parse_from(["tarefas", "delete", "abc"]).unwrap();
        assert_eq!(
            cli.command,
            Some(CliCommand::Delete {
                id: TarefaId::Text("abc".into())
            })
        );
    }

    #[test]
    fn rejects_unsupported_page_size() {
        assert!(Cli::try_parse_from(["tarefas", "--page-size", "7"]).is_err());
        let cli = Cli::try_parse_from(["tarefas", "--page-size", "50"]).unwrap();
        assert_eq!(cli.page_size, 50);
    }
}
