//! Non-interactive commands.

use std::io::Write;

use tarefas_shared::{TarefaDraft, TarefaRow};

use crate::api::TarefasClient;
use crate::cli::CliCommand;
use crate::error::{Error, Result};
use crate::executor;
use crate::sync::{Outcome, Request, SyncState};

const HEADERS: [&str; 6] = [
    "ID",
    "TITULO",
    "DESCRICAO",
    "DATA CRIACAO",
    "DATA CONCLUSAO",
    "STATUS",
];

/// Runs one command and prints the resynchronized table to `out`.
pub async fn run<W: Write>(client: &TarefasClient, command: CliCommand, out: &mut W) -> Result<()> {
    let mut sync = SyncState::new();

    let request = match command {
        CliCommand::Ui | CliCommand::List => sync.list(),
        CliCommand::Create {
            titulo,
            descricao,
            status,
        } => sync.create(TarefaDraft::new(titulo, descricao, status)),
        CliCommand::Update {
            id,
            titulo,
            descricao,
            status,
        } => {
            let listing = sync.list();
            settle(&mut sync, client, listing).await?;
            let current = sync
                .find(&id)
                .ok_or_else(|| Error::UnknownTarefa(id.to_string()))?;
            let mut draft = TarefaDraft::from(&current.tarefa);
            if let Some(titulo) = titulo {
                draft.titulo = titulo;
            }
            if let Some(descricao) = descricao {
                draft.descricao = descricao;
            }
            if let Some(status) = status {
                draft.status = status;
            }
            sync.update(id, draft)
        }
        CliCommand::Delete { id } => sync.delete(id),
    };

    settle(&mut sync, client, request).await?;
    write_table(sync.rows(), out)?;
    Ok(())
}

/// Drives `request` with its follow-ups, failing on the first failed step.
async fn settle(sync: &mut SyncState, client: &TarefasClient, request: Request) -> Result<()> {
    for transition in executor::drive(sync, client, request).await {
        if let Outcome::Failed { error, .. } = transition.outcome {
            return Err(error.into());
        }
    }
    Ok(())
}

pub fn write_table<W: Write>(rows: &[TarefaRow], out: &mut W) -> std::io::Result<()> {
    let cells: Vec<[String; 6]> = rows.iter().map(TarefaRow::cells).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = HEADERS.map(String::from);
    for line in std::iter::once(&header).chain(cells.iter()) {
        let padded: Vec<String> = line
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        writeln!(out, "{}", padded.join("  ").trim_end())?;
    }
    Ok(())
}
