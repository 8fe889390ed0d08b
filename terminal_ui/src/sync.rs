//! Local projection of the remote tarefa collection.
//!
//! Every operation is a pure step: issuing one returns a [`Request`] for the
//! caller to execute, and feeding the matching [`Response`] back through
//! [`SyncState::apply`] yields the next state plus an optional follow-up
//! request. Mutations never touch the projection directly. A successful
//! create, update or delete asks for a full re-fetch instead, so the projection
//! only ever shows state the store has confirmed.
//!
//! Requests carry a [`Ticket`]. [`SyncState::detach`] starts a new generation,
//! and responses to tickets from an older generation are reported as
//! [`Outcome::Stale`] without touching anything.
//!
//! Re-fetches are not sequenced against each other: whichever list response
//! arrives last defines the projection.

use std::collections::HashSet;
use std::fmt;

use tarefas_shared::{Tarefa, TarefaDraft, TarefaId, TarefaRow};

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    generation: u64,
    seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Infinitive used in notifications ("Falha ao ...").
    pub fn describe(&self) -> &'static str {
        match self {
            Operation::List => "listar tarefas",
            Operation::Create => "criar tarefa",
            Operation::Update => "atualizar tarefa",
            Operation::Delete => "excluir tarefa",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Create(TarefaDraft),
    Update { id: TarefaId, draft: TarefaDraft },
    Delete(TarefaId),
}

impl Command {
    pub fn operation(&self) -> Operation {
        match self {
            Command::List => Operation::List,
            Command::Create(_) => Operation::Create,
            Command::Update { .. } => Operation::Update,
            Command::Delete(_) => Operation::Delete,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub ticket: Ticket,
    pub command: Command,
}

impl Request {
    pub fn operation(&self) -> Operation {
        self.command.operation()
    }
}

/// Successful result of executing a [`Command`].
#[derive(Debug)]
pub enum Reply {
    Listed(Vec<Tarefa>),
    /// The store's echo of the task, when its body could be read.
    Created(Option<Tarefa>),
    Updated(Option<Tarefa>),
    Deleted(TarefaId),
}

#[derive(Debug)]
pub struct Response {
    pub ticket: Ticket,
    pub operation: Operation,
    pub result: Result<Reply, ApiError>,
}

impl Response {
    pub fn new(request: &Request, result: Result<Reply, ApiError>) -> Self {
        Self {
            ticket: request.ticket,
            operation: request.operation(),
            result,
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    /// The projection was replaced by a fresh listing.
    Refreshed,
    Created(Option<Tarefa>),
    Updated(Option<Tarefa>),
    Deleted(TarefaId),
    /// Nothing changed locally; the caller should surface `error`.
    Failed {
        operation: Operation,
        error: ApiError,
    },
    /// Response to a request issued before the last [`SyncState::detach`].
    Stale,
}

#[derive(Debug)]
pub struct Transition {
    pub ticket: Ticket,
    pub outcome: Outcome,
    pub follow_up: Option<Request>,
}

#[derive(Debug, Default)]
pub struct SyncState {
    rows: Vec<TarefaRow>,
    generation: u64,
    seq: u64,
    in_flight: usize,
    loaded: bool,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[TarefaRow] {
        &self.rows
    }

    pub fn find(&self, id: &TarefaId) -> Option<&TarefaRow> {
        self.rows.iter().find(|row| row.id() == id)
    }

    /// Whether at least one listing has been applied.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Requests issued in the current generation still awaiting a response.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn list(&mut self) -> Request {
        self.issue(Command::List)
    }

    pub fn create(&mut self, draft: TarefaDraft) -> Request {
        self.issue(Command::Create(draft))
    }

    pub fn update(&mut self, id: TarefaId, draft: TarefaDraft) -> Request {
        self.issue(Command::Update { id, draft })
    }

    pub fn delete(&mut self, id: TarefaId) -> Request {
        self.issue(Command::Delete(id))
    }

    /// Abandons every outstanding request. Their responses will be `Stale`.
    pub fn detach(&mut self) {
        self.generation += 1;
        self.in_flight = 0;
    }

    fn issue(&mut self, command: Command) -> Request {
        self.seq += 1;
        self.in_flight += 1;
        Request {
            ticket: Ticket {
                generation: self.generation,
                seq: self.seq,
            },
            command,
        }
    }

    pub fn apply(&mut self, response: Response) -> Transition {
        let Response {
            ticket,
            operation,
            result,
        } = response;

        if ticket.generation != self.generation {
            log::debug!("dropping {} response issued before detach", operation);
            return Transition {
                ticket,
                outcome: Outcome::Stale,
                follow_up: None,
            };
        }
        self.in_flight = self.in_flight.saturating_sub(1);

        let (outcome, follow_up) = match result {
            Ok(Reply::Listed(tarefas)) => {
                self.replace(tarefas);
                (Outcome::Refreshed, None)
            }
            Ok(Reply::Created(tarefa)) => {
                log::info!("created tarefa {}", echoed_id(tarefa.as_ref()));
                (Outcome::Created(tarefa), Some(self.list()))
            }
            Ok(Reply::Updated(tarefa)) => {
                log::info!("updated tarefa {}", echoed_id(tarefa.as_ref()));
                (Outcome::Updated(tarefa), Some(self.list()))
            }
            Ok(Reply::Deleted(id)) => {
                log::info!("deleted tarefa {}", id);
                (Outcome::Deleted(id), Some(self.list()))
            }
            Err(error) => {
                log::error!("{} request failed: {}", operation, error);
                (Outcome::Failed { operation, error }, None)
            }
        };

        Transition {
            ticket,
            outcome,
            follow_up,
        }
    }

    fn replace(&mut self, tarefas: Vec<Tarefa>) {
        let mut seen = HashSet::with_capacity(tarefas.len());
        let mut rows = Vec::with_capacity(tarefas.len());
        for tarefa in tarefas {
            if !seen.insert(tarefa.id.clone()) {
                log::warn!("store listed tarefa {} twice, keeping the first", tarefa.id);
                continue;
            }
            rows.push(TarefaRow::from(tarefa));
        }
        log::debug!("projection refreshed with {} tarefas", rows.len());
        self.rows = rows;
        self.loaded = true;
    }
}

fn echoed_id(tarefa: Option<&Tarefa>) -> String {
    tarefa.map_or_else(|| "(body not echoed)".to_string(), |t| t.id.to_string())
}
