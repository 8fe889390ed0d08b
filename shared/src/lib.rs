use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

mod display;

pub use display::{format_completion, format_timestamp, TarefaRow, DISPLAY_FORMAT, PLACEHOLDER};

/// Identifier assigned by the remote store. Backends hand out either numbers
/// or strings, so both are accepted and rendered as their bare value.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone)]
#[serde(untagged)]
pub enum TarefaId {
    Number(i64),
    Text(String),
}

impl fmt::Display for TarefaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TarefaId::Number(n) => write!(f, "{}", n),
            TarefaId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for TarefaId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().parse::<i64>() {
            Ok(n) => TarefaId::Number(n),
            Err(_) => TarefaId::Text(s.trim().to_string()),
        })
    }
}

impl From<i64> for TarefaId {
    fn from(n: i64) -> Self {
        TarefaId::Number(n)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    Aberta,
    EmAndamento,
    Concluida,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Aberta, Status::EmAndamento, Status::Concluida];

    /// Value sent on the wire.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Status::Aberta => "ABERTA",
            Status::EmAndamento => "EM_ANDAMENTO",
            Status::Concluida => "CONCLUIDA",
        }
    }

    /// Label shown in select controls.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Aberta => "ABERTA",
            Status::EmAndamento => "EM ANDAMENTO",
            Status::Concluida => "CONCLUIDA",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Status::Aberta => Status::EmAndamento,
            Status::EmAndamento => Status::Concluida,
            Status::Concluida => Status::Aberta,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Status::Aberta => Status::Concluida,
            Status::EmAndamento => Status::Aberta,
            Status::Concluida => Status::EmAndamento,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Concluida)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown status `{0}` (expected ABERTA, EM_ANDAMENTO or CONCLUIDA)")]
pub struct ParseStatusError(pub String);

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        Status::ALL
            .into_iter()
            .find(|status| status.as_wire() == normalized)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// A task as returned by the remote store.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Tarefa {
    pub id: TarefaId,
    pub titulo: String,
    /// Not enforced by the store; `null` and absent read as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub descricao: String,
    pub data_criacao: String,
    #[serde(default)]
    pub data_conclusao: Option<String>,
    pub status: Status,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Body of create and update requests. Id and timestamps are owned by the
/// remote store and never sent.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct TarefaDraft {
    pub titulo: String,
    pub descricao: String,
    #[serde(default)]
    pub status: Status,
}

impl TarefaDraft {
    pub fn new(titulo: impl Into<String>, descricao: impl Into<String>, status: Status) -> Self {
        Self {
            titulo: titulo.into(),
            descricao: descricao.into(),
            status,
        }
    }
}

impl From<&Tarefa> for TarefaDraft {
    fn from(tarefa: &Tarefa) -> Self {
        Self {
            titulo: tarefa.titulo.clone(),
            descricao: tarefa.descricao.clone(),
            status: tarefa.status,
        }
    }
}
