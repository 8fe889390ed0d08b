//! Presentation transform for timestamps.
//!
//! The formatted strings live next to the untouched [`Tarefa`], never in
//! place of its fields.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

use crate::{Tarefa, TarefaId};

pub const DISPLAY_FORMAT: &str = "%d/%m/%Y - %H:%M:%S";

/// Shown when a task has no completion timestamp.
pub const PLACEHOLDER: &str = "-";

const NAIVE_PATTERNS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Formats a store timestamp as `DD/MM/YYYY - HH:MM:SS`.
///
/// Timestamps without an offset are taken as local wall time; timestamps
/// carrying one are converted to local time. Anything unparseable is returned
/// verbatim.
pub fn format_timestamp(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.with_timezone(&Local).format(DISPLAY_FORMAT).to_string();
    }

    for pattern in NAIVE_PATTERNS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return dt.format(DISPLAY_FORMAT).to_string();
        }
    }

    if let Some(dt) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return dt.format(DISPLAY_FORMAT).to_string();
    }

    raw.to_string()
}

pub fn format_completion(raw: Option<&str>) -> String {
    match raw {
        Some(value) if !value.trim().is_empty() => format_timestamp(value),
        _ => PLACEHOLDER.to_string(),
    }
}

/// One row of the local projection.
#[derive(Debug, Clone, PartialEq)]
pub struct TarefaRow {
    pub tarefa: Tarefa,
    pub criada_em: String,
    pub concluida_em: String,
}

impl TarefaRow {
    pub fn id(&self) -> &TarefaId {
        &self.tarefa.id
    }

    /// Grid cells in column order: id, titulo, descricao, dataCriacao,
    /// dataConclusao, status.
    pub fn cells(&self) -> [String; 6] {
        [
            self.tarefa.id.to_string(),
            self.tarefa.titulo.clone(),
            self.tarefa.descricao.clone(),
            self.criada_em.clone(),
            self.concluida_em.clone(),
            self.tarefa.status.label().to_string(),
        ]
    }
}

impl From<Tarefa> for TarefaRow {
    fn from(tarefa: Tarefa) -> Self {
        let criada_em = format_timestamp(&tarefa.data_criacao);
        let concluida_em = format_completion(tarefa.data_conclusao.as_deref());
        Self {
            tarefa,
            criada_em,
            concluida_em,
        }
    }
}
