//! View state around the synchronization workflow.
//!
//! Key events and workflow responses go in through [`App::on_key`] and
//! [`App::on_response`]; whatever request they return is for the caller to
//! execute. Nothing here touches the network or the terminal.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tarefas_shared::{Tarefa, TarefaDraft, TarefaId, TarefaRow};

use crate::sync::{Outcome, Request, Response, SyncState, Ticket};

pub const PAGE_SIZES: [usize; 3] = [5, 10, 50];

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Titulo,
    Descricao,
    Status,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::Titulo => Field::Descricao,
            Field::Descricao => Field::Status,
            Field::Status => Field::Titulo,
        }
    }

    fn previous(self) -> Self {
        match self {
            Field::Titulo => Field::Status,
            Field::Descricao => Field::Titulo,
            Field::Status => Field::Descricao,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormAction {
    Submit,
    Cancel,
    Continue,
}

/// Create/edit form. The draft survives until its request succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub draft: TarefaDraft,
    pub focus: Field,
    pub pending: Option<Ticket>,
}

impl Form {
    pub fn new(draft: TarefaDraft) -> Self {
        Self {
            draft,
            focus: Field::Titulo,
            pending: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn on_key(&mut self, key: KeyEvent) -> FormAction {
        if key.code == KeyCode::Esc {
            return FormAction::Cancel;
        }
        // buffer is frozen while its request is in flight
        if self.is_pending() {
            return FormAction::Continue;
        }

        match key.code {
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.previous(),
            code => match self.focus {
                Field::Status => match code {
                    KeyCode::Left | KeyCode::Char('h') => {
                        self.draft.status = self.draft.status.previous()
                    }
                    KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
                        self.draft.status = self.draft.status.next()
                    }
                    _ => {}
                },
                Field::Titulo | Field::Descricao => {
                    let text = if self.focus == Field::Titulo {
                        &mut self.draft.titulo
                    } else {
                        &mut self.draft.descricao
                    };
                    match code {
                        KeyCode::Char(c) => text.push(c),
                        KeyCode::Backspace => {
                            text.pop();
                        }
                        _ => {}
                    }
                }
            },
        }
        FormAction::Continue
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    Create(Form),
    Edit { id: TarefaId, form: Form },
    ConfirmDelete { id: TarefaId, titulo: String },
}

impl Dialog {
    pub fn form(&self) -> Option<&Form> {
        match self {
            Dialog::Create(form) | Dialog::Edit { form, .. } => Some(form),
            Dialog::ConfirmDelete { .. } => None,
        }
    }

    fn form_mut(&mut self) -> Option<&mut Form> {
        match self {
            Dialog::Create(form) | Dialog::Edit { form, .. } => Some(form),
            Dialog::ConfirmDelete { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub expires_at: Instant,
}

#[derive(Debug)]
pub struct App {
    pub sync: SyncState,
    pub dialog: Option<Dialog>,
    pub selected: usize,
    pub page_size: usize,
    pub toast: Option<Toast>,
    pub should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new(PAGE_SIZES[0])
    }
}

impl App {
    pub fn new(page_size: usize) -> Self {
        Self {
            sync: SyncState::new(),
            dialog: None,
            selected: 0,
            page_size: page_size.max(1),
            toast: None,
            should_quit: false,
        }
    }

    /// Initial listing.
    pub fn start(&mut self) -> Request {
        self.sync.list()
    }

    /// Detaches the workflow so late responses are ignored.
    pub fn shutdown(&mut self) {
        self.sync.detach();
    }

    pub fn rows(&self) -> &[TarefaRow] {
        self.sync.rows()
    }

    pub fn selected_row(&self) -> Option<&TarefaRow> {
        self.rows().get(self.selected)
    }

    pub fn page(&self) -> usize {
        self.selected / self.page_size
    }

    pub fn page_count(&self) -> usize {
        self.rows().len().div_ceil(self.page_size).max(1)
    }

    /// Rows on the current page.
    pub fn visible(&self) -> &[TarefaRow] {
        let rows = self.rows();
        let start = (self.page() * self.page_size).min(rows.len());
        let end = (start + self.page_size).min(rows.len());
        &rows[start..end]
    }

    pub fn notify(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            level,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    /// Expires the toast.
    pub fn tick(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| t.expires_at <= now) {
            self.toast = None;
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Option<Request> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }

        match self.dialog.take() {
            Some(dialog) => self.on_dialog_key(dialog, key),
            None => self.on_table_key(key),
        }
    }

    fn on_table_key(&mut self, key: KeyEvent) -> Option<Request> {
        let len = self.rows().len();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Right | KeyCode::PageDown | KeyCode::Char('l') => {
                let start = (self.page() + 1) * self.page_size;
                if start < len {
                    self.selected = start;
                }
            }
            KeyCode::Left | KeyCode::PageUp | KeyCode::Char('h') => {
                self.selected = self.page().saturating_sub(1) * self.page_size;
            }
            KeyCode::Char('p') => self.cycle_page_size(),
            KeyCode::Char('r') => return Some(self.sync.list()),
            KeyCode::Char('n') => self.dialog = Some(Dialog::Create(Form::new(TarefaDraft::default()))),
            KeyCode::Char('e') | KeyCode::Enter => {
                self.dialog = self.selected_row().map(|row| Dialog::Edit {
                    id: row.id().clone(),
                    form: Form::new(TarefaDraft::from(&row.tarefa)),
                });
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                self.dialog = self.selected_row().map(|row| Dialog::ConfirmDelete {
                    id: row.id().clone(),
                    titulo: row.tarefa.titulo.clone(),
                });
            }
            _ => {}
        }
        None
    }

    fn on_dialog_key(&mut self, dialog: Dialog, key: KeyEvent) -> Option<Request> {
        match dialog {
            Dialog::Create(mut form) => match form.on_key(key) {
                FormAction::Cancel => None,
                FormAction::Continue => {
                    self.dialog = Some(Dialog::Create(form));
                    None
                }
                FormAction::Submit => {
                    let request = self.submit(&mut form, |sync, draft| sync.create(draft));
                    self.dialog = Some(Dialog::Create(form));
                    request
                }
            },
            Dialog::Edit { id, mut form } => match form.on_key(key) {
                FormAction::Cancel => None,
                FormAction::Continue => {
                    self.dialog = Some(Dialog::Edit { id, form });
                    None
                }
                FormAction::Submit => {
                    let request =
                        self.submit(&mut form, |sync, draft| sync.update(id.clone(), draft));
                    self.dialog = Some(Dialog::Edit { id, form });
                    request
                }
            },
            Dialog::ConfirmDelete { id, titulo } => match key.code {
                KeyCode::Char('y') | KeyCode::Char('s') | KeyCode::Enter => {
                    Some(self.sync.delete(id))
                }
                KeyCode::Char('n') | KeyCode::Esc => None,
                _ => {
                    self.dialog = Some(Dialog::ConfirmDelete { id, titulo });
                    None
                }
            },
        }
    }

    fn submit(
        &mut self,
        form: &mut Form,
        issue: impl FnOnce(&mut SyncState, TarefaDraft) -> Request,
    ) -> Option<Request> {
        if form.is_pending() {
            return None;
        }
        if form.draft.titulo.trim().is_empty() {
            self.notify(ToastLevel::Error, "O título é obrigatório");
            return None;
        }
        let request = issue(&mut self.sync, form.draft.clone());
        form.pending = Some(request.ticket);
        Some(request)
    }

    fn cycle_page_size(&mut self) {
        let position = PAGE_SIZES.iter().position(|&size| size == self.page_size);
        self.page_size = match position {
            Some(i) => PAGE_SIZES[(i + 1) % PAGE_SIZES.len()],
            None => PAGE_SIZES[0],
        };
    }

    pub fn on_response(&mut self, response: Response) -> Option<Request> {
        let selected_id = self.selected_row().map(|row| row.id().clone());
        let transition = self.sync.apply(response);

        match transition.outcome {
            Outcome::Refreshed => self.reselect(selected_id),
            Outcome::Created(tarefa) => {
                self.close_form(transition.ticket);
                self.notify(ToastLevel::Info, saved_message(tarefa.as_ref(), "criada"));
            }
            Outcome::Updated(tarefa) => {
                self.close_form(transition.ticket);
                self.notify(ToastLevel::Info, saved_message(tarefa.as_ref(), "atualizada"));
            }
            Outcome::Deleted(id) => {
                self.notify(ToastLevel::Info, format!("Tarefa {} excluída", id));
            }
            Outcome::Failed { operation, error } => {
                self.release_form(transition.ticket);
                self.notify(
                    ToastLevel::Error,
                    format!("Falha ao {}: {}", operation.describe(), error.reason()),
                );
            }
            Outcome::Stale => {}
        }

        transition.follow_up
    }

    fn close_form(&mut self, ticket: Ticket) {
        let owns_ticket = self
            .dialog
            .as_ref()
            .and_then(Dialog::form)
            .is_some_and(|form| form.pending == Some(ticket));
        if owns_ticket {
            self.dialog = None;
        }
    }

    fn release_form(&mut self, ticket: Ticket) {
        if let Some(form) = self.dialog.as_mut().and_then(Dialog::form_mut) {
            if form.pending == Some(ticket) {
                form.pending = None;
            }
        }
    }

    /// Keeps the cursor on the same tarefa across a refresh when it survived.
    fn reselect(&mut self, previous: Option<TarefaId>) {
        let rows = self.rows();
        let found = previous.and_then(|id| rows.iter().position(|row| *row.id() == id));
        self.selected = match found {
            Some(index) => index,
            None => self.selected.min(rows.len().saturating_sub(1)),
        };
    }
}

fn saved_message(tarefa: Option<&Tarefa>, verb: &str) -> String {
    match tarefa {
        Some(tarefa) => format!("Tarefa {} {}", tarefa.id, verb),
        None => format!("Tarefa {}", verb),
    }
}
