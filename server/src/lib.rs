//! In-memory remote store speaking the `/tarefas` contract.

use std::sync::{Mutex, PoisonError};

use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use chrono::Local;
use tarefas_shared::{Status, Tarefa, TarefaDraft, TarefaId};

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn local_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    tarefas: Vec<Tarefa>,
}

/// Task collection shared by every worker.
#[derive(Debug)]
pub struct Store {
    inner: Mutex<Inner>,
    clock: fn() -> String,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self::with_clock(local_now)
    }

    /// Store stamping timestamps with `clock` instead of the local time.
    pub fn with_clock(clock: fn() -> String) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            clock,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn all(&self) -> Vec<Tarefa> {
        self.lock().tarefas.clone()
    }

    pub fn insert(&self, draft: TarefaDraft) -> Tarefa {
        let now = (self.clock)();
        let mut inner = self.lock();
        inner.last_id += 1;
        let tarefa = Tarefa {
            id: TarefaId::Number(inner.last_id),
            titulo: draft.titulo,
            descricao: draft.descricao,
            data_criacao: now.clone(),
            data_conclusao: draft.status.is_terminal().then_some(now),
            status: draft.status,
        };
        inner.tarefas.push(tarefa.clone());
        tarefa
    }

    /// Applies the editable fields. `dataConclusao` is stamped only when the
    /// status moves into `CONCLUIDA`.
    pub fn update(&self, id: &str, draft: TarefaDraft) -> Option<Tarefa> {
        let now = (self.clock)();
        let mut inner = self.lock();
        let tarefa = inner
            .tarefas
            .iter_mut()
            .find(|t| t.id.to_string() == id)?;

        if draft.status == Status::Concluida && tarefa.status != Status::Concluida {
            tarefa.data_conclusao = Some(now);
        }
        tarefa.titulo = draft.titulo;
        tarefa.descricao = draft.descricao;
        tarefa.status = draft.status;
        Some(tarefa.clone())
    }

    pub fn remove(&self, id: &str) -> bool {
        let mut inner = self.lock();
        let before = inner.tarefas.len();
        inner.tarefas.retain(|t| t.id.to_string() != id);
        inner.tarefas.len() != before
    }
}

#[get("/tarefas")]
async fn listar(store: web::Data<Store>) -> impl Responder {
    HttpResponse::Ok().json(store.all())
}

#[post("/tarefas")]
async fn criar(store: web::Data<Store>, body: web::Json<TarefaDraft>) -> impl Responder {
    let tarefa = store.insert(body.into_inner());
    log::info!("created tarefa {}", tarefa.id);
    HttpResponse::Created().json(tarefa)
}

#[put("/tarefas/{id}")]
async fn atualizar(
    store: web::Data<Store>,
    id: web::Path<String>,
    body: web::Json<TarefaDraft>,
) -> impl Responder {
    match store.update(&id, body.into_inner()) {
        Some(tarefa) => {
            log::info!("updated tarefa {}", tarefa.id);
            HttpResponse::Ok().json(tarefa)
        }
        None => HttpResponse::NotFound().finish(),
    }
}

#[delete("/tarefas/{id}")]
async fn excluir(store: web::Data<Store>, id: web::Path<String>) -> impl Responder {
    if store.remove(&id) {
        log::info!("deleted tarefa {}", id);
        HttpResponse::NoContent().finish()
    } else {
        HttpResponse::NotFound().finish()
    }
}

/// Registers the `/tarefas` routes. The app must carry a `web::Data<Store>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(listar)
        .service(criar)
        .service(atualizar)
        .service(excluir);
}
