//! HTTP client for the `/tarefas` contract.

use reqwest::Response;
use serde::de::DeserializeOwned;
use tarefas_shared::{Tarefa, TarefaDraft, TarefaId};
use url::Url;

use crate::error::{ApiError, Error, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/tarefas";

#[derive(Debug, Clone)]
pub struct TarefasClient {
    http: reqwest::Client,
    base: Url,
}

impl TarefasClient {
    /// `base` points at the collection, e.g. `http://localhost:8080/tarefas`.
    pub fn new(base: Url) -> Result<Self> {
        if base.cannot_be_a_base() {
            return Err(Error::BaseUrl(base.to_string()));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn item_url(&self, id: &TarefaId) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&id.to_string());
        }
        url
    }

    pub async fn listar(&self) -> std::result::Result<Vec<Tarefa>, ApiError> {
        log::debug!("GET {}", self.base);
        let response = self
            .http
            .get(self.base.clone())
            .send()
            .await
            .map_err(ApiError::Unreachable)?;
        decode(ensure_success(response).await?).await
    }

    /// Any 2xx counts as applied. The echoed task is `None` when the body is
    /// empty or not a task.
    pub async fn criar(
        &self,
        draft: &TarefaDraft,
    ) -> std::result::Result<Option<Tarefa>, ApiError> {
        log::debug!("POST {}", self.base);
        let response = self
            .http
            .post(self.base.clone())
            .json(draft)
            .send()
            .await
            .map_err(ApiError::Unreachable)?;
        Ok(echoed(ensure_success(response).await?).await)
    }

    pub async fn atualizar(
        &self,
        id: &TarefaId,
        draft: &TarefaDraft,
    ) -> std::result::Result<Option<Tarefa>, ApiError> {
        let url = self.item_url(id);
        log::debug!("PUT {}", url);
        let response = self
            .http
            .put(url)
            .json(draft)
            .send()
            .await
            .map_err(ApiError::Unreachable)?;
        Ok(echoed(ensure_success(response).await?).await)
    }

    pub async fn excluir(&self, id: &TarefaId) -> std::result::Result<(), ApiError> {
        let url = self.item_url(id);
        log::debug!("DELETE {}", url);
        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(ApiError::Unreachable)?;
        ensure_success(response).await.map(drop)
    }
}

async fn ensure_success(response: Response) -> std::result::Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> std::result::Result<T, ApiError> {
    response.json::<T>().await.map_err(ApiError::from_body)
}

async fn echoed(response: Response) -> Option<Tarefa> {
    let url = response.url().clone();
    match response.json::<Tarefa>().await {
        Ok(tarefa) => Some(tarefa),
        Err(err) => {
            log::debug!("ignoring mutation body from {}: {}", url, err);
            None
        }
    }
}
