//! Runs workflow requests against the remote store.

use tokio::sync::mpsc::UnboundedSender;

use crate::api::TarefasClient;
use crate::error::ApiError;
use crate::sync::{Command, Reply, Request, Response, SyncState, Transition};

pub async fn execute(client: &TarefasClient, command: Command) -> Result<Reply, ApiError> {
    match command {
        Command::List => client.listar().await.map(Reply::Listed),
        Command::Create(draft) => client.criar(&draft).await.map(Reply::Created),
        Command::Update { id, draft } => client.atualizar(&id, &draft).await.map(Reply::Updated),
        Command::Delete(id) => client.excluir(&id).await.map(|()| Reply::Deleted(id)),
    }
}

/// Executes `request` in the background and reports back on `tx`.
///
/// The task is never aborted. If the receiving side is gone by the time it
/// finishes, the response is dropped.
pub fn spawn(client: &TarefasClient, tx: &UnboundedSender<Response>, request: Request) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let ticket = request.ticket;
        let operation = request.operation();
        let result = execute(&client, request.command).await;
        let response = Response {
            ticket,
            operation,
            result,
        };
        if tx.send(response).is_err() {
            log::debug!("receiver closed, dropping {} response", operation);
        }
    });
}

/// Executes `request` and every follow-up it triggers, one after the other.
pub async fn drive(
    sync: &mut SyncState,
    client: &TarefasClient,
    request: Request,
) -> Vec<Transition> {
    let mut transitions = Vec::new();
    let mut next = Some(request);

    while let Some(request) = next.take() {
        let ticket = request.ticket;
        let operation = request.operation();
        let result = execute(client, request.command).await;
        let mut transition = sync.apply(Response {
            ticket,
            operation,
            result,
        });
        next = transition.follow_up.take();
        transitions.push(transition);
    }

    transitions
}
