use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};

use actix_web::{dev::ServerHandle, rt, web, App, HttpResponse, HttpServer};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tarefas_server::{configure, Store};
use tarefas_shared::{Status, TarefaDraft, TarefaId};
use tarefas_terminal_ui::{
    api::TarefasClient,
    app::{self, Dialog, ToastLevel},
    executor, script,
    sync::{Outcome, Response, SyncState},
    ApiError,
};
use url::Url;

struct TestStore {
    client: TarefasClient,
    store: web::Data<Store>,
    handle: ServerHandle,
}

fn start_store() -> TestStore {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let store = web::Data::new(Store::new());

    let data = store.clone();
    let server = HttpServer::new(move || App::new().app_data(data.clone()).configure(configure))
        .workers(1)
        .listen(listener)
        .unwrap()
        .run();
    let handle = server.handle();
    rt::spawn(server);

    let url: Url = format!("http://127.0.0.1:{}/tarefas", port).parse().unwrap();
    TestStore {
        client: TarefasClient::new(url).unwrap(),
        store,
        handle,
    }
}

/// Serves whatever routes `routes` registers, with `applied` counting calls.
fn start_stub<F>(routes: F) -> (TarefasClient, web::Data<AtomicUsize>, ServerHandle)
where
    F: Fn(&mut web::ServiceConfig) + Clone + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let applied = web::Data::new(AtomicUsize::new(0));

    let data = applied.clone();
    let server = HttpServer::new(move || App::new().app_data(data.clone()).configure(routes.clone()))
        .workers(1)
        .listen(listener)
        .unwrap()
        .run();
    let handle = server.handle();
    rt::spawn(server);

    let url: Url = format!("http://127.0.0.1:{}/tarefas", port).parse().unwrap();
    (TarefasClient::new(url).unwrap(), applied, handle)
}

async fn count_then(applied: web::Data<AtomicUsize>, status: u16) -> HttpResponse {
    applied.fetch_add(1, Ordering::SeqCst);
    HttpResponse::build(actix_web::http::StatusCode::from_u16(status).unwrap()).finish()
}

fn empty_bodied_store(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/tarefas",
        web::get().to(|| async { HttpResponse::Ok().json(Vec::<tarefas_shared::Tarefa>::new()) }),
    )
    .route(
        "/tarefas",
        web::post().to(|applied: web::Data<AtomicUsize>| count_then(applied, 201)),
    )
    .route(
        "/tarefas/{id}",
        web::put().to(|applied: web::Data<AtomicUsize>| count_then(applied, 200)),
    );
}

fn garbled_listing(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/tarefas",
        web::get().to(|| async {
            HttpResponse::Ok()
                .content_type("application/json")
                .body("[{\"id\": 1, \"titulo\":")
        }),
    );
}

/// Client pointed at a port nothing listens on.
fn dead_client() -> TarefasClient {
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let url: Url = format!("http://127.0.0.1:{}/tarefas", port).parse().unwrap();
    TarefasClient::new(url).unwrap()
}

async fn listed(sync: &mut SyncState, client: &TarefasClient) {
    let request = sync.list();
    let transitions = executor::drive(sync, client, request).await;
    assert!(matches!(transitions[0].outcome, Outcome::Refreshed));
}

fn ids(sync: &SyncState) -> Vec<TarefaId> {
    sync.rows().iter().map(|row| row.id().clone()).collect()
}

#[actix_web::test]
async fn list_is_idempotent() {
    let t = start_store();
    t.store.insert(TarefaDraft::new("a", "x", Status::Aberta));
    t.store.insert(TarefaDraft::new("b", "y", Status::Concluida));

    let mut sync = SyncState::new();
    listed(&mut sync, &t.client).await;
    let first = sync.rows().to_vec();
    listed(&mut sync, &t.client).await;

    assert_eq!(first.len(), 2);
    assert_eq!(sync.rows(), first.as_slice());
    t.handle.stop(true).await;
}

#[actix_web::test]
async fn create_then_list_shows_one_new_tarefa() {
    let t = start_store();
    t.store.insert(TarefaDraft::new("existing", "", Status::Aberta));

    let mut sync = SyncState::new();
    listed(&mut sync, &t.client).await;
    let before = ids(&sync);

    let draft = TarefaDraft::new("Nova", "criada pelo teste", Status::EmAndamento);
    let request = sync.create(draft.clone());
    let transitions = executor::drive(&mut sync, &t.client, request).await;

    assert_eq!(transitions.len(), 2, "create followed by a re-fetch");
    let created = match &transitions[0].outcome {
        Outcome::Created(Some(tarefa)) => tarefa.clone(),
        other => panic!("unexpected outcome {:?}", other),
    };
    assert!(matches!(transitions[1].outcome, Outcome::Refreshed));

    assert!(!before.contains(&created.id));
    let new_rows: Vec<_> = sync
        .rows()
        .iter()
        .filter(|row| !before.contains(row.id()))
        .collect();
    assert_eq!(new_rows.len(), 1);
    let row = new_rows[0];
    assert_eq!(TarefaDraft::from(&row.tarefa), draft);
    assert!(!row.tarefa.data_criacao.is_empty());
    assert_eq!(row.concluida_em, "-");
    t.handle.stop(true).await;
}

#[actix_web::test]
async fn update_then_list_keeps_timestamps() {
    let t = start_store();
    let original = t.store.insert(TarefaDraft::new("a", "b", Status::Aberta));

    let mut sync = SyncState::new();
    listed(&mut sync, &t.client).await;
    let before = sync.find(&original.id).unwrap().tarefa.clone();

    let patch = TarefaDraft::new("a2", "b2", Status::EmAndamento);
    let request = sync.update(original.id.clone(), patch.clone());
    executor::drive(&mut sync, &t.client, request).await;

    let after = &sync.find(&original.id).unwrap().tarefa;
    assert_eq!(TarefaDraft::from(after), patch);
    assert_eq!(after.data_criacao, before.data_criacao);
    assert_eq!(after.data_conclusao, before.data_conclusao);
    t.handle.stop(true).await;
}

#[actix_web::test]
async fn delete_then_list_drops_the_id() {
    let t = start_store();
    let keep = t.store.insert(TarefaDraft::new("keep", "", Status::Aberta));
    let gone = t.store.insert(TarefaDraft::new("gone", "", Status::Aberta));

    let mut sync = SyncState::new();
    listed(&mut sync, &t.client).await;
    let request = sync.delete(gone.id.clone());
    let transitions = executor::drive(&mut sync, &t.client, request).await;

    assert!(matches!(&transitions[0].outcome, Outcome::Deleted(id) if *id == gone.id));
    assert_eq!(ids(&sync), vec![keep.id]);
    t.handle.stop(true).await;
}

#[actix_web::test]
async fn unknown_id_is_a_status_error() {
    let t = start_store();
    let mut sync = SyncState::new();

    let request = sync.update(TarefaId::Number(404), TarefaDraft::new("x", "", Status::Aberta));
    let transitions = executor::drive(&mut sync, &t.client, request).await;

    assert_eq!(transitions.len(), 1, "no re-fetch after a failure");
    assert!(matches!(
        transitions[0].outcome,
        Outcome::Failed {
            error: ApiError::Status { status: 404, .. },
            ..
        }
    ));
    t.handle.stop(true).await;
}

#[actix_web::test]
async fn unreachable_store_keeps_projection_and_draft() {
    let t = start_store();
    t.store.insert(TarefaDraft::new("a", "", Status::Aberta));

    let mut view = app::App::default();
    let request = view.start();
    let result = executor::execute(&t.client, request.command.clone()).await;
    view.on_response(Response::new(&request, result));
    let before = view.rows().to_vec();
    assert_eq!(before.len(), 1);

    view.on_key(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE));
    for c in "rascunho".chars() {
        view.on_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }
    let request = view
        .on_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
        .unwrap();

    let dead = dead_client();
    let result = executor::execute(&dead, request.command.clone()).await;
    assert!(matches!(result, Err(ApiError::Unreachable(_))));
    assert!(view.on_response(Response::new(&request, result)).is_none());

    assert_eq!(view.rows(), before.as_slice());
    match &view.dialog {
        Some(Dialog::Create(form)) => {
            assert_eq!(form.draft.titulo, "rascunho");
            assert!(!form.is_pending());
        }
        other => panic!("expected the create form to stay open, got {:?}", other),
    }
    assert_eq!(view.toast.as_ref().map(|t| t.level), Some(ToastLevel::Error));
    t.handle.stop(true).await;
}

#[actix_web::test]
async fn script_create_prints_resynchronized_table() {
    let t = start_store();
    let mut out = Vec::new();

    script::run(
        &t.client,
        tarefas_terminal_ui::cli::CliCommand::Create {
            titulo: "Via CLI".into(),
            descricao: "script".into(),
            status: Status::Aberta,
        },
        &mut out,
    )
    .await
    .unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("Via CLI"));
    assert_eq!(t.store.all().len(), 1);
    t.handle.stop(true).await;
}

#[actix_web::test]
async fn script_update_merges_omitted_fields() {
    let t = start_store();
    let created = t.store.insert(TarefaDraft::new("titulo", "descricao", Status::Aberta));

    script::run(
        &t.client,
        tarefas_terminal_ui::cli::CliCommand::Update {
            id: created.id.clone(),
            titulo: None,
            descricao: None,
            status: Some(Status::Concluida),
        },
        &mut Vec::new(),
    )
    .await
    .unwrap();

    let stored = &t.store.all()[0];
    assert_eq!(stored.titulo, "titulo");
    assert_eq!(stored.descricao, "descricao");
    assert_eq!(stored.status, Status::Concluida);
    assert!(stored.data_conclusao.is_some());
    t.handle.stop(true).await;
}

#[actix_web::test]
async fn script_update_of_missing_id_fails() {
    let t = start_store();
    let err = script::run(
        &t.client,
        tarefas_terminal_ui::cli::CliCommand::Update {
            id: TarefaId::Number(9),
            titulo: Some("x".into()),
            descricao: None,
            status: None,
        },
        &mut Vec::new(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, tarefas_terminal_ui::Error::UnknownTarefa(_)));
    t.handle.stop(true).await;
}

#[actix_web::test]
async fn mutation_without_echoed_body_still_refetches() {
    let (client, applied, handle) = start_stub(empty_bodied_store);
    let mut sync = SyncState::new();

    let request = sync.update(TarefaId::Number(1), TarefaDraft::new("a", "", Status::Aberta));
    let transitions = executor::drive(&mut sync, &client, request).await;
    assert_eq!(transitions.len(), 2, "update followed by a re-fetch");
    assert!(matches!(transitions[0].outcome, Outcome::Updated(None)));
    assert!(matches!(transitions[1].outcome, Outcome::Refreshed));

    let request = sync.create(TarefaDraft::new("b", "", Status::Aberta));
    let transitions = executor::drive(&mut sync, &client, request).await;
    assert_eq!(transitions.len(), 2, "create followed by a re-fetch");
    assert!(matches!(transitions[0].outcome, Outcome::Created(None)));

    assert_eq!(applied.load(Ordering::SeqCst), 2);
    assert!(sync.is_loaded());
    handle.stop(true).await;
}

#[actix_web::test]
async fn malformed_listing_is_a_decode_error() {
    let t = start_store();
    t.store.insert(TarefaDraft::new("a", "", Status::Aberta));
    let mut sync = SyncState::new();
    listed(&mut sync, &t.client).await;
    let before = sync.rows().to_vec();

    let (garbled, _, handle) = start_stub(garbled_listing);
    let request = sync.list();
    let transitions = executor::drive(&mut sync, &garbled, request).await;

    assert_eq!(transitions.len(), 1);
    assert!(matches!(
        transitions[0].outcome,
        Outcome::Failed {
            error: ApiError::Decode(_),
            ..
        }
    ));
    assert_eq!(sync.rows(), before.as_slice());
    handle.stop(true).await;
    t.handle.stop(true).await;
}
