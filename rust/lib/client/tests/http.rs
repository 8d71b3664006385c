//! End-to-end: the blocking client against a live server on a loopback port.

use std::sync::Arc;

use axum::Router;
use issueforge_client::{
    Board, ClientError, DeleteOutcome, HttpIssueApi, IssueApi, IssueForm, IssueId, IssueStatus,
    StatusFilter,
};
use issueforge_core::Module;
use issueforge_issue::IssueModule;
use issueforge_sql::{SQLStore, SqliteStore};

/// Serve the issue routes on 127.0.0.1 from a background runtime and
/// return the server root URL.
fn spawn_server() -> String {
    let db: Arc<dyn SQLStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
    let module = IssueModule::new(db).unwrap();
    let app = Router::new().nest("/api", module.routes());

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    format!("http://{addr}")
}

fn form(title: &str, owner: &str, status: IssueStatus, effort: &str) -> IssueForm {
    IssueForm {
        title: title.into(),
        owner: owner.into(),
        status,
        effort: effort.into(),
        due_date: String::new(),
    }
}

#[test]
fn board_round_trip() {
    let api = HttpIssueApi::new(&spawn_server()).unwrap();
    let mut board = Board::new(api);
    board.refresh().unwrap();
    assert!(board.issues().is_empty());

    let created = board
        .create(&form("Fix login", "Alice", IssueStatus::New, "3"))
        .unwrap()
        .into_value();
    assert_eq!(created.effort, 3);
    assert_eq!(created.status, IssueStatus::New);
    board
        .create(&form("Crash on save", "Bob", IssueStatus::Closed, ""))
        .unwrap();

    // Newest first.
    let titles: Vec<&str> = board.issues().iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, ["Crash on save", "Fix login"]);

    board.set_owner_filter("ali");
    assert_eq!(board.summary(), "Showing 1 of 2 issues");
    board.clear_filters();
    board.set_status_filter(StatusFilter::Only(IssueStatus::Closed));
    assert_eq!(board.visible()[0].title, "Crash on save");
    board.clear_filters();

    let mut edit = board.begin_edit(created.id.as_str()).unwrap();
    edit.status = IssueStatus::InProgress;
    edit.due_date = "2024-07-01".into();
    let updated = board.save_edit(&edit).unwrap().into_value();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created, created.created);
    assert_eq!(updated.status, IssueStatus::InProgress);
    assert_eq!(updated.due_date.unwrap().to_string(), "2024-07-01");

    // Clearing the date in the form clears it on the server.
    let mut edit = board.begin_edit(created.id.as_str()).unwrap();
    edit.due_date.clear();
    assert_eq!(board.save_edit(&edit).unwrap().value.due_date, None);

    let outcome = board.delete(created.id.as_str(), |_| true).unwrap();
    assert!(matches!(outcome, DeleteOutcome::Deleted(ref m) if m.value.id == created.id));
    assert_eq!(board.issues().len(), 1);

    // The server still answers a repeated delete with 404.
    match board.api().delete(&created.id) {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status, 404);
            assert!(message.contains(created.id.as_str()), "{message}");
        }
        other => panic!("expected 404, got {other:?}"),
    }
}

#[test]
fn server_rejections_surface_as_api_errors() {
    let api = HttpIssueApi::new(&spawn_server()).unwrap();
    let unknown = IssueId::generate();

    let draft = form("x", "y", IssueStatus::New, "").submit().unwrap();
    match api.update(&unknown, &draft) {
        Err(ClientError::Api { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected 404, got {other:?}"),
    }

    let mut board = Board::new(api);
    let err = board
        .create(&form("", "Alice", IssueStatus::New, ""))
        .unwrap_err();
    assert_eq!(err.to_string(), "Please fill in both Title and Owner fields");
}

#[test]
fn unreachable_server_is_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let mut board = Board::new(HttpIssueApi::new(&format!("http://127.0.0.1:{port}")).unwrap());
    assert!(matches!(board.refresh(), Err(ClientError::Transport(_))));
    assert!(board.issues().is_empty());
}
