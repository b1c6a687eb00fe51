//! Mount the app against the live mock server and drive it with input lines.

use std::io::Cursor;

use mock_server::Todo;
use todo_app::{ApiProvider, App, HttpTransport, Root};
use todo_core::ApiConfig;

fn spawn_mock_server(seed: Vec<Todo>) -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::serve(listener, mock_server::app_with(seed)).await
        })
        .unwrap();
    });

    addr
}

fn todo(id: u64, title: &str, completed: bool) -> Todo {
    Todo {
        id,
        title: title.to_string(),
        completed,
    }
}

/// Run the app over `input` and return every frame it drew.
fn run(addr: std::net::SocketAddr, input: &str) -> Vec<String> {
    let config = ApiConfig::new(&format!("http://{addr}"));
    let mut provider = ApiProvider::new(&config, HttpTransport::new());
    let mut out = Vec::new();

    Root::create(&mut out)
        .render(&mut provider, App::new(), Cursor::new(input.to_string()))
        .unwrap();

    String::from_utf8(out)
        .unwrap()
        .split("Todo List\n=========\n")
        .skip(1)
        .map(|frame| frame.to_string())
        .collect()
}

fn list_lines(frame: &str) -> Vec<&str> {
    frame.lines().take_while(|l| !l.is_empty()).collect()
}

#[test]
fn first_frame_lists_newest_first() {
    let addr = spawn_mock_server(vec![
        todo(3, "third", false),
        todo(1, "first", true),
        todo(2, "second", false),
    ]);

    let frames = run(addr, "");
    assert_eq!(frames.len(), 1);
    assert_eq!(
        list_lines(&frames[0]),
        vec!["[ ] #3 third", "[ ] #2 second", "[x] #1 first"]
    );
}

#[test]
fn writes_show_up_in_the_next_frame() {
    let addr = spawn_mock_server(vec![todo(1, "Buy milk", false)]);

    let frames = run(addr, "add Walk dog\ntoggle 1\ndelete 2\nquit\n");
    assert_eq!(frames.len(), 4);
    assert_eq!(list_lines(&frames[0]), vec!["[ ] #1 Buy milk"]);
    assert_eq!(list_lines(&frames[1]), vec!["[ ] #2 Walk dog", "[ ] #1 Buy milk"]);
    assert_eq!(list_lines(&frames[2]), vec!["[ ] #2 Walk dog", "[x] #1 Buy milk"]);
    assert_eq!(list_lines(&frames[3]), vec!["[x] #1 Buy milk"]);
}

#[test]
fn failed_write_keeps_list_and_shows_error() {
    let addr = spawn_mock_server(vec![todo(1, "only", false)]);

    let frames = run(addr, "delete 42\n");
    assert_eq!(frames.len(), 2);
    assert_eq!(
        list_lines(&frames[1]),
        vec!["[ ] #1 only", "! delete failed: resource not found"]
    );
}

#[test]
fn bad_input_prints_usage_without_redrawing() {
    let addr = spawn_mock_server(Vec::new());

    let frames = run(addr, "bogus\n");
    assert_eq!(frames.len(), 1);
    assert!(frames[0].starts_with("No todos yet.\n"));
    assert!(frames[0].contains("unknown command `bogus`"));
}

#[test]
fn unreachable_server_renders_error() {
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();

    let frames = run(addr, "");
    assert!(frames[0].starts_with("Error: network failure:"));
}
