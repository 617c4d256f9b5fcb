//! Wire-level tests for the Yandex.Disk uploader against a local responder.
//!
//! A plain `TcpListener` answers one HTTP request per connection; every
//! response carries `Connection: close` so the client opens a fresh
//! connection for each phase.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;

use tempfile::TempDir;

use dtbackup::core::config::UploadConfig;
use dtbackup::core::secrets::SecretStore;
use dtbackup::core::upload::{DiskUploader, Uploader};
use dtbackup::error::UploadError;

/// One captured request: head (request line + headers) and body bytes.
struct Request {
    head: String,
    body: Vec<u8>,
}

impl Request {
    fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }
}

fn read_request(stream: &mut TcpStream) -> Request {
    let mut head = Vec::new();
    let mut byte = [0u8; 1];
    while !head.ends_with(b"\r\n\r\n") {
        if stream.read(&mut byte).unwrap() == 0 {
            break;
        }
        head.push(byte[0]);
    }
    let head = String::from_utf8_lossy(&head).to_string();

    let len = head
        .lines()
        .find_map(|line| {
            let (key, value) = line.split_once(':')?;
            if key.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);

    let mut body = vec![0u8; len];
    stream.read_exact(&mut body).unwrap();
    Request { head, body }
}

/// Serve one canned reply per accepted connection, reporting each request.
fn spawn_responder(replies: Vec<String>) -> (u16, mpsc::Receiver<Request>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for reply in replies {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            tx.send(request).unwrap();
            stream.write_all(reply.as_bytes()).unwrap();
        }
    });

    (port, rx)
}

fn json_reply(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nConnection: close\r\nContent-Length: {}\r\n\r\n{}",
        body.len(),
        body
    )
}

/// Store with a DISK_TOKEN secret, plus an artifact file to upload.
fn fixture(dir: &TempDir) -> (SecretStore, std::path::PathBuf) {
    let store = SecretStore::new(
        dir.path().join("key.key"),
        dir.path().join("secrets.toml"),
    );
    store.init_key(false).unwrap();
    store.set("DISK_TOKEN", "test-token").unwrap();

    let artifact = dir.path().join("Acme_20240601_120000.dt");
    std::fs::write(&artifact, b"dump-bytes").unwrap();
    (store, artifact)
}

fn upload_config() -> UploadConfig {
    UploadConfig {
        enabled: true,
        remote_dir: "/Backups/1C".into(),
        token_secret: "DISK_TOKEN".into(),
    }
}

#[test]
fn two_phase_upload_follows_the_wire_contract() {
    let dir = tempfile::tempdir().unwrap();
    let (store, artifact) = fixture(&dir);

    // Bind first so the href in phase 1 can point back at the responder.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let href_body = format!("{{\"href\":\"http://127.0.0.1:{}/upload-target\",\"method\":\"PUT\"}}", port);
    let replies = vec![
        json_reply(&href_body),
        "HTTP/1.1 201 Created\r\nConnection: close\r\nContent-Length: 0\r\n\r\n".to_string(),
    ];

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for reply in replies {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            tx.send(request).unwrap();
            stream.write_all(reply.as_bytes()).unwrap();
        }
    });

    let uploader = DiskUploader::with_base_url(&store, &format!("http://127.0.0.1:{}", port));
    uploader.upload(&upload_config(), &artifact).unwrap();

    // Phase 1: GET with encoded remote path, overwrite flag, and OAuth header.
    let first = rx.recv().unwrap();
    assert!(first.head.starts_with("GET /v1/disk/resources/upload?"));
    assert!(first
        .head
        .contains("path=%2FBackups%2F1C%2FAcme_20240601_120000.dt"));
    assert!(first.head.contains("overwrite=true"));
    assert_eq!(first.header("authorization"), Some("OAuth test-token"));

    // Phase 2: PUT of the artifact bytes to the returned href, same header.
    let second = rx.recv().unwrap();
    assert!(second.head.starts_with("PUT /upload-target"));
    assert_eq!(second.header("authorization"), Some("OAuth test-token"));
    assert_eq!(second.body, b"dump-bytes");
}

#[test]
fn api_error_status_fails_the_upload() {
    let dir = tempfile::tempdir().unwrap();
    let (store, artifact) = fixture(&dir);

    let (port, _rx) = spawn_responder(vec![
        "HTTP/1.1 401 Unauthorized\r\nConnection: close\r\nContent-Length: 12\r\n\r\nunauthorized".to_string(),
    ]);

    let uploader = DiskUploader::with_base_url(&store, &format!("http://127.0.0.1:{}", port));
    let err = uploader.upload(&upload_config(), &artifact).unwrap_err();
    match err {
        UploadError::Api { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "unauthorized");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[test]
fn response_without_href_fails_the_upload() {
    let dir = tempfile::tempdir().unwrap();
    let (store, artifact) = fixture(&dir);

    let (port, _rx) = spawn_responder(vec![json_reply("{\"method\":\"PUT\"}")]);

    let uploader = DiskUploader::with_base_url(&store, &format!("http://127.0.0.1:{}", port));
    let err = uploader.upload(&upload_config(), &artifact).unwrap_err();
    assert!(matches!(err, UploadError::MissingHref));
}

#[test]
fn missing_token_secret_fails_before_any_request() {
    let dir = tempfile::tempdir().unwrap();
    let (store, artifact) = fixture(&dir);

    let config = UploadConfig {
        enabled: true,
        remote_dir: "/Backups/1C".into(),
        token_secret: "ABSENT_TOKEN".into(),
    };

    // No responder: resolving the token must fail before any connection.
    let uploader = DiskUploader::with_base_url(&store, "http://127.0.0.1:1");
    let err = uploader.upload(&config, &artifact).unwrap_err();
    match err {
        UploadError::Token { name, .. } => assert_eq!(name, "ABSENT_TOKEN"),
        other => panic!("expected Token error, got {:?}", other),
    }
}
