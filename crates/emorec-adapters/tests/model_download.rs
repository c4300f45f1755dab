//! Integration tests for model download against a local HTTP server.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;

use emorec_adapters::models::{self, ModelSource};

/// Serves `body` once with status 200, or 404 when `body` is `None`.
fn serve_once(body: Option<Vec<u8>>) -> String {
    serve_raw(body.map(|body| (body.len(), body)))
}

/// Serves a 200 response announcing `announced` bytes but sending `body`,
/// or a 404 when `None`.
fn serve_raw(response: Option<(usize, Vec<u8>)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone"));
        let mut line = String::new();
        while reader.read_line(&mut line).is_ok_and(|n| n > 2) {
            line.clear();
        }

        let response = match response {
            Some((announced, body)) => {
                let mut head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {announced}\r\nConnection: close\r\n\r\n"
                )
                .into_bytes();
                head.extend(body);
                head
            }
            None => b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                .to_vec(),
        };
        let _ = stream.write_all(&response);
    });

    format!("http://{addr}/emotion-net.safetensors")
}

#[test]
fn test_download_with_matching_checksum() {
    let body = emorec_test_support::emotion_net_weights([0.0; 7]).unwrap();
    let expected = {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("ref");
        std::fs::write(&p, &body).unwrap();
        models::file_sha256(&p).unwrap()
    };

    let url = serve_once(Some(body.clone()));
    let dir = tempfile::tempdir().unwrap();
    let source = ModelSource {
        url,
        sha256: Some(expected),
    };

    let mut last = (0, None);
    let path = models::ensure_model(dir.path(), &source, false, &mut |done, total| {
        last = (done, total);
    })
    .unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), body);
    assert_eq!(last.0, body.len() as u64);
    assert_eq!(last.1, Some(body.len() as u64));
    assert!(models::list_models(dir.path())[0].installed());
}

#[test]
fn test_checksum_mismatch_leaves_nothing_behind() {
    let url = serve_once(Some(b"tampered".to_vec()));
    let dir = tempfile::tempdir().unwrap();
    let source = ModelSource {
        url,
        sha256: Some("00".repeat(32)),
    };

    let err = models::ensure_model(dir.path(), &source, false, &mut |_, _| {}).unwrap_err();
    assert!(err.to_string().contains("Checksum mismatch"));
    assert!(!models::model_path(dir.path()).exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_http_error_status() {
    let url = serve_once(None);
    let dir = tempfile::tempdir().unwrap();
    let source = ModelSource { url, sha256: None };

    let err = models::ensure_model(dir.path(), &source, false, &mut |_, _| {}).unwrap_err();
    assert!(err.to_string().contains("404"));
}

#[test]
fn test_truncated_body_leaves_nothing_behind() {
    let url = serve_raw(Some((1_000_000, b"only a few bytes".to_vec())));
    let dir = tempfile::tempdir().unwrap();
    let source = ModelSource { url, sha256: None };

    assert!(models::ensure_model(dir.path(), &source, false, &mut |_, _| {}).is_err());
    assert!(!models::model_path(dir.path()).exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
