//! Existence checker fan-out against a scripted multi-connection server

use nntp_probe::{ServerEntry, check_existence};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn read_line(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        let n = stream.read(&mut byte).await.unwrap();
        if n == 0 {
            break;
        }
        buf.push(byte[0]);
        if buf.ends_with(b"\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Server that answers STAT with 223 when the id contains "have" and 430
/// otherwise, for any number of connections.
async fn spawn_stat_server(connections: Arc<AtomicUsize>) -> SocketAddr {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let (mut s, _) = listener.accept().await.unwrap();
            connections.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                s.write_all(b"200 ready\r\n").await.unwrap();
                loop {
                    let line = read_line(&mut s).await;
                    if line.is_empty() || line == "QUIT\r\n" {
                        if !line.is_empty() {
                            s.write_all(b"205 bye\r\n").await.unwrap();
                        }
                        break;
                    }
                    let id = line
                        .trim_end()
                        .strip_prefix("STAT ")
                        .unwrap_or_else(|| panic!("unexpected command: {line:?}"));
                    if id.contains("have") {
                        s.write_all(format!("223 0 {id}\r\n").as_bytes())
                            .await
                            .unwrap();
                    } else {
                        s.write_all(b"430 no such article\r\n").await.unwrap();
                    }
                }
            });
        }
    });
    addr
}

fn ids(spec: &[(&str, usize)]) -> Vec<String> {
    let mut out = Vec::new();
    for (prefix, count) in spec {
        for i in 0..*count {
            out.push(format!("<{prefix}{i}@example>"));
        }
    }
    out
}

#[tokio::test]
async fn fan_out_merges_all_chunks() {
    let connections = Arc::new(AtomicUsize::new(0));
    let addr = spawn_stat_server(Arc::clone(&connections)).await;

    // 17 ids over 3 connections: chunks of 5, 5, and 7
    let input = ids(&[("have", 9), ("gone", 8)]);
    let mut entry = ServerEntry::new(addr.ip().to_string(), addr.port());
    entry.max_cons = Some(3);

    let report = check_existence(Arc::new(entry), input.clone()).await.unwrap();

    assert_eq!(connections.load(Ordering::SeqCst), 3);
    assert_eq!(report.found.len(), 9);
    assert_eq!(report.not_found.len(), 8);
    assert!(report.found.iter().all(|id| id.contains("have")));
    assert!(report.not_found.iter().all(|id| id.contains("gone")));

    // Union of found and not-found is exactly the input, no duplicates
    let merged: HashSet<&String> = report.found.iter().chain(&report.not_found).collect();
    let expected: HashSet<&String> = input.iter().collect();
    assert_eq!(report.total(), input.len());
    assert_eq!(merged, expected);
}

#[tokio::test]
async fn single_connection_default() {
    let connections = Arc::new(AtomicUsize::new(0));
    let addr = spawn_stat_server(Arc::clone(&connections)).await;

    let input = ids(&[("have", 2), ("gone", 1)]);
    let entry = ServerEntry::new(addr.ip().to_string(), addr.port());

    let report = check_existence(Arc::new(entry), input).await.unwrap();

    assert_eq!(connections.load(Ordering::SeqCst), 1);
    assert_eq!(report.found.len(), 2);
    assert_eq!(report.not_found.len(), 1);
}

#[tokio::test]
async fn empty_input_yields_empty_report() {
    let connections = Arc::new(AtomicUsize::new(0));
    let addr = spawn_stat_server(Arc::clone(&connections)).await;

    let mut entry = ServerEntry::new(addr.ip().to_string(), addr.port());
    entry.max_cons = Some(4);

    let report = check_existence(Arc::new(entry), Vec::new()).await.unwrap();
    assert_eq!(report.total(), 0);
    // No connections for empty chunks
    assert_eq!(connections.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn connect_failure_surfaces_after_all_chunks() {
    // Nothing listens on this port
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut entry = ServerEntry::new(addr.ip().to_string(), addr.port());
    entry.max_cons = Some(2);

    let result = check_existence(Arc::new(entry), ids(&[("have", 4)])).await;
    assert!(result.is_err());
}
