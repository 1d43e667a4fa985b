//! Mock native messaging host for tests.

use std::path::Path;

use serde_json::{Deserializer, Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::task::JoinHandle;

use crate::identifiers::SocketId;

use super::socket::socket_path;

/// Binds `beval.socket.<id>` inside `dir`.
pub(crate) fn bind(dir: &Path, id: &str) -> UnixListener {
    let id = SocketId::new(id).expect("valid socket id");
    UnixListener::bind(socket_path(dir, &id)).expect("bind mock socket")
}

/// Reads one undelimited JSON request, or `None` at end of stream.
pub(crate) async fn read_request(stream: &mut UnixStream, buf: &mut Vec<u8>) -> Option<Value> {
    let mut chunk = [0u8; 1024];
    loop {
        let parsed = {
            let mut values = Deserializer::from_slice(&buf[..]).into_iter::<Value>();
            match values.next() {
                Some(Ok(value)) => Some((value, values.byte_offset())),
                Some(Err(e)) if !e.is_eof() => panic!("malformed request: {e}"),
                _ => None,
            }
        };

        if let Some((value, used)) = parsed {
            buf.drain(..used);
            return Some(value);
        }

        let n = stream.read(&mut chunk).await.expect("read request");
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

/// Serves one connection, answering every request with `reply(request)`.
pub(crate) fn serve<F>(listener: UnixListener, reply: F) -> JoinHandle<Vec<Value>>
where
    F: Fn(&Value) -> Value + Send + 'static,
{
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let mut buf = Vec::new();
        let mut seen = Vec::new();

        while let Some(request) = read_request(&mut stream, &mut buf).await {
            let line = format!("{}\n", reply(&request));
            stream.write_all(line.as_bytes()).await.expect("write reply");
            seen.push(request);
        }

        seen
    })
}

/// Serves one connection, answering `{"echo": <request>}`.
pub(crate) fn echo(listener: UnixListener) -> JoinHandle<Vec<Value>> {
    serve(listener, |request| json!({ "echo": request }))
}
