/// matchday — Football data
/// Leagues, teams, players and matches from a live source, degrading to the
/// embedded sample dataset (or to nothing) when the live source fails.
///
/// Sources:
///   RemoteSource       → one JSON document `{ leagues, teams, players, matches }`
///   FootballDataSource → football-data.org v4 standings, normalized
///   StaticSource       → data/fallback.json, compiled in

mod fallback;
mod football_data_org;
mod resolver;
mod source;

pub use fallback::StaticSource;
pub use football_data_org::{
    competition_code, team_slug, FootballDataSource, DEFAULT_BASE_URL, SUPPORTED_LEAGUES,
};
pub use resolver::{FallbackPolicy, FootballData};
pub use source::{build_client, DataSource, HttpStatus, RemoteSource, DEFAULT_TIMEOUT_SECS};

/// One-shot HTTP server for source tests: answers the first connection with a
/// canned response and hands back the raw request it read.
#[cfg(test)]
pub(crate) mod test_server {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    pub async fn serve_once(status: &str, body: &str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let n = stream.read(&mut buf).await.unwrap_or(0);
            let _ = tx.send(String::from_utf8_lossy(&buf[..n]).to_string());
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        });

        (format!("http://{addr}"), rx)
    }

    /// URL of a port nothing listens on.
    pub async fn refused_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }
}
