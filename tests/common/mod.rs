//! Shared utilities for explorer integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use chain_analytics::cli::Explorers;
use chain_analytics::config::{BitcoinConfig, EthereumConfig};
use chain_analytics::explorer::{BitcoinExplorer, EthereumExplorer};

/// Canned response served when the request target contains `needle`.
#[derive(Clone)]
pub struct Route {
    pub needle: &'static str,
    pub status: u16,
    pub body: String,
}

#[allow(dead_code)]
impl Route {
    pub fn ok(needle: &'static str, body: impl Into<String>) -> Self {
        Self { needle, status: 200, body: body.into() }
    }

    pub fn status(needle: &'static str, status: u16, body: impl Into<String>) -> Self {
        Self { needle, status, body: body.into() }
    }
}

/// A mock explorer that serves fixed responses and records every request
/// target (path and query) in arrival order.
pub struct MockExplorer {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl MockExplorer {
    /// Start on an ephemeral port. The first matching route wins; unmatched
    /// requests get a 404.
    pub async fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let routes = Arc::new(routes);

        let log = requests.clone();
        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((socket, _)) => {
                        let routes = routes.clone();
                        let log = log.clone();
                        tokio::spawn(async move {
                            let (read_half, mut write_half) = socket.into_split();
                            let mut reader = BufReader::new(read_half);

                            let mut request_line = String::new();
                            if reader.read_line(&mut request_line).await.is_err() {
                                return;
                            }
                            // Drain headers; GET requests carry no body.
                            loop {
                                let mut line = String::new();
                                match reader.read_line(&mut line).await {
                                    Ok(0) => break,
                                    Ok(_) if line == "\r\n" || line == "\n" => break,
                                    Ok(_) => continue,
                                    Err(_) => return,
                                }
                            }

                            let target = request_line
                                .split_whitespace()
                                .nth(1)
                                .unwrap_or_default()
                                .to_string();
                            log.lock().unwrap().push(target.clone());

                            let (status, body) = routes
                                .iter()
                                .find(|r| target.contains(r.needle))
                                .map(|r| (r.status, r.body.clone()))
                                .unwrap_or((404, "Not Found".to_string()));

                            let status_text = match status {
                                200 => "200 OK",
                                400 => "400 Bad Request",
                                404 => "404 Not Found",
                                429 => "429 Too Many Requests",
                                500 => "500 Internal Server Error",
                                502 => "502 Bad Gateway",
                                503 => "503 Service Unavailable",
                                _ => "200 OK",
                            };
                            let response = format!(
                                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                                status_text,
                                body.len(),
                                body
                            );
                            let _ = write_half.write_all(response.as_bytes()).await;
                            let _ = write_half.shutdown().await;
                        });
                    }
                    Err(_) => break,
                }
            }
        });

        Self { addr, requests }
    }

    /// Request targets received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn bitcoin(&self) -> BitcoinExplorer {
        BitcoinExplorer::new(&BitcoinConfig {
            base_url: format!("http://{}", self.addr),
            timeout_secs: 5,
        })
        .unwrap()
    }

    pub fn ethereum(&self) -> EthereumExplorer {
        self.ethereum_with(EthereumConfig::default())
    }

    /// Ethereum client at `/api` on this server, keeping other settings.
    pub fn ethereum_with(&self, config: EthereumConfig) -> EthereumExplorer {
        let config = EthereumConfig {
            base_url: format!("http://{}/api", self.addr),
            timeout_secs: 5,
            ..config
        };
        EthereumExplorer::new(&config, "TESTKEY").unwrap()
    }

    /// Both clients pointed at this server.
    pub fn explorers(&self) -> Explorers {
        Explorers {
            bitcoin: self.bitcoin(),
            ethereum: self.ethereum(),
        }
    }
}
