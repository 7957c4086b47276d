//! TCP front end: one JSON request per line in, one JSON response per line out.

use crate::protocol::{Request, Response};
use crate::service::GameService;
use log::{debug, error, info, warn};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

pub struct Server {
    listener: TcpListener,
    service: Arc<GameService>,
    default_session_id: Arc<str>,
}

impl Server {
    pub async fn bind(
        addr: &str,
        service: Arc<GameService>,
        default_session_id: &str,
    ) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);

        Ok(Server {
            listener,
            service,
            default_session_id: Arc::from(default_session_id),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until the listener fails.
    pub async fn run(self) -> io::Result<()> {
        loop {
            let (stream, addr) = self.listener.accept().await?;
            info!("Client connected from {}", addr);

            let service = Arc::clone(&self.service);
            let default_session_id = Arc::clone(&self.default_session_id);
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, service, default_session_id).await {
                    error!("Connection {} failed: {}", addr, e);
                }
                info!("Client {} disconnected", addr);
            });
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    service: Arc<GameService>,
    default_session_id: Arc<str>,
) -> io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = match Request::parse(&line) {
            Ok(request) => respond(&service, request, &default_session_id).await,
            Err(e) => {
                warn!("Bad request {:?}: {}", line, e);
                Response::error(e.to_string())
            }
        };

        let out = response.to_line()?;
        debug!("-> {}", out.trim_end());
        writer.write_all(out.as_bytes()).await?;
    }

    Ok(())
}

/// Word reloads hit the database, so they run on the blocking pool.
async fn respond(service: &Arc<GameService>, request: Request, default_session_id: &Arc<str>) -> Response {
    if !request.does_io() {
        return service.dispatch(&request, default_session_id);
    }

    let service = Arc::clone(service);
    let default_session_id = Arc::clone(default_session_id);
    match tokio::task::spawn_blocking(move || service.dispatch(&request, &default_session_id)).await {
        Ok(response) => response,
        Err(e) => {
            error!("Word reload task failed: {}", e);
            Response::error(e.to_string())
        }
    }
}
