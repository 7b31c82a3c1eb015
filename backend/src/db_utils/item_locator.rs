//! Finds the storage host and path of an item by UDP broadcast.

use std::{
    net::{Ipv4Addr, SocketAddr},
    sync::LazyLock,
    time::Duration,
};

use anyhow::Context;
use async_trait::async_trait;
use regex::Regex;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

static LOCATOR_REPLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(ia\d+\.us\.archive\.org):(/\d+/items/(.*))$").expect("valid locator reply regex"));

const REPLY_ATTEMPTS: usize = 5;
const REPLY_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemLocation {
    pub host: String,
    pub path: String,
}

impl ItemLocation {
    pub fn url(&self) -> String {
        format!("http://{}{}", self.host, self.path)
    }
}

#[async_trait]
pub trait ItemLocator: Send + Sync {
    /// `None` when no node answered for this identifier.
    async fn locate(&self, identifier: &str) -> anyhow::Result<Option<ItemLocation>>;
}

/// Parses `host:/N/items/<id>`; replies about other items yield `None`.
pub fn parse_locator_reply(reply: &str, identifier: &str) -> Option<ItemLocation> {
    let captures = LOCATOR_REPLY.captures(reply.trim_end_matches(['\0', '\n']))?;
    if &captures[3] != identifier {
        return None;
    }
    Some(ItemLocation { host: captures[1].to_string(), path: captures[2].to_string() })
}

pub struct UdpItemLocator {
    port: u16,
}

impl UdpItemLocator {
    pub fn new(port: u16) -> Self {
        Self { port }
    }
}

#[async_trait]
impl ItemLocator for UdpItemLocator {
    async fn locate(&self, identifier: &str) -> anyhow::Result<Option<ItemLocation>> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await.context("failed to bind locator socket")?;
        socket.set_broadcast(true)?;
        let target = SocketAddr::from((Ipv4Addr::BROADCAST, self.port));
        socket.send_to(identifier.as_bytes(), target).await.context("failed to send locator broadcast")?;

        let mut buf = [0u8; 1024];
        for attempt in 0..REPLY_ATTEMPTS {
            let (len, from) = match tokio::time::timeout(REPLY_TIMEOUT, socket.recv_from(&mut buf)).await {
                Ok(received) => received?,
                Err(_) => {
                    warn!("item locator: no reply for {} after {:?}", identifier, REPLY_TIMEOUT);
                    return Ok(None);
                }
            };
            let reply = String::from_utf8_lossy(&buf[..len]);
            debug!("item locator: reply {} from {} (attempt {})", reply, from, attempt + 1);
            if let Some(location) = parse_locator_reply(&reply, identifier) {
                return Ok(Some(location));
            }
        }
        Ok(None)
    }
}
