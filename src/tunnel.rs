use anyhow::Context;
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct TunnelList {
    tunnels: Vec<Tunnel>,
}

#[derive(Debug, Deserialize)]
struct Tunnel {
    public_url: String,
    proto: String,
    config: TunnelConfig,
}

#[derive(Debug, Deserialize)]
struct TunnelConfig {
    addr: String,
}

/// Ask the local ngrok agent for the public URL forwarding to our port.
///
/// This is purely informational: if the agent isn't running, has no matching
/// tunnel, or can't be reached, the app keeps serving on the local endpoint.
pub async fn get_public_url(port: u16) -> Option<String> {
    match fetch_public_url(port).await {
        Ok(Some(url)) => {
            debug!("Found ngrok tunnel for port {}: {}", port, url);
            Some(url)
        }
        Ok(None) => {
            warn!("No ngrok tunnel forwards to port {}, local endpoint only", port);
            None
        }
        Err(err) => {
            warn!("ngrok tunnel not available, local endpoint only: {:#}", err);
            None
        }
    }
}

async fn fetch_public_url(port: u16) -> anyhow::Result<Option<String>> {
    let agent_api = std::env::var("NGROK_API_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:4040".to_string());

    let resp = reqwest::get(format!("{}/api/tunnels", agent_api))
        .await
        .context("Failed to reach the ngrok agent API")?;
    let tunnel_list: TunnelList = resp
        .json()
        .await
        .context("Failed to parse the ngrok agent response")?;

    let port_suffix = format!(":{}", port);
    let public_url = tunnel_list
        .tunnels
        .into_iter()
        .find(|tunnel| tunnel.proto == "https" && tunnel.config.addr.ends_with(&port_suffix))
        .map(|tunnel| tunnel.public_url);

    Ok(public_url)
}
