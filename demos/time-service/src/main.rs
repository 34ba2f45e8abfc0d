//! Demo server exposing a few tools, with optional catalog registration.
//!
//! Run it, then list and invoke tools over HTTP:
//!
//! ```text
//! curl http://127.0.0.1:8082/mcp/tools
//! curl -X POST http://127.0.0.1:8082/mcp/tools/echo_message/invoke \
//!      -d '{"arguments":{"message":"hi"}}'
//! ```
//!
//! Set `MCP_CATALOG_ADDR` (and optionally `MCP_CATALOG_USER` /
//! `MCP_CATALOG_PASSWORD` / `MCP_CATALOG_NAMESPACE`) to publish the server
//! to a catalog console.

use std::env;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use mcp_discovery::{CatalogClient, CatalogConfig, RegistrationConfig, RegistrationController};
use mcp_host::McpServer;
use mcp_primitives::Protocol;
use mcp_scanner::{ServiceMember, ServiceMethod, ToolService};
use tracing::{info, warn};

/// Tools exposed through tagged members.
struct DirectoryService {
    users: Vec<&'static str>,
}

impl ToolService for DirectoryService {
    fn members(&self) -> Vec<ServiceMember> {
        let users = self.users.clone();
        vec![
            ServiceMember::new("GetTime", current_time)
                .tag("tool;name=get_current_time;description=Returns the current server time"),
            ServiceMember::new("Search", move |keyword: String, limit: i64| {
                let mut hits: Vec<String> = users
                    .iter()
                    .filter(|user| keyword.is_empty() || **user == keyword)
                    .map(|user| (*user).to_owned())
                    .collect();
                if limit > 0 {
                    hits.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
                }
                hits
            })
            .tag("tool;name=search_users;description=Search users by keyword;paramNames=keyword,limit"),
            ServiceMember::new("Echo", |message: String| format!("Echo: {message}"))
                .tag("tool;name=echo_message;description=Echo a message;paramNames=message"),
        ]
    }
}

/// Legacy service relying on the method-scan fallback.
struct TimeService;

impl ToolService for TimeService {
    fn methods(&self) -> Vec<ServiceMethod> {
        vec![
            ServiceMethod::new("GetTimestamp", || {
                SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(0))
                    .unwrap_or(0)
            }),
        ]
    }
}

fn current_time() -> String {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);
    format!("unix epoch seconds: {seconds}")
}

fn make_sequence(count: i64) -> Vec<i64> {
    (1..=count.max(0)).collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let mut server = McpServer::builder("advanced-mcp-service")
        .group("DEFAULT_GROUP")
        .address("127.0.0.1", 8082)
        .protocol(Protocol::Sse)
        .metadata("version", "2.0.0")
        .metadata("type", "advanced")
        .build()?;

    let directory = DirectoryService {
        users: vec!["alice", "bob", "charlie", "david", "eve"],
    };
    server.register_service(&directory)?;
    server.register_service(&TimeService)?;
    server.register_tool(make_sequence)?;

    server.start()?;

    info!(
        service = server.identity().name(),
        tools = server.registry().len(),
        "server initialized"
    );
    for (position, descriptor) in server.registry().list().iter().enumerate() {
        info!(
            "{}. {} - {}",
            position + 1,
            descriptor.name(),
            descriptor.description()
        );
    }

    // Publish to the catalog console when one is configured.
    let mut registration = match env::var("MCP_CATALOG_ADDR") {
        Ok(addr) if !addr.is_empty() => {
            let mut config = CatalogConfig::new(addr);
            if let (Ok(user), Ok(password)) =
                (env::var("MCP_CATALOG_USER"), env::var("MCP_CATALOG_PASSWORD"))
            {
                config = config.with_auth(user, password);
            }
            if let Ok(namespace) = env::var("MCP_CATALOG_NAMESPACE") {
                config = config.with_namespace(namespace);
            }

            match CatalogClient::new(config) {
                Ok(client) => {
                    let mut controller = RegistrationController::new(
                        Arc::new(client),
                        server.snapshot(),
                        RegistrationConfig::default(),
                    );
                    controller.start()?;
                    Some(controller)
                }
                Err(err) => {
                    warn!(%err, "catalog client unavailable; continuing unregistered");
                    None
                }
            }
        }
        _ => None,
    };

    if let Some(addr) = server.bound_addr() {
        info!("endpoint: http://{addr}/mcp");
    }
    info!("press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;
    info!("shutting down");

    if let Some(controller) = registration.as_mut() {
        controller.shutdown().await;
    }
    server.stop().await?;

    info!("server stopped gracefully");
    Ok(())
}
