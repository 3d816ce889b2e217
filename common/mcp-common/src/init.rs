//! Server startup helpers
//!
//! Every binary in the workspace starts the same way: load `.env`, install
//! tracing on stderr, build its server from config, then hand it to
//! [`serve_stdio`].

use rmcp::{transport::stdio, ServerHandler, ServiceExt};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging for MCP servers
///
/// Logs go to stderr because stdout carries the MCP protocol. `RUST_LOG`
/// refines the filter; the default is `info` for `crate_name`.
/// Set `LOG_FORMAT=json` for JSON lines.
pub fn init_tracing(crate_name: &str) -> anyhow::Result<()> {
    let directive = format!("{}=info", crate_name);
    let filter = EnvFilter::from_default_env()
        .add_directive(directive.parse()?)
        .add_directive("search_adapter=info".parse()?);

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .init();
    }

    Ok(())
}

/// Load a `.env` file into the process environment
///
/// Reads `path` when given, otherwise searches upward from the working
/// directory. Variables already set are left alone and a missing file is
/// not an error. Returns the file that was loaded, if any.
pub fn load_dotenv(path: Option<&Path>) -> Option<std::path::PathBuf> {
    match path {
        Some(path) => dotenvy::from_path(path).ok().map(|_| path.to_path_buf()),
        None => dotenvy::dotenv().ok(),
    }
}

/// Serve an MCP server over stdio until the client disconnects
pub async fn serve_stdio<S>(server: S) -> anyhow::Result<()>
where
    S: ServerHandler,
{
    let service = server.serve(stdio()).await?;

    tracing::info!("Server running, waiting for requests...");
    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_dotenv_missing_file_is_ignored() {
        let loaded = load_dotenv(Some(Path::new("/nonexistent/serp-tools/.env")));
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_dotenv_does_not_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "MCP_COMMON_DOTENV_KEPT=from-file").unwrap();
        writeln!(file, "MCP_COMMON_DOTENV_FRESH=fresh").unwrap();

        std::env::set_var("MCP_COMMON_DOTENV_KEPT", "from-env");
        let loaded = load_dotenv(Some(&path));

        assert_eq!(loaded.as_deref(), Some(path.as_path()));
        assert_eq!(std::env::var("MCP_COMMON_DOTENV_KEPT").unwrap(), "from-env");
        assert_eq!(std::env::var("MCP_COMMON_DOTENV_FRESH").unwrap(), "fresh");
    }
}
