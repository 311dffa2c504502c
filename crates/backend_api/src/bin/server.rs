use anyhow::Context;
use backend_api::{init_tracing, run_server, SqliteFinanceRepository};
use std::sync::Arc;
use std::{env, path::PathBuf};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real environment variables win
    dotenvy::dotenv().ok();
    init_tracing();

    // Environment variables with sane defaults
    let database_path_raw =
        env::var("DATABASE_PATH").unwrap_or_else(|_| "data/finance_data.db".to_string());
    let static_dir_raw = env::var("STATIC_DIR").unwrap_or_else(|_| "frontend/public".to_string());
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .unwrap_or(3000);

    // Resolve against workspace root first (the data directory lives at workspace level), then crate root.
    let crate_root = env::current_dir().context("reading current directory")?;
    let workspace_root = find_workspace_root().unwrap_or_else(|| crate_root.clone());
    let database_path =
        resolve_with_fallback(&database_path_raw, &[&workspace_root, &crate_root]);
    let static_dir = resolve_with_fallback(&static_dir_raw, &[&workspace_root, &crate_root]);

    tracing::info!(
        crate_root = %crate_root.display(),
        workspace_root = %workspace_root.display(),
        database = %database_path.display(),
        static_dir = %static_dir.display(),
        "Finance Dashboard API Server"
    );

    // Pre-flight checks
    if !database_path.exists() {
        anyhow::bail!(
            "database not found at {} (set DATABASE_PATH to an absolute path)",
            database_path.display()
        );
    }
    let static_dir = if static_dir.is_dir() {
        Some(static_dir)
    } else {
        tracing::warn!(
            static_dir = %static_dir.display(),
            "static directory not found; serving data endpoints only"
        );
        None
    };

    let repo = Arc::new(
        SqliteFinanceRepository::open(&database_path)
            .with_context(|| format!("opening {}", database_path.display()))?,
    );

    run_server(repo, static_dir, &host, port).await
}

/// Find the Cargo workspace root by traversing up until a Cargo.toml that contains a [workspace] section.
fn find_workspace_root() -> Option<PathBuf> {
    let mut dir = env::current_dir().ok()?;
    for _ in 0..10 {
        // safety limit
        let candidate = dir.join("Cargo.toml");
        if candidate.exists() {
            if let Ok(content) = std::fs::read_to_string(&candidate) {
                if content.contains("[workspace]") {
                    return Some(dir.clone());
                }
            }
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Resolve a raw path string against a list of base directories, returning the first existing match, or the first constructed path.
fn resolve_with_fallback(raw: &str, bases: &[&PathBuf]) -> PathBuf {
    let input = PathBuf::from(raw);
    if input.is_absolute() {
        return input;
    }
    for base in bases {
        let candidate = base.join(&input);
        if candidate.exists() {
            return candidate;
        }
    }
    match bases.first() {
        Some(base) => base.join(input),
        None => input,
    }
}
