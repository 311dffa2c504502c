use anyhow::{Context, Result};
use dashboard::{Dashboard, QueryClient, Symbol};
use models::ReportVariant;
use settings_loader::load_settings_or_default;
use std::env;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

const SETTLE_TIMEOUT: Duration = Duration::from_secs(30);

fn arg(flag: &str) -> Option<String> {
    env::args()
        .position(|a| a == flag)
        .and_then(|i| env::args().nth(i + 1))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dashboard=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings_path = arg("--settings").map(PathBuf::from);
    let settings = load_settings_or_default(settings_path.as_ref())?;

    let client = QueryClient::from_settings(&settings)?;
    tracing::info!(api = %client.base_url(), "loading dashboard");

    let local = tokio::task::LocalSet::new();
    local
        .run_until(async move {
            let dashboard = Dashboard::bootstrap(&settings, Rc::new(client)).await?;

            if let Some(raw) = arg("--symbol") {
                let symbol = Symbol::new(&raw).context("--symbol must not be blank")?;
                dashboard.state().set_symbol(symbol);
            }
            if let Some(raw) = arg("--slot") {
                let slot: u32 = raw.parse().with_context(|| format!("--slot '{raw}'"))?;
                dashboard.slider.select(slot);
            }
            if let Some(raw) = arg("--variant") {
                let variant = ReportVariant::parse(&raw)
                    .with_context(|| format!("--variant '{raw}' (balance, income, cash)"))?;
                dashboard.state().set_report_variant(variant);
            }

            tokio::time::timeout(SETTLE_TIMEOUT, dashboard.settled())
                .await
                .context("widgets did not settle")?;

            let snapshot = dashboard.snapshot()?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            Ok::<(), anyhow::Error>(())
        })
        .await
}
