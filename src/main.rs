//! Lead Insights CLI
//!
//! Scores leads from JSON files or the CRM backend, prints ranked follow-up
//! recommendations and runs the reminder dispatcher.
//!
//! Usage:
//!   lead-insights analyze <lead.json> [calls.json]
//!   lead-insights fetch <lead-id>
//!   lead-insights rank
//!   lead-insights reminders

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("lead_insights=info".parse()?))
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = cli::parse_args(&args)?;
    let config = lead_insights::config::AppConfig::from_env()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(cli::run(command, config))
}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use anyhow::{bail, Context};
    use chrono::Utc;

    use lead_insights::analytics::LeadAnalyticsEngine;
    use lead_insights::api::{leads, meetings, ApiClient};
    use lead_insights::config::{AppConfig, NotifierKind};
    use lead_insights::models::{CallLog, Lead};
    use lead_insights::reminders::{
        ApiNotifier, LogNotifier, Notifier, ReminderConfig, ReminderService, SystemClock,
    };

    #[derive(Debug, PartialEq)]
    pub enum Command {
        Analyze { lead: PathBuf, calls: Option<PathBuf> },
        Fetch { lead_id: i64 },
        Rank,
        Reminders,
    }

    pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
        match args.first().map(String::as_str) {
            Some("analyze") => {
                let lead = args.get(1).context("analyze requires a lead JSON file")?;
                Ok(Command::Analyze {
                    lead: PathBuf::from(lead),
                    calls: args.get(2).map(PathBuf::from),
                })
            }
            Some("fetch") => {
                let id = args.get(1).context("fetch requires a lead id")?;
                let lead_id = id
                    .parse()
                    .with_context(|| format!("invalid lead id: {}", id))?;
                Ok(Command::Fetch { lead_id })
            }
            Some("rank") => Ok(Command::Rank),
            Some("reminders") => Ok(Command::Reminders),
            Some(other) => bail!("unknown command: {}", other),
            None => bail!("usage: lead-insights <analyze|fetch|rank|reminders> [args]"),
        }
    }

    fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }

    fn api_client(config: &AppConfig) -> anyhow::Result<ApiClient> {
        let client = ApiClient::new(&config.api_url)?;
        client.set_token(config.api_token.clone());
        Ok(client)
    }

    pub async fn run(command: Command, config: AppConfig) -> anyhow::Result<()> {
        let engine = LeadAnalyticsEngine::new(config.scoring.clone())?;

        match command {
            Command::Analyze { lead, calls } => {
                let lead: Lead = read_json(&lead)?;
                let calls: Vec<CallLog> = match calls {
                    Some(path) => read_json(&path)?,
                    None => Vec::new(),
                };
                let recommendation = engine.recommend(&lead, &calls, Utc::now());
                println!("{}", serde_json::to_string_pretty(&recommendation)?);
            }
            Command::Fetch { lead_id } => {
                let client = api_client(&config)?;
                let lead = leads::get_lead(&client, lead_id).await?;
                let calls = leads::get_call_logs(&client, lead_id).await?;
                let recommendation = engine.recommend(&lead, &calls, Utc::now());
                println!("{}", serde_json::to_string_pretty(&recommendation)?);
            }
            Command::Rank => {
                let client = api_client(&config)?;
                let leads = leads::get_leads_with_calls(&client).await?;
                let ranked = engine.rank(&leads, Utc::now());
                println!("{}", serde_json::to_string_pretty(&ranked)?);
            }
            Command::Reminders => {
                let client = api_client(&config)?;
                match config.notifier {
                    NotifierKind::Log => run_reminders(&client, &engine, &config, LogNotifier).await?,
                    NotifierKind::Api => {
                        let notifier = ApiNotifier::new(client.clone());
                        run_reminders(&client, &engine, &config, notifier).await?
                    }
                }
            }
        }

        Ok(())
    }

    async fn run_reminders<N: Notifier + 'static>(
        client: &ApiClient,
        engine: &LeadAnalyticsEngine,
        config: &AppConfig,
        notifier: N,
    ) -> anyhow::Result<()> {
        let service = Arc::new(ReminderService::new(ReminderConfig::from(config), SystemClock, notifier));
        let now = Utc::now();

        for (lead, calls) in leads::get_leads_with_calls(client).await? {
            if lead.stage.is_closed() {
                continue;
            }
            let analytics = engine.analyze(&lead, &calls, now);
            service.schedule_follow_up(&lead, &analytics).await;
        }

        for meeting in meetings::get_upcoming_meetings(client).await? {
            service.schedule_meeting(&meeting).await;
        }

        tracing::info!("{} reminders pending", service.pending().await.len());

        let runner = {
            let service = service.clone();
            tokio::spawn(async move { service.run().await })
        };

        tokio::signal::ctrl_c().await?;
        tracing::info!("Shutting down reminder dispatcher");
        service.shutdown().await;
        runner.await?;

        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn args(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }

        #[test]
        fn test_parse_analyze() {
            let command = parse_args(&args(&["analyze", "lead.json", "calls.json"])).unwrap();
            assert_eq!(
                command,
                Command::Analyze {
                    lead: PathBuf::from("lead.json"),
                    calls: Some(PathBuf::from("calls.json")),
                }
            );
        }

        #[test]
        fn test_parse_fetch_requires_numeric_id() {
            assert_eq!(parse_args(&args(&["fetch", "42"])).unwrap(), Command::Fetch { lead_id: 42 });
            assert!(parse_args(&args(&["fetch", "abc"])).is_err());
            assert!(parse_args(&args(&["fetch"])).is_err());
        }

        #[test]
        fn test_parse_unknown_command() {
            assert!(parse_args(&args(&["export"])).is_err());
            assert!(parse_args(&[]).is_err());
        }
    }
}
