use crate::modules::state::AppState;
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::{Args, Subcommand};
use cp_dashboard_libs::{
    aggregator::{aggregate, collect_problems, ProblemFilter, SOURCE_FETCH_LIMIT},
    api::{ContestsResponse, ProblemsResponse},
    contests::map_contests,
    models::{Platform, ProblemPlatform},
    ContestQuery, ContestWindow, ProblemQuery,
};
use serde::Serialize;
use validator::Validate;

#[derive(Debug, Args)]
pub struct FetchArgs {
    #[command(subcommand)]
    target: FetchTarget,
}

#[derive(Debug, Subcommand)]
enum FetchTarget {
    /// Profile of one user on one platform.
    Profile { platform: Platform, username: String },
    /// Unified problem list.
    Problems(ProblemArgs),
    /// Contest listing from CLIST.
    Contests(ContestArgs),
}

#[derive(Debug, Args)]
struct ProblemArgs {
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    platform: Option<ProblemPlatform>,
    #[arg(long)]
    difficulty: Option<String>,
    /// Comma-separated tags.
    #[arg(long)]
    tags: Option<String>,
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
}

impl From<ProblemArgs> for ProblemQuery {
    fn from(args: ProblemArgs) -> Self {
        ProblemQuery {
            search: args.search,
            platform: args.platform,
            difficulty: args.difficulty,
            tags: args.tags,
            page: args.page,
            limit: args.limit,
        }
    }
}

#[derive(Debug, Args)]
struct ContestArgs {
    #[arg(long)]
    filter: Option<ContestWindow>,
    /// Comma-separated hostnames.
    #[arg(long)]
    resources: Option<String>,
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
}

impl From<ContestArgs> for ContestQuery {
    fn from(args: ContestArgs) -> Self {
        ContestQuery {
            filter: args.filter,
            resources: args.resources,
            page: args.page,
            limit: args.limit,
        }
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("couldn't serialize result")?;
    println!("{}", json);
    Ok(())
}

pub async fn run(args: FetchArgs) -> Result<()> {
    let state = AppState::from_env().context("couldn't initialize upstream clients")?;

    match args.target {
        FetchTarget::Profile { platform, username } => {
            let fetcher = state
                .profiles
                .get(&platform)
                .ok_or(anyhow!("no fetcher registered for {}", platform))?;
            let profile = fetcher
                .fetch_profile(&username)
                .await
                .with_context(|| format!("failed to fetch {} profile of {}", platform, username))?;
            print_json(&profile)
        }
        FetchTarget::Problems(args) => {
            let query = ProblemQuery::from(args);
            query.validate().context("invalid problem query")?;

            let filter = ProblemFilter::from(&query);
            let collected =
                collect_problems(&state.problem_sources, filter.platform, SOURCE_FETCH_LIMIT)
                    .await;
            for platform in collected.unavailable.iter() {
                tracing::warn!("{} problems are unavailable", platform);
            }
            let page = aggregate(collected.problems, &filter);
            print_json(&ProblemsResponse::new(page, collected.unavailable))
        }
        FetchTarget::Contests(args) => {
            let query = ContestQuery::from(args);
            query.validate().context("invalid contest query")?;

            let now = Utc::now();
            let page = state
                .contests
                .fetch_contests(&query, now)
                .await
                .context("failed to fetch contests")?;
            let (contests, meta) = map_contests(page, &query, now);
            print_json(&ContestsResponse { contests, meta })
        }
    }
}
