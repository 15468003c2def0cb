use crate::modules::{handlers::ValidatedQuery, state::AppState};
use axum::{extract::Extension, Json};
use cp_dashboard_libs::{
    aggregator::{aggregate, collect_problems, ProblemFilter, SOURCE_FETCH_LIMIT},
    api::ProblemsResponse,
    ProblemQuery,
};
use std::sync::Arc;
use tokio::time::Instant;

/// Problems of the selected platforms, merged, filtered and paginated.
///
/// Platforms whose upstream fails are left out and listed in `unavailable`.
pub async fn search_problems(
    ValidatedQuery(params): ValidatedQuery<ProblemQuery>,
    Extension(state): Extension<Arc<AppState>>,
) -> Json<ProblemsResponse> {
    let start_process = Instant::now();

    let filter = ProblemFilter::from(&params);
    let collected =
        collect_problems(&state.problem_sources, filter.platform, SOURCE_FETCH_LIMIT).await;
    let page = aggregate(collected.problems, &filter);

    let time = Instant::now().duration_since(start_process).as_millis();
    tracing::info!(
        target: "querylog",
        "elapsed_time={} hits={} params={}",
        time, page.total, params.to_query_string()
    );

    Json(ProblemsResponse::new(page, collected.unavailable))
}
