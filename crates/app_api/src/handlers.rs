use portfolio_app::Result;
use portfolio_core::ProjectReactions;

use crate::{
    AnalyticsSummaryResponse, AppContext, HealthResponse, ReactionChangeResponse,
    ReactionsSummaryResponse, RecordViewRequest, RecordViewResponse, ViewCountResponse,
};

pub fn view_count(ctx: &AppContext, project_id: &str) -> Result<ViewCountResponse> {
    let counts = ctx.app_state.services.analytics.view_counts(project_id)?;
    Ok(ViewCountResponse {
        project_id: project_id.to_string(),
        view_count: counts.view_count,
        unique_visitors: counts.unique_visitors,
    })
}

pub fn record_view(
    ctx: &AppContext,
    project_id: &str,
    req: RecordViewRequest,
) -> Result<RecordViewResponse> {
    let counts = ctx.app_state.services.analytics.record_view(
        project_id,
        &req.client_identifier,
        &req.user_agent,
        &req.referrer,
    )?;
    Ok(RecordViewResponse {
        success: true,
        view_count: counts.view_count,
        unique_visitors: counts.unique_visitors,
    })
}

pub fn analytics_summary(ctx: &AppContext) -> Result<AnalyticsSummaryResponse> {
    let analytics = ctx.app_state.services.analytics.summary()?;
    Ok(AnalyticsSummaryResponse { analytics })
}

pub fn reactions(ctx: &AppContext, project_id: &str) -> Result<ProjectReactions> {
    ctx.app_state.services.reactions.list(project_id)
}

pub fn add_reaction(
    ctx: &AppContext,
    project_id: &str,
    reaction_type: &str,
) -> Result<ReactionChangeResponse> {
    let (reaction, new_count) = ctx
        .app_state
        .services
        .reactions
        .add(project_id, reaction_type)?;
    Ok(ReactionChangeResponse {
        success: true,
        project_id: project_id.to_string(),
        reaction_type: reaction.to_string(),
        new_count,
    })
}

pub fn remove_reaction(
    ctx: &AppContext,
    project_id: &str,
    reaction_type: &str,
) -> Result<ReactionChangeResponse> {
    let (reaction, new_count) = ctx
        .app_state
        .services
        .reactions
        .remove(project_id, reaction_type)?;
    Ok(ReactionChangeResponse {
        success: true,
        project_id: project_id.to_string(),
        reaction_type: reaction.to_string(),
        new_count,
    })
}

pub fn reactions_summary(ctx: &AppContext) -> Result<ReactionsSummaryResponse> {
    let reactions_summary = ctx.app_state.services.reactions.summary()?;
    Ok(ReactionsSummaryResponse { reactions_summary })
}

pub fn health(ctx: &AppContext) -> Result<HealthResponse> {
    ctx.app_state.open_db()?;
    Ok(HealthResponse { status: "ok" })
}
