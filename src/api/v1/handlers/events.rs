/*
 * Responsibility
 * - events CRUD + status handlers
 * - non-admins see and mutate only events they created
 */
use axum::{
    Json,
    extract::{Path, Query, State},
    response::Response,
};
use uuid::Uuid;

use crate::{
    api::v1::dto::{
        PageQuery,
        events::{
            CreateEventRequest, EventListQuery, EventResponse, EventStatus, SetEventStatusRequest,
            UpdateEventRequest,
        },
    },
    api::v1::envelope::ApiEnvelope,
    api::v1::extractors::{AuthCtx, AuthCtxExtractor},
    error::AppError,
    repos::event_repo::{self, EventFilter, EventUpdate, NewEvent},
    state::AppState,
};

pub async fn list_events(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Query(page): Query<PageQuery>,
    Query(query): Query<EventListQuery>,
) -> Result<Response, AppError> {
    let (page_no, page_size, offset) = page.resolve();

    let status = query.status.map(EventStatus::as_str);
    let category = query.category.map(|c| c.as_str());
    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let filter = EventFilter {
        // Admins see everything; everyone else only their own events.
        created_by: (!ctx.is_admin()).then_some(ctx.user_id),
        from_date: query.from_date,
        to_date: query.to_date,
        status,
        category,
        search,
    };

    let rows = event_repo::list(&state.db, &filter, page_size, offset).await?;
    let total = event_repo::count(&state.db, &filter).await?;

    let data: Vec<EventResponse> = rows.into_iter().map(Into::into).collect();

    Ok(ApiEnvelope::paginated(
        "Events retrieved successfully",
        data,
        page_no as u64,
        page_size as u64,
        total as u64,
    )
    .ok())
}

pub async fn create_event(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<CreateEventRequest>,
) -> Result<Response, AppError> {
    req.validate().map_err(AppError::validation)?;

    let event = NewEvent {
        title: req.title.trim(),
        category: req.category.as_str(),
        description: req.description.as_deref(),
        event_date: req.event_date,
        start_date_time: req.start_date_time,
        end_date_time: req.end_date_time,
        due_pay_date: req.due_pay_date,
        latitude: req.latitude,
        longitude: req.longitude,
        persons_count: req.persons_count,
        status: req.status.unwrap_or(EventStatus::Draft).as_str(),
        created_by: ctx.user_id,
    };

    let event_id = event_repo::create(&state.db, &event).await?;
    let row = event_repo::get(&state.db, event_id)
        .await?
        .ok_or(AppError::Internal)?;

    Ok(ApiEnvelope::success("Event created successfully", EventResponse::from(row)).created())
}

pub async fn get_event(
    State(state): State<AppState>,
    AuthCtxExtractor(_ctx): AuthCtxExtractor,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let row = event_repo::get(&state.db, event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Event"))?;

    Ok(ApiEnvelope::success("Event retrieved successfully", EventResponse::from(row)).ok())
}

pub async fn update_event(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(event_id): Path<Uuid>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Response, AppError> {
    req.validate().map_err(AppError::validation)?;
    require_creator_or_admin(&state, &ctx, event_id).await?;

    let changes = EventUpdate {
        title: req.title.as_deref().map(str::trim),
        category: req.category.map(|c| c.as_str()),
        description: req.description.as_ref().map(|d| d.as_deref()),
        event_date: req.event_date,
        start_date_time: req.start_date_time,
        end_date_time: req.end_date_time,
        due_pay_date: req.due_pay_date,
        latitude: req.latitude,
        longitude: req.longitude,
        persons_count: req.persons_count,
        status: req.status.map(EventStatus::as_str),
    };

    event_repo::update(&state.db, event_id, &changes)
        .await?
        .ok_or_else(|| AppError::not_found("Event"))?;

    let row = event_repo::get(&state.db, event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Event"))?;

    Ok(ApiEnvelope::success("Event updated successfully", EventResponse::from(row)).ok())
}

pub async fn delete_event(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    require_creator_or_admin(&state, &ctx, event_id).await?;

    let deleted = event_repo::soft_delete(&state.db, event_id).await?;
    if !deleted {
        return Err(AppError::not_found("Event"));
    }

    Ok(ApiEnvelope::message_only("Event deleted successfully").ok())
}

pub async fn set_event_status(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(event_id): Path<Uuid>,
    Json(req): Json<SetEventStatusRequest>,
) -> Result<Response, AppError> {
    require_creator_or_admin(&state, &ctx, event_id).await?;

    let updated = event_repo::set_status(&state.db, event_id, req.status.as_str()).await?;
    if !updated {
        return Err(AppError::not_found("Event"));
    }

    let row = event_repo::get(&state.db, event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Event"))?;

    Ok(ApiEnvelope::success("Event status updated successfully", EventResponse::from(row)).ok())
}

/// 404 for a missing event, 403 for someone else's.
async fn require_creator_or_admin(
    state: &AppState,
    ctx: &AuthCtx,
    event_id: Uuid,
) -> Result<(), AppError> {
    let row = event_repo::get(&state.db, event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Event"))?;

    if row.created_by != ctx.user_id && !ctx.is_admin() {
        return Err(AppError::Forbidden("Only the event creator or an admin can do this"));
    }

    Ok(())
}
