use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use todo_app::parse_id;

use super::AppState;
use super::dto::{
    CreateTodoRequest, HealthResponse, ListParams, MetricsResponse, PageResponse, TodoResponse,
    UpdateTodoRequest,
};
use super::error::ApiError;

type ApiResult<T> = Result<T, ApiError>;

pub async fn list_todos(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<PageResponse<TodoResponse>>> {
    let Query(params) = params?;
    let query = params.into_query(state.pagination)?;
    let page = state.service.list(&query)?;
    Ok(Json(page.into()))
}

pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TodoResponse>> {
    let todo = state.service.get(parse_id(&id)?)?;
    Ok(Json(todo.into()))
}

pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TodoResponse>)> {
    let Json(request) = payload?;
    let todo = state.service.create(request.into())?;
    Ok((StatusCode::CREATED, Json(todo.into())))
}

pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> ApiResult<Json<TodoResponse>> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;
    let todo = state.service.update(id, request.into())?;
    Ok(Json(todo.into()))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.service.delete(parse_id(&id)?)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_done(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TodoResponse>> {
    let todo = state.service.mark_done(parse_id(&id)?)?;
    Ok(Json(todo.into()))
}

pub async fn mark_undone(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TodoResponse>> {
    let todo = state.service.mark_undone(parse_id(&id)?)?;
    Ok(Json(todo.into()))
}

pub async fn metrics(State(state): State<AppState>) -> ApiResult<Json<MetricsResponse>> {
    Ok(Json(state.service.metrics()?.into()))
}

pub async fn health(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok",
        todos: state.service.count()?,
    }))
}
