//! Wire representations of requests and responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use todo_app::config::PaginationConfig;
use todo_app::{CreateTodoInput, DueDatePatch, UpdateTodoInput};
use todo_core::{
    CompletionMetrics, Page, PageRequest, Priority, SortDirection, SortSpec, Todo, TodoFilter,
    TodoQuery,
};

use super::error::ApiError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    pub id: String,
    pub text: String,
    pub priority: Priority,
    #[serde(with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    pub done: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub done_date: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub creation_date: OffsetDateTime,
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id().to_string(),
            text: todo.text.as_str().to_owned(),
            priority: todo.priority,
            due_date: todo.due_date,
            done: todo.is_done(),
            done_date: todo.done_at(),
            creation_date: todo.created_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub total_elements: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub size: usize,
}

impl From<Page<Todo>> for PageResponse<TodoResponse> {
    fn from(page: Page<Todo>) -> Self {
        let total_pages = page.total_pages();
        let page = page.map(TodoResponse::from);
        Self {
            content: page.items,
            total_elements: page.total,
            total_pages,
            current_page: page.page,
            size: page.size,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    pub average_time_to_complete: f64,
    pub average_by_priority: BTreeMap<Priority, f64>,
    pub total_completed_todos: usize,
}

impl From<CompletionMetrics> for MetricsResponse {
    fn from(metrics: CompletionMetrics) -> Self {
        Self {
            average_time_to_complete: metrics.overall_average_hours,
            average_by_priority: metrics.average_hours_by_priority,
            total_completed_todos: metrics.total_completed,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub todos: usize,
}

/// Due date as sent by clients: RFC 3339, or `YYYY-MM-DD` for midnight UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireDate(pub OffsetDateTime);

impl WireDate {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        if let Ok(at) = OffsetDateTime::parse(raw, &Rfc3339) {
            return Ok(Self(at));
        }
        Date::parse(raw, format_description!("[year]-[month]-[day]"))
            .map(|date| Self(date.midnight().assume_utc()))
            .map_err(|_| format!("invalid dueDate '{raw}': expected RFC 3339 or YYYY-MM-DD"))
    }
}

impl<'de> Deserialize<'de> for WireDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due_date: Option<WireDate>,
}

impl From<CreateTodoRequest> for CreateTodoInput {
    fn from(request: CreateTodoRequest) -> Self {
        Self {
            text: request.text.unwrap_or_default(),
            priority: request.priority,
            due_date: request.due_date.map(|date| date.0),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub due_date: Option<Option<WireDate>>,
}

impl From<UpdateTodoRequest> for UpdateTodoInput {
    fn from(request: UpdateTodoRequest) -> Self {
        let due_date = match request.due_date {
            None => DueDatePatch::Keep,
            Some(None) => DueDatePatch::Clear,
            Some(Some(date)) => DueDatePatch::Set(date.0),
        };
        Self {
            text: request.text,
            priority: request.priority,
            due_date,
        }
    }
}

/// Raw `GET /todos` query string. Values stay textual so malformed ones can be
/// reported as `BAD_REQUEST` with a precise message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub size: Option<String>,
    #[serde(alias = "sortBy")]
    pub sort: Option<String>,
    #[serde(alias = "sortDirection")]
    pub direction: Option<String>,
    #[serde(alias = "text")]
    pub name: Option<String>,
    pub priority: Option<String>,
    pub done: Option<String>,
}

impl ListParams {
    pub fn into_query(self, pagination: PaginationConfig) -> Result<TodoQuery, ApiError> {
        let page = match non_blank(self.page.as_deref()) {
            None => 0,
            Some(raw) => raw.parse::<usize>().map_err(|_| {
                ApiError::bad_request(format!("page must be a non-negative integer, got '{raw}'"))
            })?,
        };

        let size = match non_blank(self.size.as_deref()) {
            None => pagination.default_size,
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|size| (1..=pagination.max_size).contains(size))
                .ok_or_else(|| {
                    ApiError::bad_request(format!(
                        "size must be between 1 and {}, got '{raw}'",
                        pagination.max_size
                    ))
                })?,
        };

        let priority = non_blank(self.priority.as_deref())
            .map(str::parse::<Priority>)
            .transpose()
            .map_err(|err| ApiError::bad_request(err.to_string()))?;

        let done = non_blank(self.done.as_deref())
            .map(|raw| match raw.to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(ApiError::bad_request(format!(
                    "done must be true or false, got '{raw}'"
                ))),
            })
            .transpose()?;

        let direction = non_blank(self.direction.as_deref())
            .map_or(SortDirection::Asc, SortDirection::parse_lenient);
        let sort = non_blank(self.sort.as_deref())
            .map_or_else(SortSpec::unsorted, |raw| SortSpec::parse(raw, direction));

        Ok(TodoQuery {
            filter: TodoFilter::new()
                .with_name(self.name.as_deref())
                .with_priority(priority)
                .with_done(done),
            sort,
            page: PageRequest::new(page, size),
        })
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::macros::datetime;
    use todo_core::SortKey;

    fn parse_update(json: &str) -> UpdateTodoRequest {
        serde_json::from_str(json).unwrap_or_else(|err| panic!("valid update json: {err}"))
    }

    #[rstest]
    #[case("2025-06-01", datetime!(2025-06-01 0:00 UTC))]
    #[case("2025-06-01T10:30:00Z", datetime!(2025-06-01 10:30 UTC))]
    #[case("2025-06-01T10:30:00+02:00", datetime!(2025-06-01 10:30 +2))]
    fn wire_dates_accept_both_formats(#[case] raw: &str, #[case] expected: OffsetDateTime) {
        assert_eq!(WireDate::parse(raw).ok(), Some(WireDate(expected)));
    }

    #[test]
    fn wire_dates_reject_garbage() {
        assert!(WireDate::parse("next tuesday").is_err());
    }

    #[test]
    fn update_distinguishes_absent_and_null_due_date() {
        let absent: UpdateTodoInput = parse_update(r#"{"text":"x"}"#).into();
        assert_eq!(absent.due_date, DueDatePatch::Keep);

        let cleared: UpdateTodoInput = parse_update(r#"{"dueDate":null}"#).into();
        assert_eq!(cleared.due_date, DueDatePatch::Clear);

        let set: UpdateTodoInput = parse_update(r#"{"dueDate":"2025-01-02"}"#).into();
        assert_eq!(set.due_date, DueDatePatch::Set(datetime!(2025-01-02 0:00 UTC)));
    }

    #[test]
    fn create_body_keeps_field_checks_for_the_service() {
        let request: CreateTodoRequest =
            serde_json::from_str(r#"{"text":null,"priority":"urgent"}"#)
                .unwrap_or_else(|err| panic!("loosely typed body should parse: {err}"));
        let input = CreateTodoInput::from(request);
        assert_eq!(input.text, "");
        assert_eq!(input.priority.as_deref(), Some("urgent"));
        assert!(input.due_date.is_none());
    }

    #[test]
    fn list_params_default_from_configuration() {
        let query = ListParams::default()
            .into_query(PaginationConfig::default())
            .unwrap_or_else(|err| panic!("defaults are valid: {err}"));
        assert_eq!(query.page, PageRequest::new(0, 10));
        assert!(query.sort.is_unsorted());
        assert_eq!(query.filter, TodoFilter::new());
    }

    #[test]
    fn list_params_parse_every_field() {
        let params = ListParams {
            page: Some("2".into()),
            size: Some("5".into()),
            sort: Some("priority:desc,dueDate".into()),
            direction: Some("DESC".into()),
            name: Some("milk".into()),
            priority: Some("high".into()),
            done: Some("False".into()),
        };
        let query = params
            .into_query(PaginationConfig::default())
            .unwrap_or_else(|err| panic!("valid params: {err}"));

        assert_eq!(query.page, PageRequest::new(2, 5));
        assert_eq!(
            query.sort,
            SortSpec::by(SortKey::Priority, SortDirection::Desc)
                .then(SortKey::DueDate, SortDirection::Desc)
        );
        assert_eq!(query.filter.priority, Some(Priority::High));
        assert_eq!(query.filter.done, Some(false));
        assert!(query.filter.name.is_some());
    }

    #[rstest]
    #[case::negative_page(ListParams { page: Some("-1".into()), ..ListParams::default() })]
    #[case::zero_size(ListParams { size: Some("0".into()), ..ListParams::default() })]
    #[case::huge_size(ListParams { size: Some("101".into()), ..ListParams::default() })]
    #[case::bad_priority(ListParams { priority: Some("urgent".into()), ..ListParams::default() })]
    #[case::bad_done(ListParams { done: Some("maybe".into()), ..ListParams::default() })]
    fn malformed_params_are_bad_requests(#[case] params: ListParams) {
        let Err(err) = params.into_query(PaginationConfig::default()) else {
            panic!("malformed params should be rejected");
        };
        assert_eq!(err.error_code(), "BAD_REQUEST");
    }
}
