use std::cmp::Ordering;
use std::str::FromStr;

use thiserror::Error;

use crate::text_matcher::TextMatcher;
use crate::{Priority, Todo};

/// Field a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// `LOW < MEDIUM < HIGH`.
    Priority,
    /// Chronological; items without a due date always come last.
    DueDate,
    /// Chronological.
    CreationDate,
}

/// Returned for sort keys that are not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort key: {0}")]
pub struct UnknownSortKey(String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', '-'], "");
        match normalized.as_str() {
            "priority" => Ok(Self::Priority),
            "duedate" => Ok(Self::DueDate),
            "creationdate" => Ok(Self::CreationDate),
            _ => Err(UnknownSortKey(s.to_owned())),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    /// `desc` (any case) selects [`SortDirection::Desc`]; anything else is ascending.
    #[must_use]
    pub fn parse_lenient(token: &str) -> Self {
        if token.trim().eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// One key of a sort specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortOrder {
    /// Field to compare.
    pub key: SortKey,
    /// Direction for this field.
    pub direction: SortDirection,
}

impl SortOrder {
    fn compare(self, a: &Todo, b: &Todo) -> Ordering {
        match self.key {
            SortKey::Priority => self.direction.apply(a.priority.cmp(&b.priority)),
            SortKey::CreationDate => self.direction.apply(a.created_at().cmp(&b.created_at())),
            SortKey::DueDate => match (a.due_date, b.due_date) {
                (Some(left), Some(right)) => self.direction.apply(left.cmp(&right)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

/// Ordered list of sort keys; earlier keys take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortSpec {
    orders: Vec<SortOrder>,
}

impl SortSpec {
    /// Keep the filtered order.
    #[must_use]
    pub const fn unsorted() -> Self {
        Self { orders: Vec::new() }
    }

    /// Sort by a single key.
    #[must_use]
    pub fn by(key: SortKey, direction: SortDirection) -> Self {
        Self::unsorted().then(key, direction)
    }

    /// Append a tie-breaking key.
    #[must_use]
    pub fn then(mut self, key: SortKey, direction: SortDirection) -> Self {
        self.orders.push(SortOrder { key, direction });
        self
    }

    /// Parse a comma-separated list such as `priority:desc,dueDate`.
    ///
    /// Entries without a `:asc`/`:desc` suffix use `default_direction`.
    /// Unknown keys are skipped, so a fully unknown list yields an unsorted spec.
    #[must_use]
    pub fn parse(raw: &str, default_direction: SortDirection) -> Self {
        let orders = raw
            .split(',')
            .filter_map(|entry| {
                let (key, direction) = match entry.split_once(':') {
                    Some((key, direction)) => (key, SortDirection::parse_lenient(direction)),
                    None => (entry, default_direction),
                };
                key.parse::<SortKey>()
                    .ok()
                    .map(|key| SortOrder { key, direction })
            })
            .collect();
        Self { orders }
    }

    /// True when no key is configured.
    #[must_use]
    pub fn is_unsorted(&self) -> bool {
        self.orders.is_empty()
    }

    /// Configured keys in precedence order.
    #[must_use]
    pub fn orders(&self) -> &[SortOrder] {
        &self.orders
    }

    /// Compare two todos key by key; the first non-equal key decides.
    #[must_use]
    pub fn compare(&self, a: &Todo, b: &Todo) -> Ordering {
        self.orders
            .iter()
            .map(|order| order.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

/// Field filters; `None` means "do not filter on this field".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFilter {
    /// Case-insensitive substring of the text.
    pub name: Option<TextMatcher>,
    /// Exact priority.
    pub priority: Option<Priority>,
    /// Exact completion status.
    pub done: Option<bool>,
}

impl TodoFilter {
    /// Filter that keeps everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name filter; blank input clears it.
    #[must_use]
    pub fn with_name(mut self, name: Option<&str>) -> Self {
        self.name = name.and_then(TextMatcher::new);
        self
    }

    /// Set the priority filter.
    #[must_use]
    pub const fn with_priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = priority;
        self
    }

    /// Set the completion filter.
    #[must_use]
    pub const fn with_done(mut self, done: Option<bool>) -> Self {
        self.done = done;
        self
    }

    fn matches_name(&self, todo: &Todo) -> bool {
        self.name.as_ref().is_none_or(|matcher| matcher.matches(todo))
    }

    fn matches_priority(&self, todo: &Todo) -> bool {
        self.priority.is_none_or(|priority| todo.priority == priority)
    }

    fn matches_done(&self, todo: &Todo) -> bool {
        self.done.is_none_or(|done| todo.is_done() == done)
    }

    /// Whether the todo passes every configured filter.
    #[must_use]
    pub fn matches(&self, todo: &Todo) -> bool {
        self.matches_name(todo) && self.matches_priority(todo) && self.matches_done(todo)
    }
}

/// Zero-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page index, starting at 0.
    pub page: usize,
    /// Items per page.
    pub size: usize,
}

impl PageRequest {
    /// Construct a page request.
    #[must_use]
    pub const fn new(page: usize, size: usize) -> Self {
        Self { page, size }
    }

    /// Index of the first item on this page.
    #[must_use]
    pub const fn offset(self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, 10)
    }
}

/// One page of results plus the size of the filtered view it was cut from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Number of items that passed the filters.
    pub total: usize,
    /// Requested page index.
    pub page: usize,
    /// Requested page size.
    pub size: usize,
}

impl<T> Page<T> {
    /// Number of pages needed to show every filtered item.
    #[must_use]
    pub const fn total_pages(&self) -> usize {
        if self.size == 0 {
            0
        } else {
            self.total.div_ceil(self.size)
        }
    }

    /// Transform the items while keeping the paging metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            size: self.size,
        }
    }
}

/// Everything needed to produce a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoQuery {
    /// Field filters.
    pub filter: TodoFilter,
    /// Ordering.
    pub sort: SortSpec,
    /// Page window.
    pub page: PageRequest,
}

/// Filter, sort and paginate a snapshot of todos.
///
/// Stages run in a fixed order: name, priority and done filters, then the
/// (stable) sort, then the page cut. A page past the end is empty, not an error.
#[must_use]
pub fn select(todos: Vec<Todo>, query: &TodoQuery) -> Page<Todo> {
    let TodoQuery { filter, sort, page } = query;

    let mut filtered: Vec<Todo> = todos
        .into_iter()
        .filter(|todo| filter.matches_name(todo))
        .filter(|todo| filter.matches_priority(todo))
        .filter(|todo| filter.matches_done(todo))
        .collect();

    if !sort.is_unsorted() {
        filtered.sort_by(|a, b| sort.compare(a, b));
    }

    let total = filtered.len();
    let items = filtered
        .into_iter()
        .skip(page.offset())
        .take(page.size)
        .collect();

    Page {
        items,
        total,
        page: page.page,
        size: page.size,
    }
}
