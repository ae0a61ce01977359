use std::collections::BTreeMap;

use time::Duration;

use crate::{Priority, Todo};

/// Average completion times over every done todo.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionMetrics {
    /// Mean hours from creation to completion across all done todos.
    pub overall_average_hours: f64,
    /// Mean hours per priority; every priority is present (0.0 when none are done).
    pub average_hours_by_priority: BTreeMap<Priority, f64>,
    /// Number of done todos.
    pub total_completed: usize,
}

impl CompletionMetrics {
    /// Metrics for a collection with no completed todos.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            overall_average_hours: 0.0,
            average_hours_by_priority: Priority::ALL.iter().map(|&p| (p, 0.0)).collect(),
            total_completed: 0,
        }
    }

    /// Average for one priority.
    #[must_use]
    pub fn average_for(&self, priority: Priority) -> f64 {
        self.average_hours_by_priority
            .get(&priority)
            .copied()
            .unwrap_or(0.0)
    }
}

impl Default for CompletionMetrics {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    hours: f64,
    count: usize,
}

impl Accumulator {
    fn add(&mut self, hours: f64) {
        self.hours += hours;
        self.count += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    fn average(self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.hours / self.count as f64
        }
    }
}

/// Express a duration as whole hours plus the minute part over 60.
///
/// Seconds and below are dropped, so anything under a minute counts as 0.0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn fractional_hours(duration: Duration) -> f64 {
    let hours = duration.whole_hours();
    let minutes = duration.whole_minutes() % 60;
    hours as f64 + minutes as f64 / 60.0
}

/// Aggregate completion times over the done todos in `todos`.
#[must_use]
pub fn aggregate<'a, I>(todos: I) -> CompletionMetrics
where
    I: IntoIterator<Item = &'a Todo>,
{
    let mut overall = Accumulator::default();
    let mut by_priority: BTreeMap<Priority, Accumulator> =
        Priority::ALL.iter().map(|&p| (p, Accumulator::default())).collect();

    for todo in todos {
        let Some(elapsed) = todo.completion_time() else {
            continue;
        };
        let hours = fractional_hours(elapsed);
        overall.add(hours);
        by_priority.entry(todo.priority).or_default().add(hours);
    }

    CompletionMetrics {
        overall_average_hours: overall.average(),
        average_hours_by_priority: by_priority
            .into_iter()
            .map(|(priority, acc)| (priority, acc.average()))
            .collect(),
        total_completed: overall.count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TodoText;
    use time::OffsetDateTime;
    use time::macros::datetime;

    const CREATED: OffsetDateTime = datetime!(2025-02-01 12:00 UTC);

    fn completed(priority: Priority, after: Duration) -> Todo {
        let mut todo = pending(priority);
        todo.mark_done(CREATED + after);
        todo
    }

    fn pending(priority: Priority) -> Todo {
        let text = TodoText::parse("task").unwrap_or_else(|err| panic!("valid text: {err}"));
        Todo::new(text, priority, None, CREATED)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn fractional_hours_drops_seconds() {
        assert_close(fractional_hours(Duration::minutes(90)), 1.5);
        assert_close(fractional_hours(Duration::seconds(59)), 0.0);
        assert_close(fractional_hours(Duration::hours(26) + Duration::minutes(15)), 26.25);
        assert_close(fractional_hours(Duration::minutes(90) + Duration::seconds(59)), 1.5);
    }

    #[test]
    fn empty_collection_reports_zeroes_for_every_priority() {
        let metrics = aggregate(&[pending(Priority::High), pending(Priority::Low)]);
        assert_eq!(metrics.total_completed, 0);
        assert_close(metrics.overall_average_hours, 0.0);
        assert_eq!(metrics.average_hours_by_priority.len(), 3);
        for priority in Priority::ALL {
            assert_close(metrics.average_for(priority), 0.0);
        }
        assert_eq!(metrics, CompletionMetrics::empty());
    }

    #[test]
    fn averages_overall_and_per_priority() {
        let todos = vec![
            completed(Priority::High, Duration::hours(1)),
            completed(Priority::High, Duration::hours(3)),
            completed(Priority::Low, Duration::minutes(30)),
            pending(Priority::Medium),
        ];
        let metrics = aggregate(&todos);

        assert_eq!(metrics.total_completed, 3);
        assert_close(metrics.overall_average_hours, 4.5 / 3.0);
        assert_close(metrics.average_for(Priority::High), 2.0);
        assert_close(metrics.average_for(Priority::Low), 0.5);
        assert_close(metrics.average_for(Priority::Medium), 0.0);
    }

    #[test]
    fn undone_items_stop_counting() {
        let mut todo = completed(Priority::Medium, Duration::hours(2));
        assert_eq!(aggregate([&todo]).total_completed, 1);
        todo.mark_undone();
        assert_eq!(aggregate([&todo]).total_completed, 0);
    }
}
