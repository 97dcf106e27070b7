//! Deriving the in-app route a notification opens.
//!
//! Producers write `action_data` keys in either snake_case or
//! camelCase depending on which backend function created the row, so
//! lookups accept both spellings.

use serde_json::Value;

use super::kind::NotificationKind;
use super::model::Notification;

/// Resolve the route a notification should open, if any.
///
/// A direct `action_url` always wins. Otherwise the route is derived
/// from the notification kind and its `action_data`; kinds with no
/// navigable target return `None`.
pub fn action_route(notification: &Notification) -> Option<String> {
    if let Some(url) = &notification.action_url {
        return Some(url.clone());
    }

    let data = notification.action_data.as_ref();

    match notification.kind {
        NotificationKind::NewDiscussion => Some(match data_id(data, "discussion_id") {
            Some(id) => format!("/dashboard/discussion/{id}?highlight=new"),
            None => "/dashboard/discussion".to_string(),
        }),
        NotificationKind::NewMessage => Some(match data_id(data, "discussion_id") {
            Some(discussion_id) => match data_id(data, "message_id") {
                Some(message_id) => format!(
                    "/dashboard/discussion/{discussion_id}?highlight=message&message_id={message_id}"
                ),
                None => format!("/dashboard/discussion/{discussion_id}?highlight=message"),
            },
            None => "/dashboard/discussion".to_string(),
        }),
        NotificationKind::AssignmentCreated => Some(match data_id(data, "assignment_id") {
            Some(id) => format!("/dashboard/assignments/{id}"),
            None => "/dashboard/assignments".to_string(),
        }),
        NotificationKind::AssignmentDue => Some(match data_id(data, "assignment_id") {
            Some(id) => format!("/dashboard/assignments/{id}?urgent=true"),
            None => "/dashboard/assignments".to_string(),
        }),
        NotificationKind::CourseUpdate => Some(match data_id(data, "course_id") {
            Some(id) => format!("/dashboard/courses/{id}/content"),
            None => "/dashboard/courses".to_string(),
        }),
        NotificationKind::QuizGraded => Some(match data_id(data, "quiz_id") {
            Some(id) => format!("/dashboard/quizzes/{id}/results"),
            None => "/dashboard/grades".to_string(),
        }),
        NotificationKind::SystemMaintenance | NotificationKind::Unknown => None,
    }
}

/// Look up a string or integer id under a snake_case key, falling back
/// to its camelCase spelling.
fn data_id(data: Option<&Value>, snake_key: &str) -> Option<String> {
    let data = data?;
    let camel_key = camel_case(snake_key);

    let value = data.get(snake_key).or_else(|| data.get(&camel_key))?;
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper_next = false;
    for c in snake.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
