use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{choice_key, ParseChoiceError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn all() -> &'static [TaskStatus] {
        &[TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done]
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match choice_key(s).as_str() {
            "todo" | "to_do" => Ok(TaskStatus::Todo),
            "in_progress" | "inprogress" | "doing" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            _ => Err(ParseChoiceError {
                kind: "status",
                value: s.to_string(),
                expected: "todo, in_progress, done",
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub project: i64,
    pub owner: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    // The backend renders these as the user's string form, not an id
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Past its due date and not done
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != TaskStatus::Done && self.due_date.is_some_and(|due| due < today)
    }
}

/// Writable task fields. The owning project id always rides in the body.
///
/// `due_date` is always sent: an update with `None` clears the stored date,
/// where an omitted key would leave it untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskInput {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub project: i64,
}

impl From<&Task> for TaskInput {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            due_date: task.due_date,
            project: task.project,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(status: TaskStatus, due: Option<&str>) -> Task {
        Task {
            id: 1,
            project: 2,
            owner: 3,
            title: "Write docs".into(),
            description: String::new(),
            status,
            due_date: due.map(|d| d.parse().unwrap()),
            created_by: None,
            updated_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_deserialize_task() {
        let json = r#"{
            "id": 11, "project": 4, "owner": 1, "title": "Plant beans",
            "description": "Row 3", "status": "in_progress", "due_date": "2024-06-01",
            "created_by": "ada@example.com", "updated_by": "ada@example.com",
            "created_at": "2024-05-01T09:30:00Z", "updated_at": "2024-05-01T09:30:00Z"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(task.created_by.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn test_is_overdue() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        assert!(task(TaskStatus::Todo, Some("2024-06-09")).is_overdue(today));
        assert!(!task(TaskStatus::Done, Some("2024-06-09")).is_overdue(today));
        assert!(!task(TaskStatus::Todo, Some("2024-06-10")).is_overdue(today));
        assert!(!task(TaskStatus::InProgress, None).is_overdue(today));
    }

    #[test]
    fn test_task_input_carries_project() {
        let input = TaskInput::from(&task(TaskStatus::Todo, None));
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            serde_json::json!({
                "title": "Write docs", "description": "", "status": "todo",
                "due_date": null, "project": 2
            })
        );
    }

    #[test]
    fn test_status_labels_and_parse() {
        assert_eq!(TaskStatus::InProgress.to_string(), "In Progress");
        assert_eq!("In Progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("to-do".parse::<TaskStatus>(), Ok(TaskStatus::Todo));
        assert!("blocked".parse::<TaskStatus>().is_err());
    }
}
