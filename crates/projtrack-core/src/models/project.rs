use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{choice_key, ParseChoiceError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Personal,
    Work,
    Hobby,
    Other,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[Category::Personal, Category::Work, Category::Hobby, Category::Other]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Personal => write!(f, "Personal"),
            Category::Work => write!(f, "Work"),
            Category::Hobby => write!(f, "Hobby"),
            Category::Other => write!(f, "Other"),
        }
    }
}

impl FromStr for Category {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match choice_key(s).as_str() {
            "personal" => Ok(Category::Personal),
            "work" => Ok(Category::Work),
            "hobby" => Ok(Category::Hobby),
            "other" => Ok(Category::Other),
            _ => Err(ParseChoiceError {
                kind: "category",
                value: s.to_string(),
                expected: "personal, work, hobby, other",
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub owner: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub categories: Category,
    #[serde(default = "default_true")]
    pub is_owner: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by: Option<i64>,
    #[serde(default)]
    pub updated_by: Option<i64>,
}

fn default_true() -> bool {
    true
}

/// Writable project fields, sent on create and update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectInput {
    pub name: String,
    pub description: String,
    pub categories: Category,
}

impl From<&Project> for ProjectInput {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone(),
            categories: project.categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_project() {
        let json = r#"{
            "id": 4, "owner": 1, "name": "Garden", "description": "",
            "categories": "hobby", "is_owner": true,
            "created_at": "2024-05-01T09:30:00.123456Z",
            "updated_at": "2024-05-02T10:00:00Z",
            "created_by": 1, "updated_by": null
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.categories, Category::Hobby);
        assert_eq!(project.created_by, Some(1));
        assert!(project.updated_by.is_none());
        assert!(project.updated_at > project.created_at);
    }

    #[test]
    fn test_project_input_from_project() {
        let json = r#"{"id": 4, "owner": 1, "name": "Garden",
            "created_at": "2024-05-01T09:30:00Z", "updated_at": "2024-05-01T09:30:00Z"}"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.categories, Category::Personal);

        let input = ProjectInput::from(&project);
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            serde_json::json!({"name": "Garden", "description": "", "categories": "personal"})
        );
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("WORK".parse::<Category>(), Ok(Category::Work));
        assert!("chores".parse::<Category>().is_err());
        assert_eq!(Category::all().len(), 4);
    }
}
