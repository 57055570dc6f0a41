use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    None,
    Work,
    Personal,
    Urgent,
}

impl Category {
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "work" => Some(Self::Work),
            "personal" => Some(Self::Personal),
            "urgent" => Some(Self::Urgent),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Work => "work",
            Self::Personal => "personal",
            Self::Urgent => "urgent",
        }
    }

    /// Badge text; `None` has no badge.
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Work => "Work",
            Self::Personal => "Personal",
            Self::Urgent => "Urgent",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,

    pub text: String,

    #[serde(default)]
    pub completed: bool,

    #[serde(default)]
    pub category: Category,

    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(text: String, category: Category, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            completed: false,
            category,
            created_at: now,
        }
    }

    pub fn short_id(&self) -> String {
        self.id.to_string().chars().take(8).collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{Category, Task};

    #[test]
    fn slot_wire_shape_uses_camel_case_and_lowercase_category() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
        let task = Task::new("Buy milk".to_string(), Category::Personal, now);

        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
        assert_eq!(json["category"], "personal");
        assert_eq!(json["completed"], false);
        assert_eq!(json["text"], "Buy milk");
    }

    #[test]
    fn task_roundtrips_through_json() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
        let task = Task::new("Write report".to_string(), Category::Work, now);

        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn missing_completed_and_category_default() {
        let raw = r#"{
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "text": "Water plants",
            "createdAt": "2026-03-01T12:30:00Z"
        }"#;

        let task: Task = serde_json::from_str(raw).unwrap();
        assert!(!task.completed);
        assert_eq!(task.category, Category::None);
    }
}
