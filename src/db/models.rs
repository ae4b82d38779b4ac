use serde::{Deserialize, Serialize};

/// Explicit role type, derived from the nullable `teacher_id` column in
/// exactly one place. A NULL reference means the user is a teacher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Teacher,
    Student { teacher_id: i64 },
}

impl Role {
    pub fn from_teacher_ref(teacher_id: Option<i64>) -> Self {
        match teacher_id {
            None => Role::Teacher,
            Some(id) => Role::Student { teacher_id: id },
        }
    }

    pub fn is_teacher(&self) -> bool {
        matches!(self, Role::Teacher)
    }

    pub fn teacher_ref(&self) -> Option<i64> {
        match self {
            Role::Teacher => None,
            Role::Student { teacher_id } => Some(*teacher_id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub teacher_id: Option<i64>,
    pub class_id: Option<i64>,
    pub created_at: String,
}

impl User {
    pub fn role(&self) -> Role {
        Role::from_teacher_ref(self.teacher_id)
    }
}

/// One immutable quiz submission. `class_id` is the class at submission time,
/// not necessarily the user's current class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: i64,
    pub user_id: i64,
    pub class_id: i64,
    pub score: i64,
    pub mood: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Presentation {
    pub id: i64,
    pub class_id: i64,
    pub title: String,
    pub file_path: String,
    pub upload_timestamp: String,
}
