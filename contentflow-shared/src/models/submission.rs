/// Creator upload metadata records
///
/// A submission captures what a creator uploaded for one assignment: the
/// caption, hashtags, notes, and the opaque asset URLs. Binary upload itself
/// happens out of band; only the references land here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Input for recording a submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubmission {
    /// Content item this submission belongs to
    pub assignment_id: Uuid,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub notes: String,
    /// Uploaded asset references; must not be empty
    pub images: Vec<String>,
}

/// Stored submission record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub assignment_id: Uuid,
    /// Creator who uploaded it
    pub created_by: Uuid,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub notes: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(data: CreateSubmission, created_by: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            assignment_id: data.assignment_id,
            created_by,
            caption: data.caption,
            hashtags: data.hashtags,
            notes: data.notes,
            images: data.images,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_carries_creator_and_assignment() {
        let creator = Uuid::new_v4();
        let assignment = Uuid::new_v4();

        let submission = Submission::new(
            CreateSubmission {
                assignment_id: assignment,
                caption: "spring vibes".to_string(),
                hashtags: vec!["#launch".to_string()],
                notes: String::new(),
                images: vec!["https://assets.example/1.png".to_string()],
            },
            creator,
        );

        assert_eq!(submission.assignment_id, assignment);
        assert_eq!(submission.created_by, creator);
        assert_eq!(submission.images.len(), 1);
    }
}
