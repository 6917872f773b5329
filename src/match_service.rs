use std::{collections::HashSet, sync::Arc};

use tracing::debug;

use crate::{
    models::{MatchOutcome, MatchStats, Submission},
    repository::{SubmissionRepository, VisibilityRepository},
};

/// Answers "is my crush mutual?" and counts mutual pairs for admins.
pub struct MatchService {
    submission_repository: Arc<SubmissionRepository>,
    visibility_repository: Arc<VisibilityRepository>,
}

impl MatchService {
    pub fn new(
        submission_repository: Arc<SubmissionRepository>,
        visibility_repository: Arc<VisibilityRepository>,
    ) -> MatchService {
        MatchService {
            submission_repository,
            visibility_repository,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn check_result(&self, student_id: &str) -> Result<MatchOutcome, anyhow::Error> {
        let Some(my) = self
            .submission_repository
            .find_by_student_id(student_id)
            .await?
        else {
            return Ok(MatchOutcome::NotFound);
        };

        if !self.visibility_repository.is_public().await? {
            return Ok(MatchOutcome::NotPublicYet);
        }

        let reciprocal = self
            .submission_repository
            .find_reciprocal(&my.name, &my.crush)
            .await?;

        debug!("Submission {:?} matched: {}", my.id, reciprocal.is_some());

        Ok(MatchOutcome::Found {
            matched: reciprocal.is_some(),
            my_name: my.name,
            crush_name: my.crush,
        })
    }
}

/// Participant count and number of distinct mutual pairs over a full submission set.
pub fn compute_stats(submissions: &[Submission]) -> MatchStats {
    MatchStats {
        participant_count: submissions.len(),
        match_count: mutual_pairs(submissions).len(),
    }
}

/// Unordered name pairs (smaller name first) of every reciprocated submission.
pub fn mutual_pairs(submissions: &[Submission]) -> HashSet<(&str, &str)> {
    let choices: HashSet<(&str, &str)> = submissions
        .iter()
        .map(|s| (s.name.as_str(), s.crush.as_str()))
        .collect();

    submissions
        .iter()
        .filter(|s| choices.contains(&(s.crush.as_str(), s.name.as_str())))
        .map(|s| {
            let (name, crush) = (s.name.as_str(), s.crush.as_str());
            if name <= crush {
                (name, crush)
            } else {
                (crush, name)
            }
        })
        .collect()
}
