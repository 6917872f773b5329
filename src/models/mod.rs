mod match_outcome;
mod submission;

pub mod types;

pub use match_outcome::{MatchOutcome, MatchStats};
pub use submission::{NewSubmission, Submission, SubmissionId, ValidationError};
