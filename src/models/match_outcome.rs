/// The answer a participant gets when checking their result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    NotFound,
    NotPublicYet,
    Found {
        matched: bool,
        my_name: String,
        crush_name: String,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub participant_count: usize,
    pub match_count: usize,
}
