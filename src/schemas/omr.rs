use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum Choice {
    A,
    B,
    C,
    D,
}

impl Choice {
    pub(crate) const ALL: [Choice; 4] = [Choice::A, Choice::B, Choice::C, Choice::D];

    pub(crate) fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }
}

/// Marker used in `answer_string` for a question left blank.
pub(crate) const UNANSWERED: char = '-';

/// Normalized recognition result. Question ids are 1-based.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct OmrResult {
    pub(crate) name: String,
    pub(crate) roll_number: String,
    pub(crate) version: String,
    pub(crate) answers: BTreeMap<u32, Option<Choice>>,
    pub(crate) answer_string: String,
    #[serde(default)]
    pub(crate) is_synthetic: bool,
}

impl OmrResult {
    pub(crate) fn answer_string_for(answers: &BTreeMap<u32, Option<Choice>>) -> String {
        answers.values().map(|choice| choice.map(Choice::as_char).unwrap_or(UNANSWERED)).collect()
    }
}
