//! Stand-in recognition results for when the OMR service cannot answer.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::schemas::omr::{Choice, OmrResult};

/// Every n-th question is left blank so downstream scoring sees skipped answers.
pub(crate) const SKIP_EVERY: u32 = 8;

const NAMES: &[&str] = &[
    "Aarav Sharma",
    "Diya Patel",
    "Ishaan Verma",
    "Kavya Nair",
    "Rohan Gupta",
    "Ananya Iyer",
    "Vihaan Reddy",
    "Meera Joshi",
];

const VERSIONS: &[&str] = &["A", "B", "C", "D"];

pub(crate) fn is_skipped(question: u32) -> bool {
    question % SKIP_EVERY == 0
}

pub(crate) fn generate<R: Rng + ?Sized>(rng: &mut R, questions: u32) -> OmrResult {
    let answers: BTreeMap<u32, Option<Choice>> = (1..=questions)
        .map(|question| {
            let choice = if is_skipped(question) {
                None
            } else {
                Choice::ALL.choose(rng).copied()
            };
            (question, choice)
        })
        .collect();

    let answer_string = OmrResult::answer_string_for(&answers);
    let name = NAMES.choose(rng).copied().unwrap_or("Candidate");
    let version = VERSIONS.choose(rng).copied().unwrap_or("A");
    let roll_number = format!("{:08}", rng.gen_range(0..100_000_000u32));

    OmrResult {
        name: name.to_string(),
        roll_number,
        version: version.to_string(),
        answers,
        answer_string,
        is_synthetic: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn every_eighth_slot_is_blank() {
        let mut rng = StdRng::seed_from_u64(7);
        let result = generate(&mut rng, 44);

        assert_eq!(result.answers.len(), 44);
        for (question, choice) in &result.answers {
            assert_eq!(choice.is_none(), question % 8 == 0, "question {question}");
        }
        assert_eq!(result.answers.keys().next(), Some(&1));
        assert_eq!(result.answers.keys().last(), Some(&44));
    }

    #[test]
    fn answer_string_mirrors_answers() {
        let mut rng = StdRng::seed_from_u64(11);
        let result = generate(&mut rng, 44);

        assert_eq!(result.answer_string.len(), 44);
        assert!(result.answer_string.chars().all(|c| matches!(c, 'A'..='D' | '-')));
        for (index, c) in result.answer_string.chars().enumerate() {
            let question = index as u32 + 1;
            assert_eq!(c == '-', is_skipped(question));
            assert_eq!(result.answers[&question].map(Choice::as_char).unwrap_or('-'), c);
        }
    }

    #[test]
    fn header_fields_are_filled_and_flagged() {
        let mut rng = StdRng::seed_from_u64(3);
        let result = generate(&mut rng, 10);

        assert!(result.is_synthetic);
        assert!(!result.name.is_empty());
        assert_eq!(result.roll_number.len(), 8);
        assert!(result.roll_number.chars().all(|c| c.is_ascii_digit()));
        assert!(VERSIONS.contains(&result.version.as_str()));
    }

    #[test]
    fn serializes_blank_slots_as_null() {
        let mut rng = StdRng::seed_from_u64(5);
        let value = serde_json::to_value(generate(&mut rng, 8)).unwrap();

        assert!(value["answers"]["8"].is_null());
        assert!(value["answers"]["1"].is_string());
        assert_eq!(value["is_synthetic"], true);
    }
}
