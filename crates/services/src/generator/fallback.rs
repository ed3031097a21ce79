//! Offline question table used when no credential is available or the
//! remote request fails.

use quiz_core::model::{OPTION_COUNT, Question, QuestionId};
use rand::Rng;

/// Topic whose table is used for unknown topics.
pub const DEFAULT_TOPIC: &str = "javascript";

struct Seed {
    question: &'static str,
    options: [&'static str; OPTION_COUNT],
    correct: u32,
    explanation: &'static str,
}

const JAVASCRIPT: &[Seed] = &[
    Seed {
        question: "Which of the following is used to declare a variable in JavaScript?",
        options: ["var", "let", "const", "All of the above"],
        correct: 3,
        explanation: "JavaScript has three ways to declare variables: var, let, and const, each with different scoping rules.",
    },
    Seed {
        question: "What does the '===' operator do in JavaScript?",
        options: ["Assignment", "Loose equality", "Strict equality", "Not equal"],
        correct: 2,
        explanation: "The '===' operator checks for strict equality, meaning both value and type must be the same.",
    },
    Seed {
        question: "Which method is used to add an element to the end of an array?",
        options: ["push()", "pop()", "shift()", "unshift()"],
        correct: 0,
        explanation: "The push() method adds one or more elements to the end of an array and returns the new length.",
    },
];

const SCIENCE: &[Seed] = &[
    Seed {
        question: "What is the chemical symbol for gold?",
        options: ["Go", "Gd", "Au", "Ag"],
        correct: 2,
        explanation: "Gold's chemical symbol is Au, derived from the Latin word 'aurum' meaning gold.",
    },
    Seed {
        question: "How many bones are in the adult human body?",
        options: ["206", "208", "210", "204"],
        correct: 0,
        explanation: "An adult human body has 206 bones, though babies are born with about 270 bones that fuse over time.",
    },
];

fn table_for(topic_key: &str) -> &'static [Seed] {
    match topic_key {
        "javascript" => JAVASCRIPT,
        "science" => SCIENCE,
        _ => table_for(DEFAULT_TOPIC),
    }
}

impl Seed {
    fn build(&self, id: QuestionId) -> Option<Question> {
        Question::new(
            id,
            self.question,
            self.options.map(String::from),
            self.correct,
            Some(self.explanation.to_string()),
        )
        .ok()
    }
}

/// Generic stand-in used when the table runs out of questions.
fn placeholder(id: QuestionId, topic: &str, correct: u32) -> Option<Question> {
    Question::new(
        id,
        format!("Sample question about {topic}?"),
        ["Option A", "Option B", "Option C", "Option D"].map(String::from),
        correct,
        Some(format!("This is a sample explanation for a {topic} question.")),
    )
    .ok()
}

/// Exactly `count` questions for `topic`, drawn from the local table first.
///
/// Topic lookup ignores case and surrounding whitespace. Placeholders get a
/// uniformly random correct option from `rng`.
pub fn fallback_questions<R: Rng + ?Sized>(topic: &str, count: usize, rng: &mut R) -> Vec<Question> {
    let topic = topic.trim();
    let table = table_for(&topic.to_lowercase());

    let mut questions: Vec<Question> = table
        .iter()
        .take(count)
        .enumerate()
        .filter_map(|(index, seed)| seed.build(QuestionId::from_position(index)))
        .collect();

    while questions.len() < count {
        let id = QuestionId::from_position(questions.len());
        let correct = rng.random_range(0..OPTION_COUNT as u32);
        let Some(question) = placeholder(id, topic, correct) else {
            break;
        };
        questions.push(question);
    }

    questions.truncate(count);
    questions
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn javascript_table_is_returned_verbatim() {
        let questions = fallback_questions("javascript", 3, &mut rng());

        assert_eq!(questions.len(), 3);
        let ids: Vec<u32> = questions.iter().map(|q| q.id().value()).collect();
        assert_eq!(ids, [1, 2, 3]);
        assert_eq!(questions[0].correct_answer(), 3);
        assert_eq!(questions[1].correct_answer(), 2);
        assert_eq!(questions[2].options()[0], "push()");
    }

    #[test]
    fn science_is_extended_with_placeholders() {
        let questions = fallback_questions("science", 5, &mut rng());

        assert_eq!(questions.len(), 5);
        assert_eq!(questions[0].text(), "What is the chemical symbol for gold?");
        assert_eq!(questions[1].correct_answer(), 0);
        for (index, q) in questions.iter().enumerate().skip(2) {
            assert_eq!(q.text(), "Sample question about science?");
            assert_eq!(q.options()[3], "Option D");
            assert_eq!(q.id(), QuestionId::from_position(index));
            assert!(q.correct_answer() < 4);
            assert_eq!(
                q.explanation(),
                Some("This is a sample explanation for a science question.")
            );
        }
    }

    #[test]
    fn topic_match_ignores_case_and_whitespace() {
        let questions = fallback_questions("  SCIENCE ", 2, &mut rng());
        assert_eq!(questions[0].options()[2], "Au");
    }

    #[test]
    fn unknown_topic_uses_default_table() {
        let questions = fallback_questions("Medieval history", 4, &mut rng());

        assert_eq!(questions.len(), 4);
        assert_eq!(questions[0].text(), JAVASCRIPT[0].question);
        assert_eq!(questions[3].text(), "Sample question about Medieval history?");
    }

    #[test]
    fn truncates_to_requested_count() {
        let questions = fallback_questions("javascript", 1, &mut rng());
        assert_eq!(questions.len(), 1);
        assert!(fallback_questions("javascript", 0, &mut rng()).is_empty());
    }

    #[test]
    fn table_portion_is_stable_across_calls() {
        let first = fallback_questions("science", 6, &mut rng());
        let second = fallback_questions("science", 6, &mut StdRng::seed_from_u64(99));

        assert_eq!(first[..2], second[..2]);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.options(), b.options());
            assert_eq!(a.id(), b.id());
        }
    }

    #[test]
    fn every_count_yields_well_formed_questions() {
        for topic in ["javascript", "science", "rust", ""] {
            for count in 1..=15 {
                let questions = fallback_questions(topic, count, &mut rng());
                assert_eq!(questions.len(), count, "{topic}/{count}");
                assert!(questions.iter().all(|q| q.options().len() == 4));
                assert!(questions.iter().all(|q| q.correct_answer() < 4));
            }
        }
    }
}
