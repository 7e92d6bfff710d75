//! Question parsing.
//!
//! A question starts at a numbered bold marker and runs until the next one:
//!
//! ```markdown
//! 1. **Which word is a noun?**
//!    - a) run
//!    - b) cat ✓
//!    Hint: "It names a thing."
//!    **Feedback if correct:** Yes!
//!    **Feedback if incorrect:** Look for a person, place, or thing.
//! ```
//!
//! The type comes from an explicit `Question Type:` line when present,
//! otherwise it is inferred: lettered options mean multiple choice, a blank
//! (`___`) means fill-in-blank, and `drag`/`drop` or `build`/`arrange`
//! keywords select drag-and-drop or sentence-builder. Anything else is
//! treated as multiple choice.

use crate::diagnostics::{Diagnostics, WarningKind};
use crate::markdown::helpers::{labeled_value, labeled_value_any, parse_comma_list, strip_quotes};
use crate::model::{Question, QuestionKind, QuestionType};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Glyphs that mark the correct option.
pub const CHECK_MARKS: [char; 3] = ['\u{2713}', '\u{2714}', '\u{2705}'];

/// Labels that carry an explicit correct answer, tried in order.
const ANSWER_LABELS: [&str; 3] = ["Answer", "Correct Answer", "Correct"];

static QUESTION_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(\d+)\.[ \t]+\*\*(.+?)\*\*[ \t]*(.*)$").expect("valid question regex")
});

static QUESTION_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^question\s*\d*\s*:?$").expect("valid question label regex")
});

static FEEDBACK_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[ \t]*(?:[-*][ \t]+)?\*\*feedback\b").expect("valid feedback regex")
});

static HINT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[ \t]*(?:[-*][ \t]+)?(?:\*\*)?hint(?:[ \t]*\d+)?(?:\*\*)?[ \t]*:[ \t]*(?:\*\*)?[ \t]*(.+?)[ \t\r]*$",
    )
    .expect("valid hint regex")
});

static OPTION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*[-*+][ \t]+([a-zA-Z])[\).][ \t]+(.*?)[ \t\r]*$")
        .expect("valid option regex")
});

static PAIR_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*[-*+][ \t]+(.+?)[ \t]*(?:->|\x{2192})[ \t]*(.+?)[ \t\r]*$")
        .expect("valid pair regex")
});

static BLANK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)_{3,}|\[blank\]|\{\{\s*blank\s*\}\}").expect("valid blank regex")
});

static DRAG_DROP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(drag|drop)\b").expect("valid drag regex"));

static SENTENCE_BUILD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(build|arrange)\b").expect("valid build regex"));

static LETTER_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zA-Z])[\).]?$").expect("valid letter regex"));

static LETTER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][\).]\s+(.+)$").expect("valid letter prefix regex"));

#[derive(Debug)]
struct LetteredOption {
    text: String,
    checked: bool,
}

/// Parse every question in a section body.
///
/// `section` names the owning section in any warnings.
pub fn parse_questions(body: &str, section: &str, diags: &mut Diagnostics) -> Vec<Question> {
    let markers: Vec<_> = QUESTION_START.captures_iter(body).collect();
    let mut questions = Vec::with_capacity(markers.len());

    for (i, caps) in markers.iter().enumerate() {
        let (Some(whole), Some(number), Some(bold)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        let tail = caps.get(3).map_or("", |m| m.as_str()).trim();
        let end = markers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(body.len(), |m| m.start());
        let rest = &body[whole.end()..end];

        let stem = build_stem(bold.as_str().trim(), tail);
        let question = parse_question(&stem, rest, number.as_str(), section, diags);
        questions.push(question);
    }

    questions
}

fn build_stem(bold: &str, tail: &str) -> String {
    if QUESTION_LABEL.is_match(bold) && !tail.is_empty() {
        tail.to_string()
    } else if tail.is_empty() {
        bold.to_string()
    } else {
        format!("{bold} {tail}")
    }
}

fn parse_question(
    stem: &str,
    rest: &str,
    number: &str,
    section: &str,
    diags: &mut Diagnostics,
) -> Question {
    let main = match FEEDBACK_MARKER.find(rest) {
        Some(m) => &rest[..m.start()],
        None => rest,
    };

    let options = lettered_options(main);
    let question_type = declared_type(main, number, section, diags)
        .unwrap_or_else(|| infer_type(stem, main, !options.is_empty()));

    let answer = labeled_value_any(main, &ANSWER_LABELS)
        .map(|a| strip_quotes(&a).trim().to_string())
        .filter(|a| !a.is_empty());

    let question_data = match question_type {
        QuestionType::MultipleChoice => {
            multiple_choice(options, answer.as_deref(), number, section, diags)
        }
        QuestionType::FillInBlank => {
            let answers = match &answer {
                Some(a) => parse_comma_list(a),
                None => options
                    .iter()
                    .filter(|o| o.checked)
                    .map(|o| o.text.clone())
                    .collect(),
            };
            QuestionKind::FillInBlank { answers }
        }
        QuestionType::DragAndDrop => drag_and_drop(main),
        QuestionType::SentenceBuilder => sentence_builder(main, answer.as_deref()),
        QuestionType::Essay => QuestionKind::Essay {
            rubric: labeled_value(main, "Rubric")
                .map(|r| strip_quotes(&r).to_string())
                .filter(|r| !r.is_empty()),
            sample_answer: labeled_value(main, "Sample Answer")
                .map(|s| strip_quotes(&s).to_string())
                .or(answer),
        },
    };

    Question {
        question_text: stem.to_string(),
        question_data,
        hints: hints(rest),
        correct_feedback: feedback(rest, "Feedback if correct"),
        incorrect_feedback: feedback(rest, "Feedback if incorrect"),
    }
}

fn declared_type(
    main: &str,
    number: &str,
    section: &str,
    diags: &mut Diagnostics,
) -> Option<QuestionType> {
    let label = labeled_value(main, "Question Type")?;
    let parsed = QuestionType::from_label(&label);
    if parsed.is_none() {
        diags.warn(
            WarningKind::Format,
            format!("Question {number}: unknown question type '{label}'; inferring instead"),
            Some(section),
        );
    }
    parsed
}

fn infer_type(stem: &str, main: &str, has_options: bool) -> QuestionType {
    let text = format!("{stem}\n{main}");
    if has_options {
        QuestionType::MultipleChoice
    } else if BLANK.is_match(&text) {
        QuestionType::FillInBlank
    } else if DRAG_DROP.is_match(&text) {
        QuestionType::DragAndDrop
    } else if SENTENCE_BUILD.is_match(&text) {
        QuestionType::SentenceBuilder
    } else {
        QuestionType::MultipleChoice
    }
}

fn lettered_options(main: &str) -> Vec<LetteredOption> {
    OPTION_LINE
        .captures_iter(main)
        .filter_map(|caps| caps.get(2))
        .map(|m| {
            let raw = m.as_str();
            LetteredOption {
                text: raw.replace(CHECK_MARKS, "").trim().to_string(),
                checked: raw.contains(CHECK_MARKS),
            }
        })
        .collect()
}

fn multiple_choice(
    options: Vec<LetteredOption>,
    answer: Option<&str>,
    number: &str,
    section: &str,
    diags: &mut Diagnostics,
) -> QuestionKind {
    if options.is_empty() {
        diags.warn(
            WarningKind::Format,
            format!("Question {number}: multiple-choice question has no options"),
            Some(section),
        );
    }

    let correct_index = match answer {
        Some(answer) => {
            let resolved = resolve_choice(answer, &options);
            if resolved.is_none() {
                diags.warn(
                    WarningKind::Content,
                    format!("Question {number}: answer '{answer}' does not match any option"),
                    Some(section),
                );
            }
            resolved.or_else(|| options.iter().position(|o| o.checked))
        }
        None => options.iter().position(|o| o.checked),
    };

    QuestionKind::MultipleChoice {
        options: options.into_iter().map(|o| o.text).collect(),
        correct_index,
    }
}

/// Resolve an answer written as the option text itself, a letter (`b`,
/// `b)`), or a lettered option (`b) cat`). Option text is tried first so a
/// one-letter option such as `I` is not read as a letter.
fn resolve_choice(answer: &str, options: &[LetteredOption]) -> Option<usize> {
    let exact = answer.trim().to_lowercase();
    if let Some(index) = options.iter().position(|o| o.text.trim().to_lowercase() == exact) {
        return Some(index);
    }

    if let Some(letter) = LETTER_ONLY
        .captures(answer)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().chars().next())
    {
        let index = (letter.to_ascii_lowercase() as usize).checked_sub('a' as usize)?;
        return (index < options.len()).then_some(index);
    }

    let text = LETTER_PREFIX
        .captures(answer)
        .and_then(|caps| caps.get(1))
        .map_or(answer, |m| m.as_str())
        .trim()
        .to_lowercase();
    options.iter().position(|o| o.text.to_lowercase() == text)
}

fn drag_and_drop(main: &str) -> QuestionKind {
    // Explicit `Items:` / `Targets:` lists fix the order; pairs fill in the rest.
    let mut items = labeled_value(main, "Items")
        .map(|list| parse_comma_list(&list))
        .unwrap_or_default();
    let mut targets = labeled_value(main, "Targets")
        .map(|list| parse_comma_list(&list))
        .unwrap_or_default();
    let mut answer = BTreeMap::new();

    for caps in PAIR_LINE.captures_iter(main) {
        let (Some(item), Some(target)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let item = clean_token(item.as_str());
        let target = clean_token(target.as_str());
        if !items.contains(&item) {
            items.push(item.clone());
        }
        if !targets.contains(&target) {
            targets.push(target.clone());
        }
        answer.insert(item, target);
    }

    QuestionKind::DragAndDrop {
        items,
        targets,
        answer,
    }
}

fn sentence_builder(main: &str, answer: Option<&str>) -> QuestionKind {
    let answer: Vec<String> = match answer {
        Some(a) if a.contains(',') => parse_comma_list(a),
        Some(a) => a.split_whitespace().map(str::to_string).collect(),
        None => Vec::new(),
    };
    let words = labeled_value(main, "Words")
        .map(|w| parse_comma_list(&w))
        .filter(|w| !w.is_empty())
        .unwrap_or_else(|| answer.clone());

    QuestionKind::SentenceBuilder { words, answer }
}

fn hints(rest: &str) -> Vec<String> {
    rest.lines()
        .filter_map(|line| HINT_LINE.captures(line))
        .filter_map(|caps| caps.get(1))
        .map(|m| strip_quotes(m.as_str()).trim().to_string())
        .filter(|h| !h.is_empty())
        .collect()
}

fn feedback(rest: &str, label: &str) -> Option<String> {
    labeled_value(rest, label)
        .map(|f| strip_quotes(&f).trim().to_string())
        .filter(|f| !f.is_empty())
}

fn clean_token(text: &str) -> String {
    strip_quotes(text.trim().trim_matches('*').trim()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CorrectAnswer;

    fn parse(body: &str) -> (Vec<Question>, Diagnostics) {
        let mut diags = Diagnostics::new();
        let questions = parse_questions(body, "Exercise 1", &mut diags);
        (questions, diags)
    }

    // ------------------------------------------------------------------------
    // Multiple choice
    // ------------------------------------------------------------------------

    #[test]
    fn test_multiple_choice_with_check_mark() {
        let body = "1. **What is 2 + 2?**\n   - a) 3\n   - b) 4 ✓\n   - c) 5\n";
        let (questions, diags) = parse(body);
        assert_eq!(questions.len(), 1);
        let q = &questions[0];
        assert_eq!(q.question_text, "What is 2 + 2?");
        assert_eq!(
            q.question_data,
            QuestionKind::MultipleChoice {
                options: vec!["3".into(), "4".into(), "5".into()],
                correct_index: Some(1),
            }
        );
        assert_eq!(q.correct_answer(), CorrectAnswer::Text("4".into()));
        assert!(diags.is_clean());
    }

    #[test]
    fn test_explicit_answer_beats_check_mark() {
        let body = "1. **Pick**\n   - a) x ✓\n   - b) y\n   Answer: b\n";
        let (questions, _) = parse(body);
        assert_eq!(questions[0].correct_answer(), CorrectAnswer::Text("y".into()));
    }

    #[test]
    fn test_answer_by_option_text() {
        let body = "1. **Pick**\n   - a) Cat\n   - b) Dog\n   Correct Answer: b) dog\n";
        let (questions, _) = parse(body);
        assert_eq!(questions[0].correct_answer(), CorrectAnswer::Text("Dog".into()));
    }

    #[test]
    fn test_unresolved_answer_warns() {
        let body = "1. **Pick**\n   - a) Cat\n   - b) Dog\n   Answer: Bird\n";
        let (questions, diags) = parse(body);
        assert!(matches!(
            questions[0].question_data,
            QuestionKind::MultipleChoice {
                correct_index: None,
                ..
            }
        ));
        assert_eq!(diags.warnings.len(), 1);
        assert_eq!(diags.warnings[0].kind, WarningKind::Content);
    }

    #[test]
    fn test_unresolved_answer_falls_back_to_check_mark() {
        let body = "1. **Which is a noun?**\n   - a) run\n   - b) cat ✓\n   Answer: the cat\n";
        let (questions, diags) = parse(body);
        assert_eq!(
            questions[0].question_data,
            QuestionKind::MultipleChoice {
                options: vec!["run".into(), "cat".into()],
                correct_index: Some(1),
            }
        );
        assert_eq!(diags.warnings.len(), 1);
        assert_eq!(diags.warnings[0].kind, WarningKind::Content);
    }

    #[test]
    fn test_single_letter_option_text_matches_before_letter() {
        let body = "1. **Which pronoun is first person?**\n   - a) I\n   - b) you\n   Answer: I\n";
        let (questions, diags) = parse(body);
        assert!(matches!(
            questions[0].question_data,
            QuestionKind::MultipleChoice {
                correct_index: Some(0),
                ..
            }
        ));
        assert!(diags.is_clean());
    }

    #[test]
    fn test_no_answer_is_empty() {
        let body = "1. **Pick**\n   - a) Cat\n   - b) Dog\n";
        let (questions, _) = parse(body);
        assert_eq!(questions[0].correct_answer(), CorrectAnswer::Text(String::new()));
    }

    // ------------------------------------------------------------------------
    // Segmentation, hints, feedback
    // ------------------------------------------------------------------------

    #[test]
    fn test_multiple_questions_segmented() {
        let body = "1. **First?**\n   - a) yes ✓\n   - b) no\n\n2. **Second?**\n   - a) up\n   - b) down ✓\n";
        let (questions, _) = parse(body);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].question_text, "Second?");
        assert_eq!(questions[1].correct_answer(), CorrectAnswer::Text("down".into()));
    }

    #[test]
    fn test_hints_and_feedback() {
        let body = "1. **Which is a noun?**\n   - a) run\n   - b) cat ✓\n   Hint: \"It names a thing.\"\n   Hint: \u{201c}Think animals.\u{201d}\n   **Feedback if correct:** Yes!\n   **Feedback if incorrect:** \"Not quite.\"\n";
        let (questions, _) = parse(body);
        let q = &questions[0];
        assert_eq!(q.hints, vec!["It names a thing.", "Think animals."]);
        assert_eq!(q.correct_feedback.as_deref(), Some("Yes!"));
        assert_eq!(q.incorrect_feedback.as_deref(), Some("Not quite."));
    }

    #[test]
    fn test_question_label_uses_tail_as_stem() {
        let body = "1. **Question 1:** What color is the sky?\n   - a) blue ✓\n";
        let (questions, _) = parse(body);
        assert_eq!(questions[0].question_text, "What color is the sky?");
    }

    #[test]
    fn test_feedback_text_does_not_drive_inference() {
        let body = "1. **Name a noun.**\n   **Feedback if incorrect:** Drag your eyes back to the lesson.\n";
        let (questions, _) = parse(body);
        assert_eq!(questions[0].question_type(), QuestionType::MultipleChoice);
    }

    #[test]
    fn test_no_questions() {
        let (questions, diags) = parse("Just instructions.\n\n1. Step one\n2. Step two\n");
        assert!(questions.is_empty());
        assert!(diags.is_clean());
    }

    // ------------------------------------------------------------------------
    // Other types
    // ------------------------------------------------------------------------

    #[test]
    fn test_fill_in_blank() {
        let body = "1. **The cat ___ on the mat and ___ there.**\n   Answer: sat; stayed\n";
        let (questions, _) = parse(body);
        assert_eq!(questions[0].question_type(), QuestionType::FillInBlank);
        assert_eq!(
            questions[0].correct_answer(),
            CorrectAnswer::List(vec!["sat".into(), "stayed".into()])
        );
    }

    #[test]
    fn test_drag_and_drop() {
        let body = "1. **Drag each word to its part of speech.**\n   - cat -> noun\n   - run → verb\n   Targets: noun, verb, adjective\n";
        let (questions, _) = parse(body);
        match &questions[0].question_data {
            QuestionKind::DragAndDrop {
                items,
                targets,
                answer,
            } => {
                assert_eq!(items, &vec!["cat".to_string(), "run".to_string()]);
                assert_eq!(targets.len(), 3);
                assert_eq!(answer.get("run").map(String::as_str), Some("verb"));
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn test_sentence_builder() {
        let body = "1. **Arrange the words into a sentence.**\n   Words: dog, the, barks\n   Answer: The dog barks\n";
        let (questions, _) = parse(body);
        assert_eq!(
            questions[0].question_data,
            QuestionKind::SentenceBuilder {
                words: vec!["dog".into(), "the".into(), "barks".into()],
                answer: vec!["The".into(), "dog".into(), "barks".into()],
            }
        );
    }

    #[test]
    fn test_declared_essay() {
        let body = "1. **Describe your favorite animal.**\n   Question Type: essay\n   Rubric: Uses three nouns\n";
        let (questions, _) = parse(body);
        assert_eq!(
            questions[0].question_data,
            QuestionKind::Essay {
                rubric: Some("Uses three nouns".into()),
                sample_answer: None,
            }
        );
    }

    #[test]
    fn test_unknown_declared_type_warns_and_infers() {
        let body = "1. **Pick**\n   Question Type: riddle\n   - a) x ✓\n";
        let (questions, diags) = parse(body);
        assert_eq!(questions[0].question_type(), QuestionType::MultipleChoice);
        assert_eq!(diags.warnings[0].kind, WarningKind::Format);
    }

    #[test]
    fn test_default_multiple_choice_without_options_warns() {
        let body = "1. **Why is the sky blue?**\n";
        let (questions, diags) = parse(body);
        assert_eq!(questions[0].question_type(), QuestionType::MultipleChoice);
        assert_eq!(diags.warnings.len(), 1);
    }
}
