//! Property-based tests for chatwindow.
//!
//! These tests generate random inputs to find edge cases.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use unicode_general_category::{GeneralCategory, get_general_category};

use chatwindow::Message;
use chatwindow::config::WindowOptions;
use chatwindow::core::anonymize::canonical_name;
use chatwindow::core::filter::is_excluded;
use chatwindow::core::sanitize::{normalize_name, sanitize};
use chatwindow::core::tokens::{HeuristicCounter, TokenCounter};
use chatwindow::core::window::{WindowResult, build_window, render_line};
use chatwindow::events::NullSink;

const SENDERS: &[&str] = &["Alice", "Bob", "bob!", "Charlie", "Иван", "User 🎉", "🔥"];

const CONTENTS: &[&str] = &[
    "Hello",
    "Hi there!",
    "Привет мир",
    "see https://example.com/x?y=1 ok",
    "<b>bold</b>&nbsp;text",
    "line\nbreak",
    "",
    "   ",
    "a  much   longer    message with several words in it",
    "🎉🔥💀 emoji",
];

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Random (sender, content, minute offset) picks; fast, no regex strategies.
fn arb_message() -> impl Strategy<Value = (usize, usize, i64)> {
    (0..SENDERS.len(), 0..CONTENTS.len(), 0i64..10_000)
}

/// Generate a vector of random messages, indexed in file order
fn arb_messages(max_len: usize) -> impl Strategy<Value = Vec<Message>> {
    prop::collection::vec(arb_message(), 1..max_len).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(index, (sender, content, minutes))| {
                Message::new(
                    SENDERS[sender],
                    CONTENTS[content],
                    base_time() + chrono::Duration::minutes(minutes),
                )
                .with_index(index)
            })
            .collect()
    })
}

/// Lines of `content` with the trailing newline restored.
fn lines(content: &str) -> Vec<String> {
    content.lines().map(|line| format!("{line}\n")).collect()
}

/// Renders every non-empty message newest first, as the window builder sees
/// them.
fn candidate_costs(messages: &[Message], result: &WindowResult) -> Vec<usize> {
    let mut sorted = messages.to_vec();
    sorted.sort_by(Message::chronological_cmp);
    sorted
        .iter()
        .rev()
        .filter_map(|msg| {
            let text = sanitize(msg.content());
            if text.is_empty() {
                return None;
            }
            let name = canonical_name(msg.sender());
            let code = result.codebook.code_for(&name)?;
            Some(HeuristicCounter.count(&render_line(code, &text, msg.timestamp(), false)))
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn sanitize_is_idempotent(text in any::<String>()) {
        let once = sanitize(&text);
        prop_assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn sanitize_is_idempotent_on_markup(
        parts in prop::collection::vec(
            prop::sample::select(vec![
                "<", ">", "<b>", "https://", "http://a.b", "%2F", "&lt;br&gt;",
                "&nbsp;", "\n", "\r\n", " ", "  ", "word", "Привет", "&", ";",
            ]),
            0..30,
        )
    ) {
        let text: String = parts.concat();
        let once = sanitize(&text);
        prop_assert_eq!(sanitize(&once), once.clone());
        prop_assert!(!once.contains("  "));
        prop_assert_eq!(once.trim(), once.as_str());
    }

    #[test]
    fn normalized_names_have_no_punctuation(name in any::<String>()) {
        let normalized = normalize_name(&name);
        prop_assert!(normalized.chars().all(|c| c == ' ' || matches!(
            get_general_category(c),
            GeneralCategory::UppercaseLetter
                | GeneralCategory::LowercaseLetter
                | GeneralCategory::TitlecaseLetter
                | GeneralCategory::ModifierLetter
                | GeneralCategory::OtherLetter
                | GeneralCategory::DecimalNumber
                | GeneralCategory::LetterNumber
                | GeneralCategory::OtherNumber
        )));
        prop_assert!(!normalized.contains("  "));
        prop_assert_eq!(normalize_name(&normalized), normalized.clone());
    }

    #[test]
    fn window_respects_budget_and_is_greedy_maximal(
        messages in arb_messages(40),
        budget in 1usize..200,
    ) {
        let options = WindowOptions::new(budget);
        let Ok(result) = build_window(messages.clone(), &options, &HeuristicCounter, &NullSink) else {
            return Ok(());
        };

        let total: usize = lines(&result.content)
            .iter()
            .map(|line| HeuristicCounter.count(line))
            .sum();
        prop_assert_eq!(total, result.token_count);
        prop_assert!(result.token_count <= budget);

        // The selection is exactly the longest newest-first prefix that fits
        let costs = candidate_costs(&messages, &result);
        let mut running = 0;
        let mut expected = 0;
        for cost in costs {
            if running + cost > budget {
                break;
            }
            running += cost;
            expected += 1;
        }
        prop_assert_eq!(result.messages_included, expected);
    }

    #[test]
    fn codebook_is_a_bijection(messages in arb_messages(40)) {
        let options = WindowOptions::new(1_000_000);
        let Ok(result) = build_window(messages.clone(), &options, &HeuristicCounter, &NullSink) else {
            return Ok(());
        };

        let expected: BTreeSet<String> =
            messages.iter().map(|m| canonical_name(m.sender())).collect();
        let decoded: BTreeSet<String> =
            result.codebook.iter().map(|(_, name)| name.to_string()).collect();
        prop_assert_eq!(&decoded, &expected);

        let codes: HashSet<&str> = result.codebook.iter().map(|(code, _)| code).collect();
        prop_assert_eq!(codes.len(), result.codebook.len());

        for line in result.content.lines() {
            let code = line.split(": ").next().unwrap_or_default();
            prop_assert!(result.codebook.name_for(code).is_some());
        }
    }

    #[test]
    fn excluded_senders_never_appear(
        messages in arb_messages(40),
        excluded in prop::sample::select(SENDERS.to_vec()),
    ) {
        let options = WindowOptions::new(1_000_000)
            .with_anonymize(false)
            .with_excluded_sender(excluded);
        let set: BTreeSet<String> = options.excluded_senders.clone();

        let Ok(result) = build_window(messages.clone(), &options, &HeuristicCounter, &NullSink) else {
            return Ok(());
        };

        let excluded_names: BTreeSet<String> = messages
            .iter()
            .filter(|m| is_excluded(m, &set))
            .map(|m| canonical_name(m.sender()))
            .collect();

        for line in result.content.lines() {
            let name = line.split(": ").next().unwrap_or_default();
            prop_assert!(!excluded_names.contains(name));
        }

        let anonymized = build_window(
            messages,
            &options.clone().with_anonymize(true),
            &HeuristicCounter,
            &NullSink,
        );
        if let Ok(anonymized) = anonymized {
            for name in &excluded_names {
                prop_assert!(anonymized.codebook.code_for(name).is_none());
            }
        }
    }
}
