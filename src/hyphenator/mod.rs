//! Liang's hyphenation scan over a compiled automaton.
//!
//! The word is bracketed with the boundary marker, then the automaton
//! is walked from every permitted start offset while the priority
//! vectors of visited states merge into a per-slot maximum.

pub mod folding;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::automaton::{Automaton, ROOT_STATE};
use crate::constants::WORD_BOUNDARY;
use crate::types::Priority;

use self::folding::CaseFolding;

/// Finetuning configuration of the hyphenation scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HyphenatorConfig {
    /// Case folding applied to each character before lookup; must
    /// match the folding the pattern data was compiled with.
    #[serde(default)]
    pub case_folding: CaseFolding,
}

/// Computes permitted hyphenation points for words against a compiled
/// pattern automaton.
///
/// Immutable and freely shareable across threads once constructed;
/// each call allocates only its own scratch buffers.
#[derive(Debug)]
pub struct Hyphenator<A: Automaton> {
    automaton: A,
    config: HyphenatorConfig,
}

impl<A: Automaton> Hyphenator<A> {
    /// Wraps a compiled automaton with the default configuration.
    pub fn new(automaton: A) -> Self {
        Self::with_config(automaton, HyphenatorConfig::default())
    }

    /// Wraps a compiled automaton with an explicit configuration.
    pub fn with_config(automaton: A, config: HyphenatorConfig) -> Self {
        Hyphenator { automaton, config }
    }

    /// The wrapped automaton.
    pub fn automaton(&self) -> &A {
        &self.automaton
    }

    /// The active configuration.
    pub fn config(&self) -> &HyphenatorConfig {
        &self.config
    }

    /// Returns the strongest known priority for every inter-letter
    /// slot of `word`: entry `i` covers the slot between `word[i]` and
    /// `word[i + 1]`, odd values license a break. The result has
    /// `max(0, |word| − 1)` entries; words shorter than two characters
    /// yield an empty vector, and a word hitting no pattern yields all
    /// zeroes.
    ///
    /// # Examples
    ///
    /// ```
    /// use liang::automaton::PackedAutomaton;
    /// use liang::hyphenator::Hyphenator;
    ///
    /// let automaton = PackedAutomaton::from_patterns([".hy3p"]).unwrap();
    /// let hyphenator = Hyphenator::new(automaton);
    ///
    /// assert_eq!(
    ///     hyphenator.hyphenate("hyphenation"),
    ///     vec![0, 3, 0, 0, 0, 0, 0, 0, 0, 0]
    /// );
    /// ```
    pub fn hyphenate(&self, word: &str) -> Vec<Priority> {
        let folding = self.config.case_folding;
        let mut extended: Vec<char> = Vec::with_capacity(word.len() + 2);
        extended.push(WORD_BOUNDARY);
        extended.extend(word.chars().map(|c| folding.fold(c)));
        extended.push(WORD_BOUNDARY);

        let letters = extended.len() - 2;
        if letters < 2 {
            return Vec::new();
        }
        trace!("scanning {word:?} over {} start offsets", extended.len() - 1);

        let mut merged: Vec<Priority> = vec![0; letters - 1];
        for start in 0..extended.len() - 1 {
            let edge_start = start == letters;
            let mut state = ROOT_STATE;
            for pos in start..extended.len() {
                let Some(next) = self.automaton.transition(state, extended[pos]) else {
                    break;
                };
                // a terminal reached in a single step from the final
                // letter is a one-letter match whose only in-range
                // priority sits on the slot the word edge closes off;
                // it is skipped, while longer matches from the same
                // offset, continuing into the trailing boundary, merge
                // as usual
                if !(edge_start && pos == start) {
                    if let Some(vector) = self.automaton.priorities(next) {
                        for (i, &priority) in vector.iter().enumerate() {
                            // slot i of the vector lands at inter-letter
                            // position start + i - 2; out-of-range slots
                            // are edge priorities and are skipped
                            let Some(slot) = (start + i).checked_sub(2) else {
                                continue;
                            };
                            if slot < merged.len() && priority > merged[slot] {
                                merged[slot] = priority;
                            }
                        }
                    }
                }
                state = next;
            }
        }
        merged
    }

    /// Indices `i` such that a hyphen may be inserted between
    /// `word[i]` and `word[i + 1]`.
    pub fn hyphenation_points(&self, word: &str) -> Vec<usize> {
        self.hyphenate(word)
            .iter()
            .enumerate()
            .filter(|&(_, &priority)| priority % 2 == 1)
            .map(|(i, _)| i)
            .collect()
    }

    /// Renders `word` with `separator` inserted at every permitted
    /// break.
    pub fn hyphenated(&self, word: &str, separator: &str) -> String {
        let priorities = self.hyphenate(word);
        let mut out = String::with_capacity(word.len() + separator.len() * 4);
        for (i, c) in word.chars().enumerate() {
            out.push(c);
            if i < priorities.len() && priorities[i] % 2 == 1 {
                out.push_str(separator);
            }
        }
        out
    }

    /// Renders every word of `text` with `separator` inserted at its
    /// permitted breaks. Words are maximal runs of alphabetic
    /// characters; everything between them is copied verbatim.
    pub fn hyphenate_text(&self, text: &str, separator: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find(|c: char| c.is_alphabetic()) {
            let (head, tail) = rest.split_at(start);
            out.push_str(head);
            let end = tail
                .find(|c: char| !c.is_alphabetic())
                .unwrap_or(tail.len());
            let (word, tail) = tail.split_at(end);
            out.push_str(&self.hyphenated(word, separator));
            rest = tail;
        }
        out.push_str(rest);
        out
    }
}
