//! The packed, read-only pattern automaton and its builder.
//!
//! Building is a distinct mutable phase: an [`AutomatonBuilder`]
//! accumulates patterns into an insertion trie, and `build()` consumes
//! it, freezing the compressed and packed tables into an immutable
//! [`PackedAutomaton`].

mod serial;

pub use serial::FormatError;

use log::debug;

use crate::pattern::{self, PatternError};
use crate::trie::alphabet::CharMapper;
use crate::trie::pack::{self, PackedParts};
use crate::trie::TrieArena;
use crate::types::{Priority, StateId};

/// The root state of every automaton.
pub const ROOT_STATE: StateId = 0;

/// Read-only transition lookup over a compiled pattern set.
///
/// The packed implementation is [`PackedAutomaton`]; the trait is the
/// seam that lets the hyphenation scan run against any equivalent
/// representation.
pub trait Automaton {
    /// Follows the transition from `state` on `c`, if one exists.
    fn transition(&self, state: StateId, c: char) -> Option<StateId>;

    /// The merged priority vector of the patterns terminating at
    /// `state`, if any.
    fn priorities(&self, state: StateId) -> Option<&[Priority]>;
}

/// Errors raised while compiling a pattern set.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A pattern failed to parse.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// The pattern set compiles to more states than a packed entry
    /// can address.
    #[error("pattern set compiles to {states} states, more than the {max} a packed entry can address")]
    StateOverflow {
        /// Canonical states the pattern set produced.
        states: usize,
        /// Largest representable state count.
        max: usize,
    },
}

/// A compiled pattern set in double-array layout.
///
/// Immutable after construction; concurrent lookups from multiple
/// threads need no coordination.
#[derive(Debug)]
pub struct PackedAutomaton {
    pub(crate) data: Vec<u32>,
    pub(crate) bases: Vec<u32>,
    pub(crate) mapper: CharMapper,
    pub(crate) priorities: Vec<Option<Box<[Priority]>>>,
}

impl PackedAutomaton {
    /// Compiles an automaton from pattern strings.
    ///
    /// # Examples
    ///
    /// ```
    /// use liang::automaton::PackedAutomaton;
    ///
    /// let automaton = PackedAutomaton::from_patterns([".hy3p", "he2n"]).unwrap();
    /// // NUL, '.', 'e', 'h', 'n', 'p', 'y'
    /// assert_eq!(automaton.alphabet_size(), 7);
    /// ```
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = AutomatonBuilder::new();
        for p in patterns {
            builder.push_pattern(p.as_ref())?;
        }
        builder.build()
    }

    /// Compiles an automaton from pattern strings and hyphenated
    /// exception words.
    pub fn from_patterns_and_exceptions<I, S, J, T>(
        patterns: I,
        exceptions: J,
    ) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        J: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut builder = AutomatonBuilder::new();
        for p in patterns {
            builder.push_pattern(p.as_ref())?;
        }
        for e in exceptions {
            builder.push_exception(e.as_ref())?;
        }
        builder.build()
    }

    /// Number of states.
    pub fn num_states(&self) -> usize {
        self.bases.len()
    }

    /// Length of the packed transition array.
    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    /// Number of distinct characters in the alphabet.
    pub fn alphabet_size(&self) -> usize {
        self.mapper.alphabet_size() as usize
    }

    /// Heap memory held by the automaton tables.
    pub fn heap_bytes(&self) -> usize {
        self.data.len() * std::mem::size_of::<u32>()
            + self.bases.len() * std::mem::size_of::<u32>()
            + self.mapper.heap_bytes()
            + self
                .priorities
                .iter()
                .map(|v| v.as_deref().map_or(0, <[Priority]>::len))
                .sum::<usize>()
    }
}

impl Automaton for PackedAutomaton {
    #[inline(always)]
    fn transition(&self, state: StateId, c: char) -> Option<StateId> {
        let code = self.mapper.code(c)?;
        let slot = self.bases[state as usize] as usize + code as usize;
        if slot >= self.data.len() {
            return None;
        }
        let entry = self.data[slot];
        // an all-zero word is an empty slot; the stored character must
        // match to reject slots claimed by another state's base
        if entry != 0 && pack::entry_char(entry) == c as u32 {
            Some(pack::entry_target(entry))
        } else {
            None
        }
    }

    #[inline(always)]
    fn priorities(&self, state: StateId) -> Option<&[Priority]> {
        self.priorities[state as usize].as_deref()
    }
}

/// Accumulates patterns and exceptions, then compiles them into a
/// [`PackedAutomaton`].
pub struct AutomatonBuilder {
    arena: TrieArena,
    pattern_count: usize,
}

impl AutomatonBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        AutomatonBuilder {
            arena: TrieArena::new(),
            pattern_count: 0,
        }
    }

    /// Parses and inserts one pattern string.
    pub fn push_pattern(&mut self, source: &str) -> Result<(), BuildError> {
        let parsed = pattern::parse(source)?;
        self.arena.insert(&parsed);
        self.pattern_count += 1;
        Ok(())
    }

    /// Rewrites and inserts one hyphenated exception word.
    pub fn push_exception(&mut self, word: &str) -> Result<(), BuildError> {
        self.push_pattern(&pattern::rewrite_exception(word))
    }

    /// Compresses, packs and freezes the accumulated patterns.
    pub fn build(mut self) -> Result<PackedAutomaton, BuildError> {
        self.arena.compress();
        let mapper = CharMapper::from_arena(&self.arena);
        let PackedParts {
            data,
            bases,
            priorities,
        } = pack::pack(&self.arena, &mapper)?;
        debug!(
            "compiled {} patterns into {} states, {} packed slots, {} alphabet characters",
            self.pattern_count,
            bases.len(),
            data.len(),
            mapper.alphabet_size()
        );
        Ok(PackedAutomaton {
            data,
            bases,
            mapper,
            priorities,
        })
    }
}

impl Default for AutomatonBuilder {
    fn default() -> Self {
        Self::new()
    }
}
