//! Core types shared across the crate.

/// One code unit in the Basic Multilingual Plane.
///
/// Patterns and query words are sequences of these; the crate treats
/// them as opaque apart from the configured case folding.
pub type CharCode = u16;

/// Break priority at an inter-character slot.
///
/// Values run 0..=9; 0 is "no opinion", odd values license a break,
/// even values forbid one, and larger magnitude wins a conflict.
pub type Priority = u8;

/// Index of a state in the packed automaton. State 0 is the root.
pub type StateId = u32;
