//! Lookup of precompiled pattern payloads by language tag.
//!
//! The crate ships no language data; consumers register the payloads
//! they embed (typically with `include_bytes!`) and load them by tag.

use std::borrow::Cow;

use hashbrown::HashMap;
use log::debug;
use smol_str::SmolStr;

use crate::automaton::{FormatError, PackedAutomaton};
use crate::hyphenator::Hyphenator;

/// Languages with published pattern payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Language {
    /// British English.
    EnGb,
}

impl Language {
    /// The tag this language is registered under.
    pub const fn tag(self) -> &'static str {
        match self {
            Language::EnGb => "en-gb",
        }
    }

    /// Resolves a tag back to a known language.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "en-gb" => Some(Language::EnGb),
            _ => None,
        }
    }

    /// The conventional asset name of this language's payload inside a
    /// consumer's bundle, `<prefix>.Data.<tag>.bin`.
    pub fn resource_name(self, prefix: &str) -> String {
        format!("{}.Data.{}.bin", prefix, self.tag())
    }
}

/// Errors raised while loading a payload from a bundle.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// No payload is registered under the requested tag.
    #[error("no pattern payload for {tag:?}; available: [{}]", .available.join(", "))]
    MissingResource {
        /// The tag that was asked for.
        tag: SmolStr,
        /// Every registered tag, sorted.
        available: Vec<SmolStr>,
    },

    /// The payload failed to decode.
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// A registry of serialized pattern payloads keyed by language tag.
#[derive(Default)]
pub struct PatternBundle {
    payloads: HashMap<SmolStr, Cow<'static, [u8]>>,
}

impl PatternBundle {
    /// An empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a payload under `tag`, replacing any previous one.
    pub fn register(&mut self, tag: &str, payload: impl Into<Cow<'static, [u8]>>) {
        self.payloads.insert(SmolStr::new(tag), payload.into());
    }

    /// Tags with a registered payload, in sorted order.
    pub fn available(&self) -> Vec<SmolStr> {
        let mut tags: Vec<SmolStr> = self.payloads.keys().cloned().collect();
        tags.sort();
        tags
    }

    /// Decodes the payload registered under `tag` into a ready-to-use
    /// hyphenator.
    pub fn load(&self, tag: &str) -> Result<Hyphenator<PackedAutomaton>, BundleError> {
        let payload = self
            .payloads
            .get(tag)
            .ok_or_else(|| BundleError::MissingResource {
                tag: SmolStr::new(tag),
                available: self.available(),
            })?;
        debug!("loading pattern payload for {tag:?} ({} bytes)", payload.len());
        let automaton = PackedAutomaton::from_bytes(payload)?;
        Ok(Hyphenator::new(automaton))
    }

    /// Loads the payload of a known [`Language`].
    pub fn load_language(&self, language: Language) -> Result<Hyphenator<PackedAutomaton>, BundleError> {
        self.load(language.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> Vec<u8> {
        PackedAutomaton::from_patterns_and_exceptions([".hy3p"], ["uni-ver-sity"])
            .unwrap()
            .to_bytes()
            .unwrap()
    }

    #[test]
    fn registered_payloads_load() {
        let mut bundle = PatternBundle::new();
        bundle.register("en-gb", payload());
        let hyphenator = bundle.load_language(Language::EnGb).unwrap();
        assert_eq!(hyphenator.hyphenated("university", "-"), "uni-ver-sity");
    }

    #[test]
    fn unknown_tags_list_what_is_available() {
        let mut bundle = PatternBundle::new();
        bundle.register("en-gb", payload());
        bundle.register("de", payload());
        match bundle.load("fi").err() {
            Some(BundleError::MissingResource { tag, available }) => {
                assert_eq!(tag, "fi");
                assert_eq!(available, vec![SmolStr::new("de"), SmolStr::new("en-gb")]);
            }
            other => panic!("expected MissingResource, got {other:?}"),
        }
    }

    #[test]
    fn missing_resource_message_enumerates_tags() {
        let mut bundle = PatternBundle::new();
        bundle.register("en-gb", payload());
        let message = bundle.load("sv").unwrap_err().to_string();
        assert!(message.contains("sv"));
        assert!(message.contains("en-gb"));
    }

    #[test]
    fn corrupt_payloads_surface_format_errors() {
        let mut bundle = PatternBundle::new();
        bundle.register("en-gb", vec![0u8; 16]);
        assert!(matches!(
            bundle.load("en-gb").err(),
            Some(BundleError::Format(_))
        ));
    }

    #[test]
    fn tags_and_resource_names_round_trip() {
        assert_eq!(Language::EnGb.tag(), "en-gb");
        assert_eq!(Language::from_tag("en-gb"), Some(Language::EnGb));
        assert_eq!(Language::from_tag("xx"), None);
        assert_eq!(
            Language::EnGb.resource_name("Liang"),
            "Liang.Data.en-gb.bin"
        );
    }
}
