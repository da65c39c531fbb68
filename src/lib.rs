/*! Hyphenation with Liang's competitive patterns.

Compiles a language-specific set of patterns and exceptions into a
compact, read-optimized automaton: an insertion trie is
suffix-compressed into a DAG, packed into a double-array layout with a
dense alphabet index, and frozen. The automaton then answers, for any
word, which inter-letter positions permit a hyphen — the
competitive-pattern algorithm of Liang (1983).

# Usage example

```
use liang::automaton::AutomatonBuilder;
use liang::hyphenator::Hyphenator;

# fn main() -> Result<(), liang::automaton::BuildError> {
let mut builder = AutomatonBuilder::new();
builder.push_pattern(".hy3p")?;
builder.push_exception("uni-ver-sity")?;
let hyphenator = Hyphenator::new(builder.build()?);

assert_eq!(hyphenator.hyphenation_points("hyphenation"), vec![1]);
assert_eq!(hyphenator.hyphenated("university", "-"), "uni-ver-sity");
# Ok(())
# }
```

Compiled automata can be serialized with
[`automaton::PackedAutomaton::write_to`] (a gzip-framed binary format)
and embedded payloads looked up by language tag through a
[`bundle::PatternBundle`].
*/

#![warn(missing_docs)]

pub mod automaton;
pub mod bundle;
pub mod hyphenator;
pub mod pattern;
pub mod types;

pub(crate) mod constants;
pub(crate) mod trie;
