//! Dense alphabet index over the characters of the compressed trie.

use itertools::Itertools;

use crate::constants::{BMP_SIZE, INVALID_CODE, INVALID_NODE};
use crate::types::CharCode;

use super::TrieArena;

/// Maps BMP code units to dense alphabet indices.
///
/// The table spans the whole BMP; unassigned entries hold a sentinel
/// so a lookup is one indexed read.
#[derive(Debug)]
pub(crate) struct CharMapper {
    table: Vec<u32>,
    alphabet_size: u32,
}

impl CharMapper {
    /// Collects every node label of the compressed trie, the root's
    /// own NUL label included, and assigns dense indices in ascending
    /// code-point order.
    pub fn from_arena(arena: &TrieArena) -> Self {
        let mut seen = vec![false; BMP_SIZE];
        let mut visited = hashbrown::HashSet::new();
        let mut stack = vec![arena.root()];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let node = arena.node(id);
            seen[node.ch as usize] = true;
            if node.first_child != INVALID_NODE {
                stack.push(node.first_child);
            }
            if node.next_sibling != INVALID_NODE {
                stack.push(node.next_sibling);
            }
        }
        Self::from_chars(
            seen.iter()
                .enumerate()
                .filter(|&(_, &s)| s)
                .map(|(c, _)| c as CharCode),
        )
    }

    pub fn from_chars<I>(chars: I) -> Self
    where
        I: IntoIterator<Item = CharCode>,
    {
        let sorted: Vec<CharCode> = chars.into_iter().sorted().dedup().collect();
        let mut table = vec![INVALID_CODE; BMP_SIZE];
        for (index, &ch) in sorted.iter().enumerate() {
            table[ch as usize] = index as u32;
        }
        CharMapper {
            table,
            alphabet_size: sorted.len() as u32,
        }
    }

    /// Rebuilds a mapper from serialized `(character, index)` pairs.
    pub fn from_assignments(pairs: &[(CharCode, u32)], alphabet_size: u32) -> Self {
        let mut table = vec![INVALID_CODE; BMP_SIZE];
        for &(ch, code) in pairs {
            table[ch as usize] = code;
        }
        CharMapper {
            table,
            alphabet_size,
        }
    }

    /// The dense index of `c`, or `None` when `c` is not in the
    /// alphabet. Code points beyond the BMP are never in the alphabet.
    #[inline(always)]
    pub fn code(&self, c: char) -> Option<u32> {
        self.table
            .get(c as usize)
            .copied()
            .filter(|&code| code != INVALID_CODE)
    }

    /// The dense index of a BMP code unit.
    #[inline(always)]
    pub fn code_unit(&self, ch: CharCode) -> Option<u32> {
        let code = self.table[ch as usize];
        (code != INVALID_CODE).then_some(code)
    }

    #[inline]
    pub const fn alphabet_size(&self) -> u32 {
        self.alphabet_size
    }

    /// Assigned `(character, index)` pairs in ascending character
    /// order.
    pub fn assignments(&self) -> Vec<(CharCode, u32)> {
        self.table
            .iter()
            .enumerate()
            .filter(|&(_, &code)| code != INVALID_CODE)
            .map(|(ch, &code)| (ch as CharCode, code))
            .collect()
    }

    #[inline]
    pub fn heap_bytes(&self) -> usize {
        self.table.len() * std::mem::size_of::<u32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern;

    #[test]
    fn indices_follow_code_point_order() {
        let mapper = CharMapper::from_chars(vec!['z' as u16, 'a' as u16, '.' as u16]);
        assert_eq!(mapper.alphabet_size(), 3);
        assert_eq!(mapper.code('.'), Some(0));
        assert_eq!(mapper.code('a'), Some(1));
        assert_eq!(mapper.code('z'), Some(2));
        assert_eq!(mapper.code('b'), None);
    }

    #[test]
    fn collection_includes_the_root_label() {
        let mut arena = TrieArena::new();
        arena.insert(&pattern::parse("a1b").unwrap());
        arena.compress();
        let mapper = CharMapper::from_arena(&arena);
        // NUL (root), 'a', 'b'
        assert_eq!(mapper.alphabet_size(), 3);
        assert_eq!(mapper.code('\0'), Some(0));
        assert_eq!(mapper.code('a'), Some(1));
    }

    #[test]
    fn supplementary_planes_are_never_in_the_alphabet() {
        let mapper = CharMapper::from_chars(vec!['a' as u16]);
        assert_eq!(mapper.code('𝕏'), None);
    }

    #[test]
    fn assignments_round_trip() {
        let mapper = CharMapper::from_chars(vec!['a' as u16, 'y' as u16, 'h' as u16]);
        let pairs = mapper.assignments();
        assert_eq!(
            pairs,
            vec![('a' as u16, 0), ('h' as u16, 1), ('y' as u16, 2)]
        );
        let rebuilt = CharMapper::from_assignments(&pairs, mapper.alphabet_size());
        assert_eq!(rebuilt.code('h'), Some(1));
        assert_eq!(rebuilt.code('b'), None);
    }
}
