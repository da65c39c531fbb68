//! First-fit packing of the compressed trie into a flat transition
//! array with per-state base offsets.

use hashbrown::HashMap;

use crate::automaton::BuildError;
use crate::constants::MAX_STATES;
use crate::types::{CharCode, Priority, StateId};

use super::alphabet::CharMapper;
use super::{NodeId, TrieArena};

/// The flat tables produced by packing, ready to be frozen into an
/// automaton.
pub(crate) struct PackedParts {
    pub data: Vec<u32>,
    pub bases: Vec<u32>,
    pub priorities: Vec<Option<Box<[Priority]>>>,
}

/// Packed transition entry: character code in the low 16 bits,
/// destination state above. The all-zero word is an empty slot; no
/// real entry is zero because the root is never a transition target.
#[inline(always)]
pub(crate) const fn make_entry(target: StateId, ch: CharCode) -> u32 {
    (target << 16) | ch as u32
}

#[inline(always)]
pub(crate) const fn entry_char(entry: u32) -> u32 {
    entry & 0xffff
}

#[inline(always)]
pub(crate) const fn entry_target(entry: u32) -> StateId {
    entry >> 16
}

/// Assigns every canonical state a base offset by first fit and lays
/// its transitions into the shared data array.
pub(crate) fn pack(arena: &TrieArena, mapper: &CharMapper) -> Result<PackedParts, BuildError> {
    // enumerate canonical states; the root is state 0, the rest follow
    // in discovery order over child edges
    let mut state_of: HashMap<NodeId, StateId> = HashMap::new();
    let mut nodes: Vec<NodeId> = vec![arena.root()];
    state_of.insert(arena.root(), 0);
    let mut stack = vec![arena.root()];
    while let Some(id) = stack.pop() {
        for (_, child) in arena.children(id) {
            if !state_of.contains_key(&child) {
                state_of.insert(child, nodes.len() as StateId);
                nodes.push(child);
                stack.push(child);
            }
        }
    }
    if nodes.len() > MAX_STATES {
        return Err(BuildError::StateOverflow {
            states: nodes.len(),
            max: MAX_STATES,
        });
    }

    let transitions: Vec<Vec<(CharCode, u32, StateId)>> = nodes
        .iter()
        .map(|&id| {
            arena
                .children(id)
                .map(|(ch, child)| (ch, mapper.code_unit(ch).unwrap(), state_of[&child]))
                .collect()
        })
        .collect();

    // hardest states first, while the data array is still empty
    let mut order: Vec<usize> = (0..nodes.len()).collect();
    order.sort_by(|&a, &b| {
        transitions[b]
            .len()
            .cmp(&transitions[a].len())
            .then(a.cmp(&b))
    });

    let mut data: Vec<u32> = Vec::new();
    let mut bases: Vec<u32> = vec![0; nodes.len()];
    let mut used_bases: Vec<bool> = Vec::new();
    let mut search_start: usize = 0;
    let mut last_slot: Option<usize> = None;

    let base_used = |used: &Vec<bool>, b: usize| used.get(b).copied().unwrap_or(false);
    let slot_occupied = |data: &Vec<u32>, s: usize| data.get(s).is_some_and(|&e| e != 0);

    for &q in &order {
        let mut base = search_start;
        loop {
            if !base_used(&used_bases, base)
                && transitions[q]
                    .iter()
                    .all(|&(_, code, _)| !slot_occupied(&data, base + code as usize))
            {
                break;
            }
            base += 1;
        }

        bases[q] = base as u32;
        if used_bases.len() <= base {
            used_bases.resize(base + 1, false);
        }
        used_bases[base] = true;
        while base_used(&used_bases, search_start) {
            search_start += 1;
        }

        for &(ch, code, target) in &transitions[q] {
            let slot = base + code as usize;
            if slot >= data.len() {
                let grown = (slot + 1).max(data.len() * 2);
                data.resize(grown, 0);
            }
            debug_assert_eq!(data[slot], 0);
            data[slot] = make_entry(target, ch);
            last_slot = Some(last_slot.map_or(slot, |m| m.max(slot)));
        }
    }

    data.truncate(last_slot.map_or(0, |m| m + 1));

    let priorities = nodes
        .iter()
        .map(|&id| arena.node(id).priorities.clone())
        .collect();

    Ok(PackedParts {
        data,
        bases,
        priorities,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern;

    fn packed(patterns: &[&str]) -> (TrieArena, CharMapper, PackedParts) {
        let mut arena = TrieArena::new();
        for p in patterns {
            arena.insert(&pattern::parse(p).unwrap());
        }
        arena.compress();
        let mapper = CharMapper::from_arena(&arena);
        let parts = pack(&arena, &mapper).unwrap();
        (arena, mapper, parts)
    }

    fn lookup(parts: &PackedParts, mapper: &CharMapper, state: StateId, c: char) -> Option<StateId> {
        let code = mapper.code(c)?;
        let slot = parts.bases[state as usize] as usize + code as usize;
        let entry = *parts.data.get(slot)?;
        (entry != 0 && entry_char(entry) == c as u32).then(|| entry_target(entry))
    }

    #[test]
    fn every_pattern_path_is_reachable() {
        let sources = ["hy3ph", "he2n", "hena4", "hen5at", ".hy3p"];
        let (_, mapper, parts) = packed(&sources);
        for source in sources {
            let parsed = pattern::parse(source).unwrap();
            let mut state = 0;
            for &ch in &parsed.chars {
                let c = char::from_u32(u32::from(ch)).unwrap();
                state = lookup(&parts, &mapper, state, c).unwrap();
            }
            let stored = parts.priorities[state as usize].as_deref().unwrap();
            for (i, &p) in parsed.priorities.iter().enumerate() {
                assert!(stored[i] >= p, "slot {i} of {source:?}");
            }
        }
    }

    #[test]
    fn aliased_slots_reject_foreign_characters() {
        let (_, mapper, parts) = packed(&["ab1c", "b2d", "x9y"]);
        // probing a state with a character of another state's alphabet
        // position must fail the stored-character check
        let b = lookup(&parts, &mapper, 0, 'b').unwrap();
        assert_eq!(lookup(&parts, &mapper, b, 'c'), None);
        assert_eq!(lookup(&parts, &mapper, b, 'b'), None);
        assert!(lookup(&parts, &mapper, b, 'd').is_some());
    }

    #[test]
    fn bases_are_unique_per_state() {
        let (_, _, parts) = packed(&["a1b", "b1c", "c1d", "d1e"]);
        let mut seen = parts.bases.clone();
        seen.sort_unstable();
        let before = seen.len();
        seen.dedup();
        assert_eq!(seen.len(), before);
    }

    #[test]
    fn data_is_trimmed_to_the_last_occupied_slot() {
        let (_, _, parts) = packed(&["a1b"]);
        assert_ne!(*parts.data.last().unwrap(), 0);
    }

    #[test]
    fn empty_pattern_set_packs_to_a_bare_root() {
        let (_, _, parts) = packed(&[]);
        assert_eq!(parts.bases.len(), 1);
        assert!(parts.data.is_empty());
        assert_eq!(parts.priorities, vec![None]);
    }
}
