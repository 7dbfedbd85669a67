//! Fixed Morse alphabet
//!
//! The Morse tree is an AVL tree whose in-order sequence is [`PRIORITY`].
//! Several AVL trees share that in-order sequence, so the build also fixes
//! the insertion order ([`BUILD_SEQUENCE`]); inserting level by level
//! never triggers a rotation and reproduces the International Morse tree,
//! with `E` and `T` under an unused root marker.
//!
//! Slots the Morse tree leaves empty are held by filler symbols so that the
//! symbols below them land at the right depth.

use std::cmp::Ordering;

use tracing::debug;

use crate::tree::{Insertion, SearchTree, TreeError};

/// Every symbol of the tree, lowest rank first (in-order sequence).
pub const PRIORITY: &str = "5H4SV3IFU[2ELR+]APWJ1~6B=D/XNCKYT7ZGQM8(O9)0";

/// Insertion order that yields the canonical shape (breadth first).
pub const BUILD_SEQUENCE: &str = "~ETIAMNSURWDKGOHVFLPJBXYCZQ()543[2]+16=/7890";

/// Number of symbols (nodes) in the tree.
pub const ALPHABET_SIZE: usize = 44;

/// Unused symbol held by the root.
pub const ROOT_MARKER: char = '~';

/// Placeholders for unused slots; never encoded.
pub const FILLERS: [char; 5] = [ROOT_MARKER, '(', ')', '[', ']'];

/// `<CT>`: start of transmission, sent without inter-character gaps.
pub const START_OF_TRANSMISSION: &str = "CT";

/// `<SK>`: end of work, sent without inter-character gaps.
pub const END_OF_WORK: &str = "SK";

/// Position of `symbol` in [`PRIORITY`], ignoring ASCII case.
pub fn rank(symbol: char) -> Option<usize> {
    let upper = symbol.to_ascii_uppercase();
    PRIORITY.chars().position(|candidate| candidate == upper)
}

/// Order two symbols by rank, ignoring ASCII case.
///
/// Symbols outside the alphabet sort after every alphabet symbol, among
/// themselves by upper-cased code point, so the order stays total.
pub fn compare(a: &char, b: &char) -> Ordering {
    let key = |symbol: char| {
        let upper = symbol.to_ascii_uppercase();
        (rank(upper).unwrap_or(ALPHABET_SIZE), upper)
    };
    key(*a).cmp(&key(*b))
}

/// Whether `symbol` only exists to hold a slot.
pub fn is_filler(symbol: char) -> bool {
    FILLERS.contains(&symbol)
}

/// Whether `symbol` has a code of its own.
pub fn is_encodable(symbol: char) -> bool {
    !is_filler(symbol) && rank(symbol).is_some()
}

/// Empty tree ordered by symbol rank.
pub fn empty_tree() -> SearchTree<char> {
    SearchTree::new(compare)
}

/// Insert the whole alphabet into `tree` in build order.
pub fn populate(tree: &mut SearchTree<char>) -> Result<(), TreeError> {
    for symbol in BUILD_SEQUENCE.chars() {
        if tree.insert(symbol)? == Insertion::DuplicateVisible {
            debug!(%symbol, "symbol already present in morse tree");
        }
    }
    Ok(())
}

/// Freshly built Morse tree.
pub fn build_tree() -> Result<SearchTree<char>, TreeError> {
    let mut tree = empty_tree();
    populate(&mut tree)?;
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_hold_the_same_symbols() {
        let mut priority: Vec<char> = PRIORITY.chars().collect();
        let mut sequence: Vec<char> = BUILD_SEQUENCE.chars().collect();
        assert_eq!(priority.len(), ALPHABET_SIZE);
        assert_eq!(sequence.len(), ALPHABET_SIZE);

        priority.sort_unstable();
        sequence.sort_unstable();
        assert_eq!(priority, sequence);
        priority.dedup();
        assert_eq!(priority.len(), ALPHABET_SIZE, "symbols must be unique");
    }

    #[test]
    fn test_rank_ignores_case() {
        assert_eq!(rank('5'), Some(0));
        assert_eq!(rank('0'), Some(ALPHABET_SIZE - 1));
        assert_eq!(rank('e'), rank('E'));
        assert_eq!(rank('!'), None);
        assert_eq!(compare(&'s', &'S'), Ordering::Equal);
        assert_eq!(compare(&'E', &'T'), Ordering::Less);
        assert_eq!(compare(&'!', &'0'), Ordering::Greater);
    }

    #[test]
    fn test_symbols_outside_the_alphabet_stay_distinct() {
        assert_eq!(compare(&'!', &'?'), Ordering::Less);
        assert_eq!(compare(&'?', &'!'), Ordering::Greater);
        assert_eq!(compare(&'é', &'é'), Ordering::Equal);

        let mut tree = empty_tree();
        assert_eq!(tree.insert('!'), Ok(Insertion::Inserted));
        assert_eq!(tree.insert('?'), Ok(Insertion::Inserted));
        assert_eq!(tree.insert('E'), Ok(Insertion::Inserted));
        assert_eq!(tree.insert('e'), Ok(Insertion::DuplicateVisible));
        let in_order: String = tree.iter().collect();
        assert_eq!(in_order, "E!?");
    }

    #[test]
    fn test_fillers_are_not_encodable() {
        for filler in FILLERS {
            assert!(rank(filler).is_some());
            assert!(!is_encodable(filler));
        }
        assert!(is_encodable('q'));
        assert!(is_encodable('/'));
        assert!(!is_encodable(' '));
        assert!(!is_encodable('?'));
    }

    #[test]
    fn test_build_needs_no_rotation() {
        let tree = build_tree().unwrap();
        assert_eq!(tree.len(), ALPHABET_SIZE);
        assert_eq!(tree.visible_len(), ALPHABET_SIZE);
        // Five code elements below the root marker.
        assert_eq!(tree.height(), 6);

        let root = tree.root().unwrap();
        assert_eq!(tree.payload(root), Some(&ROOT_MARKER));
        assert_eq!(tree.left(root).and_then(|n| tree.payload(n)), Some(&'E'));
        assert_eq!(tree.right(root).and_then(|n| tree.payload(n)), Some(&'T'));

        let in_order: String = tree.iter().collect();
        assert_eq!(in_order, PRIORITY);
    }

    #[test]
    fn test_sorted_insertion_gives_another_shape() {
        let mut tree = empty_tree();
        for symbol in PRIORITY.chars() {
            tree.insert(symbol).unwrap();
        }
        let in_order: String = tree.iter().collect();
        assert_eq!(in_order, PRIORITY);

        let root = tree.root().unwrap();
        assert_ne!(tree.payload(root), Some(&ROOT_MARKER));
    }
}
