//! The tape-move operator.
//!
//! The tape is held as two segments around the head: `left` holds every cell to the left
//! of the head in order, `right` starts with the cell under the head. Both segments are
//! conceptually infinite and are padded with [`BLANK_SYMBOL`] only when a move needs it.

use crate::types::{Direction, BLANK_SYMBOL};

/// Writes `write` under the head and shifts the head one cell in `direction`.
///
/// The function is total: moving left past the start manufactures a blank, and running
/// off the right end presents a single blank cell rather than an empty segment.
///
/// ```
/// use tracetm::{tape::shift, Direction};
///
/// let (left, right) = shift(&['a'], &['b', 'c'], 'x', Direction::Right);
/// assert_eq!(left, vec!['a', 'x']);
/// assert_eq!(right, vec!['c']);
/// ```
pub fn shift(
    left: &[char],
    right: &[char],
    write: char,
    direction: Direction,
) -> (Vec<char>, Vec<char>) {
    let mut left = left.to_vec();
    // Everything after the head cell survives the write unchanged.
    let rest = right.get(1..).unwrap_or(&[]);

    match direction {
        Direction::Right => {
            left.push(write);
            let right = if rest.is_empty() {
                vec![BLANK_SYMBOL]
            } else {
                rest.to_vec()
            };
            (left, right)
        }
        Direction::Left => {
            let head = left.pop().unwrap_or(BLANK_SYMBOL);
            let mut right = Vec::with_capacity(rest.len() + 2);
            right.push(head);
            right.push(write);
            right.extend_from_slice(rest);
            (left, right)
        }
    }
}
