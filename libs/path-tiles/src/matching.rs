//! # Matching Enumeration
//!
//! Perfect matchings of an even set of labeled points: every way to split
//! the points into disjoint pairs.
//!
//! ## Algorithm
//!
//! Recursive pairing. The first remaining point is paired with each other
//! remaining point in turn, the remaining points are matched recursively,
//! and the pair is prepended to every sub-matching. Fixing the first point
//! at each level means no matching is produced twice, and the output
//! order follows the input order.
//!
//! ## Example
//!
//! ```rust
//! use path_tiles::matching::{enumerate_matchings, matching_count};
//!
//! let matchings = enumerate_matchings(8).unwrap();
//! assert_eq!(matchings.len(), 105);
//! assert_eq!(matching_count(8).unwrap(), 105);
//! assert_eq!(matchings[0].to_string(), "[(0, 1), (2, 3), (4, 5), (6, 7)]");
//! ```

use std::fmt;

use config::constants::{MAX_MATCHING_POINTS, STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
use stacker::maybe_grow;

use crate::error::CarveError;

/// A perfect matching of point indices `0..point_count`.
///
/// Pairs keep the order they were given in; use [`Matching::canonical`]
/// to compare matchings as sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Matching(Vec<(usize, usize)>);

impl Matching {
    /// Creates a matching, checking that `pairs` covers every index in
    /// `0..point_count` exactly once.
    ///
    /// # Errors
    ///
    /// [`CarveError::InvalidInput`] for a wrong pair count, an index out
    /// of range, a self-pair or a repeated index.
    ///
    /// # Example
    ///
    /// ```rust
    /// use path_tiles::matching::Matching;
    ///
    /// assert!(Matching::new(vec![(0, 3), (1, 2)], 4).is_ok());
    /// assert!(Matching::new(vec![(0, 1), (1, 2)], 4).is_err());
    /// ```
    pub fn new(pairs: Vec<(usize, usize)>, point_count: usize) -> Result<Self, CarveError> {
        if point_count % 2 != 0 {
            return Err(CarveError::invalid_input(format!(
                "point count {point_count} is odd"
            )));
        }
        if pairs.len() * 2 != point_count {
            return Err(CarveError::invalid_input(format!(
                "expected {} pairs, got {}",
                point_count / 2,
                pairs.len()
            )));
        }

        let mut seen = vec![false; point_count];
        for &(a, b) in &pairs {
            if a == b {
                return Err(CarveError::invalid_input(format!(
                    "point {a} is paired with itself"
                )));
            }
            for index in [a, b] {
                if index >= point_count {
                    return Err(CarveError::invalid_input(format!(
                        "point index {index} out of range 0..{point_count}"
                    )));
                }
                if seen[index] {
                    return Err(CarveError::invalid_input(format!(
                        "point index {index} appears more than once"
                    )));
                }
                seen[index] = true;
            }
        }

        Ok(Self(pairs))
    }

    /// The pairs in their original order.
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.0
    }

    /// Number of points covered by the matching.
    pub fn point_count(&self) -> usize {
        self.0.len() * 2
    }

    /// Order-independent form: each pair sorted, then the pairs sorted.
    pub fn canonical(&self) -> Vec<(usize, usize)> {
        let mut pairs: Vec<_> = self.0.iter().map(|&(a, b)| (a.min(b), a.max(b))).collect();
        pairs.sort_unstable();
        pairs
    }
}

impl fmt::Display for Matching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, (a, b)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "({a}, {b})")?;
        }
        f.write_str("]")
    }
}

/// Enumerates every perfect matching of the points `0..point_count`.
///
/// # Errors
///
/// [`CarveError::InvalidInput`] if `point_count` is negative, odd, or
/// larger than [`MAX_MATCHING_POINTS`].
pub fn enumerate_matchings(point_count: i64) -> Result<Vec<Matching>, CarveError> {
    let count = checked_point_count(point_count)?;
    let labels: Vec<usize> = (0..count).collect();
    Ok(generate_matchings(&labels)?
        .into_iter()
        .map(Matching)
        .collect())
}

/// Enumerates every perfect matching of `points`, pairing labels by value.
///
/// # Errors
///
/// [`CarveError::InvalidInput`] for an odd number of points or more than
/// [`MAX_MATCHING_POINTS`].
///
/// # Example
///
/// ```rust
/// use path_tiles::matching::generate_matchings;
///
/// let matchings = generate_matchings(&['a', 'b', 'c', 'd']).unwrap();
/// assert_eq!(matchings[0], vec![('a', 'b'), ('c', 'd')]);
/// assert_eq!(matchings.len(), 3);
/// ```
pub fn generate_matchings<T: Clone>(points: &[T]) -> Result<Vec<Vec<(T, T)>>, CarveError> {
    if points.len() % 2 != 0 {
        return Err(CarveError::invalid_input(format!(
            "cannot match an odd number of points ({})",
            points.len()
        )));
    }
    if points.len() > MAX_MATCHING_POINTS {
        return Err(CarveError::invalid_input(format!(
            "{} points exceed the enumeration limit of {MAX_MATCHING_POINTS}",
            points.len()
        )));
    }
    Ok(pair_up(points))
}

fn pair_up<T: Clone>(points: &[T]) -> Vec<Vec<(T, T)>> {
    let Some((first, rest)) = points.split_first() else {
        return vec![Vec::new()];
    };

    maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
        let mut matchings = Vec::new();
        for (i, partner) in rest.iter().enumerate() {
            let remaining: Vec<T> = rest
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, p)| p.clone())
                .collect();

            for sub in pair_up(&remaining) {
                let mut matching = Vec::with_capacity(sub.len() + 1);
                matching.push((first.clone(), partner.clone()));
                matching.extend(sub);
                matchings.push(matching);
            }
        }
        matchings
    })
}

/// Number of perfect matchings on `point_count` points: (N-1)!!.
///
/// # Errors
///
/// [`CarveError::InvalidInput`] for a negative or odd count, or when the
/// result does not fit in a `u64`.
///
/// # Example
///
/// ```rust
/// use path_tiles::matching::matching_count;
///
/// assert_eq!(matching_count(0).unwrap(), 1);
/// assert_eq!(matching_count(6).unwrap(), 15);
/// assert!(matching_count(7).is_err());
/// ```
pub fn matching_count(point_count: i64) -> Result<u64, CarveError> {
    if point_count < 0 {
        return Err(CarveError::invalid_input(format!(
            "point count {point_count} is negative"
        )));
    }
    if point_count % 2 != 0 {
        return Err(CarveError::invalid_input(format!(
            "point count {point_count} is odd"
        )));
    }

    let mut count: u64 = 1;
    let mut factor = point_count - 1;
    while factor > 1 {
        count = count.checked_mul(factor as u64).ok_or_else(|| {
            CarveError::invalid_input(format!("matching count for {point_count} points overflows"))
        })?;
        factor -= 2;
    }
    Ok(count)
}

fn checked_point_count(point_count: i64) -> Result<usize, CarveError> {
    if point_count < 0 {
        return Err(CarveError::invalid_input(format!(
            "point count {point_count} is negative"
        )));
    }
    usize::try_from(point_count)
        .map_err(|_| CarveError::invalid_input(format!("point count {point_count} is too large")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::collections::HashSet;

    #[test]
    fn test_eight_points_give_105() {
        let matchings = enumerate_matchings(8).unwrap();
        assert_eq!(matchings.len(), 105);

        let distinct: HashSet<_> = matchings.iter().map(Matching::canonical).collect();
        assert_eq!(distinct.len(), 105);
    }

    #[test]
    fn test_every_matching_covers_all_points() {
        for matching in enumerate_matchings(8).unwrap() {
            let mut covered: Vec<usize> = matching
                .pairs()
                .iter()
                .flat_map(|&(a, b)| [a, b])
                .collect();
            covered.sort_unstable();
            assert_eq!(covered, (0..8).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_output_order_is_deterministic() {
        let matchings = enumerate_matchings(4).unwrap();
        let pairs: Vec<_> = matchings.iter().map(|m| m.pairs().to_vec()).collect();
        assert_eq!(
            pairs,
            vec![
                vec![(0, 1), (2, 3)],
                vec![(0, 2), (1, 3)],
                vec![(0, 3), (1, 2)],
            ]
        );
    }

    #[test]
    fn test_empty_input_has_one_empty_matching() {
        let matchings = enumerate_matchings(0).unwrap();
        assert_eq!(matchings.len(), 1);
        assert!(matchings[0].pairs().is_empty());
        assert_eq!(matchings[0].to_string(), "[]");
    }

    #[test]
    fn test_odd_and_negative_counts_are_rejected() {
        for count in [-2, -1, 1, 3, 7] {
            let err = enumerate_matchings(count).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "count {count}");
        }
        assert!(generate_matchings(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_limit_is_enforced() {
        let too_many = MAX_MATCHING_POINTS as i64 + 2;
        assert!(enumerate_matchings(too_many).is_err());
        // The closed form has no such limit
        assert_eq!(matching_count(too_many).unwrap(), 34_459_425);
    }

    #[test]
    fn test_matching_count_overflow() {
        assert!(matching_count(200).is_err());
    }

    #[test]
    fn test_matching_validation() {
        let err = Matching::new(vec![(0, 1), (1, 2), (3, 4), (5, 6)], 8).unwrap_err();
        assert!(err.to_string().contains("more than once"));

        assert!(Matching::new(vec![(0, 1), (2, 3), (4, 5)], 8).is_err());
        assert!(Matching::new(vec![(0, 1), (2, 3), (4, 5), (6, 8)], 8).is_err());
        assert!(Matching::new(vec![(0, 0), (2, 3), (4, 5), (6, 7)], 8).is_err());
        assert!(Matching::new(vec![(7, 0), (2, 3), (4, 5), (6, 1)], 8).is_ok());
    }

    #[test]
    fn test_canonical_ignores_order() {
        let a = Matching::new(vec![(1, 0), (3, 2)], 4).unwrap();
        let b = Matching::new(vec![(2, 3), (0, 1)], 4).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.canonical(), b.canonical());
    }
}
