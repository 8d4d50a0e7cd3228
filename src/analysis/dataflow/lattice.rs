//! Lattice trait for dataflow analysis.
//!
//! A lattice defines how abstract values combine at control flow join points.
//! The solver is parameterised by a lattice value: the meet operation merges
//! values flowing in from multiple paths, and equality (`PartialEq`) detects
//! the fixed point.

use std::fmt::Debug;

/// A meet semi-lattice with a meet (greatest lower bound) operation.
///
/// The meet operation combines information from multiple control flow paths.
/// It must satisfy:
///
/// - **Idempotent**: `x.meet(x) = x`
/// - **Commutative**: `x.meet(y) = y.meet(x)`
/// - **Associative**: `x.meet(y.meet(z)) = (x.meet(y)).meet(z)`
///
/// To guarantee termination of the solver, the meet result must not sit below
/// either operand in the lattice order, and transfer functions over the
/// lattice must be monotonic. Neither obligation can be checked at runtime;
/// a violation shows up as divergence.
///
/// # Examples
///
/// ```rust
/// use tacscope::MeetSemiLattice;
///
/// #[derive(Debug, Clone, PartialEq)]
/// enum Constant {
///     Unknown,
///     Value(i64),
///     Conflict,
/// }
///
/// impl MeetSemiLattice for Constant {
///     fn meet(&self, other: &Self) -> Self {
///         match (self, other) {
///             (Self::Unknown, x) | (x, Self::Unknown) => x.clone(),
///             (Self::Value(a), Self::Value(b)) if a == b => Self::Value(*a),
///             _ => Self::Conflict,
///         }
///     }
/// }
/// ```
pub trait MeetSemiLattice: Clone + Debug + PartialEq {
    /// Computes the meet (greatest lower bound) of two lattice elements.
    ///
    /// The meet represents combining information from two paths that merge.
    #[must_use]
    fn meet(&self, other: &Self) -> Self;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum TestLattice {
        Top,
        Value(i32),
        Bottom,
    }

    impl MeetSemiLattice for TestLattice {
        fn meet(&self, other: &Self) -> Self {
            match (self, other) {
                (Self::Top, x) | (x, Self::Top) => x.clone(),
                (Self::Value(a), Self::Value(b)) if a == b => Self::Value(*a),
                _ => Self::Bottom,
            }
        }
    }

    #[test]
    fn test_meet_is_idempotent_and_commutative() {
        let a = TestLattice::Value(1);
        let b = TestLattice::Value(2);

        assert_eq!(a.meet(&a), a);
        assert_eq!(a.meet(&b), b.meet(&a));
        assert_eq!(a.meet(&b), TestLattice::Bottom);
        assert_eq!(TestLattice::Top.meet(&a), a);
    }
}
