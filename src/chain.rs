//! Walking `Error::source()` chains.
//!
//! Native database errors rarely reach application code bare: an ORM, a pool,
//! or a repository layer typically wraps them. Validators use this module to
//! find the native error regardless of how many wrappers sit on top.
//!
//! # Termination
//!
//! - Walks are bounded by [`MAX_CHAIN_DEPTH`]; a cyclic or runaway `source()`
//!   implementation cannot hang dispatch
//! - A [`ConstraintViolation`] ends the walk. Its own `source()` leads back to
//!   the vendor error it was built from, and following it would let a second
//!   dispatch re-translate an already-translated error
//!
//! # Example
//!
//! ```rust
//! use constraint_guard::chain;
//! use std::io;
//!
//! let err = io::Error::other("bare");
//! assert_eq!(chain::depth(&err), 1);
//! assert!(chain::root_cause(&err).is::<io::Error>());
//! ```

use crate::ConstraintViolation;
use std::error::Error;
use std::iter::FusedIterator;

/// Maximum number of links visited in a single walk.
pub const MAX_CHAIN_DEPTH: usize = 64;

/// Iterator over an error and its sources, outermost first.
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn Error + 'static)>,
    remaining: usize,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next.take()?;
        self.remaining -= 1;

        if !current.is::<ConstraintViolation>() {
            self.next = current.source();
        }
        Some(current)
    }
}

impl FusedIterator for Chain<'_> {}

/// Iterate `error` and its sources, outermost first.
#[inline]
pub fn iter<'a>(error: &'a (dyn Error + 'static)) -> Chain<'a> {
    Chain {
        next: Some(error),
        remaining: MAX_CHAIN_DEPTH,
    }
}

/// The innermost reachable error (`error` itself when it has no source).
pub fn root_cause<'a>(error: &'a (dyn Error + 'static)) -> &'a (dyn Error + 'static) {
    iter(error).last().unwrap_or(error)
}

/// Number of links in the chain, `error` included.
#[inline]
pub fn depth(error: &(dyn Error + 'static)) -> usize {
    iter(error).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RawError, ViolationKind};
    use std::fmt;
    use std::io;
    use std::sync::Arc;

    #[derive(Debug)]
    struct Layer {
        label: &'static str,
        inner: Option<RawError>,
    }

    impl fmt::Display for Layer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.label)
        }
    }

    impl Error for Layer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            self.inner.as_ref().map(|e| &**e as &(dyn Error + 'static))
        }
    }

    /// Error whose source is itself.
    #[derive(Debug)]
    struct Ouroboros;

    impl fmt::Display for Ouroboros {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("ouroboros")
        }
    }

    impl Error for Ouroboros {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(self)
        }
    }

    fn layered(labels: &[&'static str]) -> RawError {
        let mut current: Option<RawError> = None;
        for label in labels.iter().rev().copied() {
            current = Some(Arc::new(Layer {
                label,
                inner: current.take(),
            }));
        }
        current.expect("at least one label")
    }

    #[test]
    fn bare_error_is_its_own_root() {
        let err = io::Error::other("bare");
        let root = root_cause(&err);
        assert_eq!(root.to_string(), "bare");
        assert_eq!(depth(&err), 1);
    }

    #[test]
    fn walks_outermost_first() {
        let err = layered(&["outer", "middle", "inner"]);
        let labels: Vec<String> = iter(&*err).map(|e| e.to_string()).collect();
        assert_eq!(labels, vec!["outer", "middle", "inner"]);
        assert_eq!(root_cause(&*err).to_string(), "inner");
    }

    #[test]
    fn cyclic_chain_is_bounded() {
        let err = Ouroboros;
        assert_eq!(depth(&err), MAX_CHAIN_DEPTH);
    }

    #[test]
    fn walk_stops_at_constraint_violation() {
        let native = layered(&["native"]);
        let violation = ConstraintViolation::new(ViolationKind::NotNull, "test", 515, "null", native);
        let outer = Layer {
            label: "wrapper",
            inner: Some(Arc::new(violation)),
        };

        assert_eq!(depth(&outer), 2);
        assert!(root_cause(&outer).is::<ConstraintViolation>());
    }
}
