use std::{borrow::Borrow, fmt::Debug, hash::Hash};

use derivative::Derivative;

use crate::{directedness::Directedness, util::sort_pair};

/// The two endpoints of an edge.  For undirected edges the endpoints are
/// stored sorted, so `(a, b)` and `(b, a)` produce equal values.
#[derive(Derivative)]
#[derivative(
    Clone(bound = "T: Clone"),
    Debug(bound = "T: Debug"),
    Hash(bound = "T: Hash"),
    PartialEq(bound = "T: PartialEq"),
    Eq(bound = "T: Eq"),
    Ord(bound = "T: Ord"),
    PartialOrd(bound = "T: PartialOrd")
)]
pub struct EdgeEnds<T> {
    data: (T, T),
    #[derivative(PartialOrd = "ignore", Ord = "ignore")]
    directedness: Directedness,
}

impl<T> EdgeEnds<T> {
    pub fn new(source: T, target: T, directedness: Directedness) -> Self
    where
        T: Ord,
    {
        let data = if directedness.is_directed() {
            (source, target)
        } else {
            sort_pair(source, target)
        };
        Self { data, directedness }
    }

    pub fn source(&self) -> &T {
        &self.data.0
    }

    pub fn target(&self) -> &T {
        &self.data.1
    }

    pub fn values(&self) -> (&T, &T) {
        (&self.data.0, &self.data.1)
    }

    /// Checks whether the edge touches `value` at either end.
    pub fn touches<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.source().borrow() == value || self.target().borrow() == value
    }

    /// Given one endpoint, returns the other one.  Returns `None` if `value`
    /// is not an endpoint.  For a self-loop the value itself is returned.
    pub fn other_end<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        if self.source().borrow() == value {
            Some(self.target())
        } else if self.target().borrow() == value {
            Some(self.source())
        } else {
            None
        }
    }

    /// Applies `f` to both endpoints, re-sorting them if the edge is
    /// undirected.
    pub fn map<U: Ord>(self, mut f: impl FnMut(T) -> U) -> EdgeEnds<U> {
        let (source, target) = self.data;
        EdgeEnds::new(f(source), f(target), self.directedness)
    }
}
