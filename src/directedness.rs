use std::fmt;

/// Whether the edges of a graph have a direction.
///
/// A graph carries its directedness as a value fixed at creation.  Code that
/// depends on edge symmetry (degree, edge lookup, connectivity) branches on
/// it rather than on the graph's type.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Directedness {
    Directed,
    Undirected,
}

impl Directedness {
    pub fn is_directed(self) -> bool {
        matches!(self, Directedness::Directed)
    }

    /// The directedness of a graph combining two others: directed if either
    /// input is directed.
    pub fn combine(self, other: Directedness) -> Directedness {
        if self.is_directed() || other.is_directed() {
            Directedness::Directed
        } else {
            Directedness::Undirected
        }
    }
}

impl From<bool> for Directedness {
    fn from(directed: bool) -> Self {
        if directed {
            Directedness::Directed
        } else {
            Directedness::Undirected
        }
    }
}

impl From<Directedness> for bool {
    fn from(directedness: Directedness) -> Self {
        directedness.is_directed()
    }
}

impl fmt::Display for Directedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directedness::Directed => f.write_str("directed"),
            Directedness::Undirected => f.write_str("undirected"),
        }
    }
}
