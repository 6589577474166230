use super::{InnoGen, NodeId};
use core::hash::{Hash, Hasher};
use serde::{Deserialize, Serialize};

/// A single weighted path between two nodes. Two connections are the same structural gene when
/// they share a path, no matter their weight, state or innovation id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub inno: usize,
    pub from: NodeId,
    pub to: NodeId,
    pub weight: f64,
    pub enabled: bool,
}

impl Connection {
    pub fn new(from: NodeId, to: NodeId, weight: f64, inno: &mut InnoGen) -> Self {
        Self {
            inno: inno.next_innovation((from, to)),
            from,
            to,
            weight,
            enabled: true,
        }
    }

    /// gene innovation id
    #[inline]
    pub fn inno(&self) -> usize {
        self.inno
    }

    #[inline]
    pub fn path(&self) -> (NodeId, NodeId) {
        (self.from, self.to)
    }

    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// unconditionally disable this connection
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Split this connection around `center`, disabling it. The first half carries a unit
    /// weight and the second half our weight, so the path through `center` is unchanged
    pub fn bisect(&mut self, center: NodeId, inno: &mut InnoGen) -> (Self, Self) {
        self.disable();
        (
            // from -{1.}> bisect-node
            Self::new(self.from, center, 1., inno),
            // bisect-node -{w}> to
            Self::new(center, self.to, self.weight, inno),
        )
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        self.path() == other.path()
    }
}

impl Eq for Connection {}

impl Hash for Connection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path().hash(state);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use fxhash::FxHashSet;

    #[test]
    fn test_identity_is_path() {
        let mut inno = InnoGen::new(0);
        let l = Connection::new(-1, 0, 0.5, &mut inno);
        let mut r = Connection::new(-1, 0, -3., &mut inno);
        r.disable();
        assert_eq!(l, r);
        assert_eq!(l.inno(), r.inno());

        let set = FxHashSet::from_iter([l.clone(), r]);
        assert_eq!(set.len(), 1);

        assert_ne!(l, Connection::new(0, -1, 0.5, &mut inno));
    }

    #[test]
    fn test_bisect() {
        let mut inno = InnoGen::new(0);
        let mut c = Connection::new(-2, 0, 2.5, &mut inno);
        let (first, second) = c.bisect(1, &mut inno);

        assert!(!c.enabled());
        assert!(first.enabled() && second.enabled());
        assert_eq!(first.path(), (-2, 1));
        assert_eq!(second.path(), (1, 0));
        assert_eq!(first.weight, 1.);
        assert_eq!(second.weight, 2.5);
        assert_eq!(first.inno(), 2);
        assert_eq!(second.inno(), 3);
    }
}
