//! Model construction flags

use super::index::IndexOrder;

/// Which indexes a model maintains and what it stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModelFlags(u32);

impl ModelFlags {
    /// Subject, Predicate, Object
    pub const INDEX_SPO: ModelFlags = ModelFlags(1);
    /// Subject, Object, Predicate
    pub const INDEX_SOP: ModelFlags = ModelFlags(1 << 1);
    /// Object, Predicate, Subject
    pub const INDEX_OPS: ModelFlags = ModelFlags(1 << 2);
    /// Object, Subject, Predicate
    pub const INDEX_OSP: ModelFlags = ModelFlags(1 << 3);
    /// Predicate, Subject, Object
    pub const INDEX_PSO: ModelFlags = ModelFlags(1 << 4);
    /// Predicate, Object, Subject
    pub const INDEX_POS: ModelFlags = ModelFlags(1 << 5);
    /// Also keep a graph-first variant of every index
    pub const INDEX_GRAPHS: ModelFlags = ModelFlags(1 << 6);
    /// Keep statement cursors instead of discarding them
    pub const STORE_CURSORS: ModelFlags = ModelFlags(1 << 7);

    pub const fn empty() -> Self {
        ModelFlags(0)
    }

    pub const fn from_bits(bits: u32) -> Self {
        ModelFlags(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: ModelFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// The index orders these flags select, canonical order first
    pub fn index_orders(self) -> Vec<IndexOrder> {
        let base: Vec<IndexOrder> = IndexOrder::TRIPLE_ORDERS
            .into_iter()
            .filter(|order| self.contains(order.flag()))
            .collect();
        if !self.contains(Self::INDEX_GRAPHS) {
            return base;
        }
        let graph_first: Vec<IndexOrder> = base.iter().map(|order| order.graph_first()).collect();
        base.into_iter().chain(graph_first).collect()
    }
}

impl std::ops::BitOr for ModelFlags {
    type Output = ModelFlags;

    fn bitor(self, rhs: ModelFlags) -> ModelFlags {
        ModelFlags(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for ModelFlags {
    fn bitor_assign(&mut self, rhs: ModelFlags) {
        self.0 |= rhs.0;
    }
}
