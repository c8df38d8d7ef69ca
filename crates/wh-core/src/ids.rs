//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` because
//! the task-key wire format and the layout zone tables both need the raw
//! number.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(n: $inner) -> $name {
                $name(n)
            }
        }
    };
}

typed_id! {
    /// A robot on the warehouse floor.  Also indexes the robot's home zone.
    pub struct RobotId(u32);
}

typed_id! {
    /// Allocator-assigned id of one robot/task binding.
    pub struct JobId(u32);
}

typed_id! {
    /// A drop-off station.  1-based, as issued by the relational order store.
    pub struct StationId(u32);
}

typed_id! {
    /// A customer order.
    pub struct OrderId(u32);
}

typed_id! {
    /// An item type.  Also indexes the item's load zone.
    pub struct ItemId(u32);
}
