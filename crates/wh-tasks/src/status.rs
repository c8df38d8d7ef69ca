//! Task and order status enums with strict string codecs.
//!
//! Unknown strings are an error, never silently mapped to `Error`.

use std::fmt;
use std::str::FromStr;

use crate::error::TaskError;

macro_rules! status_enum {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum $name {
            #[default]
            Open,
            InProgress,
            Complete,
            Error,
        }

        impl $name {
            pub const fn as_str(self) -> &'static str {
                match self {
                    $name::Open       => "OPEN",
                    $name::InProgress => "IN_PROGRESS",
                    $name::Complete   => "COMPLETE",
                    $name::Error      => "ERROR",
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = TaskError;

            fn from_str(s: &str) -> Result<Self, TaskError> {
                match s {
                    "OPEN"        => Ok($name::Open),
                    "IN_PROGRESS" => Ok($name::InProgress),
                    "COMPLETE"    => Ok($name::Complete),
                    "ERROR"       => Ok($name::Error),
                    other         => Err(TaskError::UnknownStatus(other.to_owned())),
                }
            }
        }
    };
}

status_enum! {
    /// Lifecycle of one station/item task row.
    TaskStatus
}

status_enum! {
    /// Lifecycle of a customer order.
    OrderStatus
}

impl TaskStatus {
    /// Status after a drop leaves `remaining` units outstanding: zero
    /// completes the task, a negative count means too many were delivered.
    pub fn from_remaining(remaining: i64) -> Self {
        match remaining {
            0 => TaskStatus::Complete,
            r if r < 0 => TaskStatus::Error,
            _ => TaskStatus::Open,
        }
    }

    /// Still expecting deliveries.
    pub fn is_active(self) -> bool {
        matches!(self, TaskStatus::Open | TaskStatus::InProgress)
    }
}
