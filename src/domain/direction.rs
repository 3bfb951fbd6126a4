//! Invoice direction and direction-keyed data
//!
//! Every invoice has two accounting views, `in` (purchases) and `out` (sales).
//! Documents store these views under literal `"in"` / `"out"` keys; [`Directional`] maps that shape
//! onto a struct so access is always checked against a [`Direction`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which accounting view of an invoice applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Purchase invoices received by the company
    In,
    /// Sales invoices issued by the company
    Out,
}

impl Direction {
    /// All directions, in a stable order
    pub const ALL: [Direction; 2] = [Direction::In, Direction::Out];

    /// Wire name of the direction
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(Direction::In),
            "out" => Ok(Direction::Out),
            other => Err(format!(
                "Invalid direction '{other}'. Must be one of: in, out"
            )),
        }
    }
}

/// A value stored once per direction
///
/// Either side may be absent in a document. Use [`Directional::get`] to read the
/// side matching a [`Direction`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directional<T> {
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub inbound: Option<T>,

    #[serde(rename = "out", default, skip_serializing_if = "Option::is_none")]
    pub outbound: Option<T>,
}

impl<T> Default for Directional<T> {
    fn default() -> Self {
        Self {
            inbound: None,
            outbound: None,
        }
    }
}

impl<T> Directional<T> {
    /// Returns the side for `direction`, if present
    pub fn get(&self, direction: Direction) -> Option<&T> {
        match direction {
            Direction::In => self.inbound.as_ref(),
            Direction::Out => self.outbound.as_ref(),
        }
    }

    /// Sets the side for `direction`
    pub fn set(&mut self, direction: Direction, value: T) {
        match direction {
            Direction::In => self.inbound = Some(value),
            Direction::Out => self.outbound = Some(value),
        }
    }

    /// Builds a value with only one side populated
    pub fn only(direction: Direction, value: T) -> Self {
        let mut directional = Self::default();
        directional.set(direction, value);
        directional
    }
}
