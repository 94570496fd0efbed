//! Self-balancing binary search tree where the heights of the two child subtrees of any node
//! differ by at most one.

mod node;
mod set;
mod tree;

pub use self::set::{AvlSet, AvlSetIntoIter, AvlSetIter, AvlSetPostOrderIter, AvlSetPreOrderIter};

use std::error;
use std::fmt;
use std::io;
use std::result;

/// The order in which a traversal visits the nodes of the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraversalOrder {
    /// Left subtree, node, right subtree. Yields values in ascending order.
    InOrder,
    /// Node, left subtree, right subtree.
    PreOrder,
    /// Left subtree, right subtree, node.
    PostOrder,
}

/// A broken structural invariant found by `AvlSet::validate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Violation {
    /// A value is not strictly between the bounds imposed by its ancestors.
    Unordered,
    /// The heights of the two subtrees of a node differ by more than one.
    Unbalanced { balance: i32 },
    /// The stored height of a node disagrees with the heights of its subtrees.
    HeightMismatch { expected: usize, actual: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Violation::Unordered => write!(f, "values are not in strictly increasing order"),
            Violation::Unbalanced { balance } => {
                write!(f, "node has balance factor {}", balance)
            },
            Violation::HeightMismatch { expected, actual } => {
                write!(f, "node has height {} but its subtrees imply {}", actual, expected)
            },
        }
    }
}

#[derive(Debug)]
pub enum Error {
    IOError(io::Error),
    InvariantViolation(Violation),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IOError(err)
    }
}

impl From<Violation> for Error {
    fn from(violation: Violation) -> Error {
        Error::InvariantViolation(violation)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::IOError(error) => Some(error),
            Error::InvariantViolation(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::IOError(error) => write!(f, "{}", error),
            Error::InvariantViolation(violation) => write!(f, "invariant violated: {}", violation),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
