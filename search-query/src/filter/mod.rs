//! # Search query filter
//!
//! This module exposes the [`FilterNode`] tree, which is the typed,
//! backend independent representation of a search query. A filter
//! tree can be parsed from a query string using the [`parser`]
//! module, then compiled to a wire format using the
//! [`jmap`](crate::jmap) module.

pub mod parser;
pub mod predicate;

use predicate::Predicate;

/// The boolean operator of a filter node.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum Operator {
    And,
    Or,
    Not,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
        }
    }
}

/// The filter tree node.
///
/// A node is either a [`Predicate`] leaf, or a boolean combination
/// of nodes. Trees built with [`FilterNode::and`], [`FilterNode::or`]
/// and [`FilterNode::not`] keep the following shape: a `NOT` node
/// has exactly one child, `AND` and `OR` nodes have at least two.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum FilterNode {
    Predicate(Predicate),
    Boolean(Operator, Vec<FilterNode>),
}

impl FilterNode {
    /// Combine the given nodes with `AND`.
    ///
    /// Returns [`None`] when there is no node, and the node itself
    /// when there is only one.
    pub fn and(nodes: impl IntoIterator<Item = FilterNode>) -> Option<Self> {
        Self::group(Operator::And, nodes)
    }

    /// Combine the given nodes with `OR`.
    ///
    /// Returns [`None`] when there is no node, and the node itself
    /// when there is only one.
    pub fn or(nodes: impl IntoIterator<Item = FilterNode>) -> Option<Self> {
        Self::group(Operator::Or, nodes)
    }

    pub fn not(node: FilterNode) -> Self {
        Self::Boolean(Operator::Not, vec![node])
    }

    fn group(op: Operator, nodes: impl IntoIterator<Item = FilterNode>) -> Option<Self> {
        let mut nodes: Vec<_> = nodes.into_iter().collect();

        match nodes.len() {
            0 | 1 => nodes.pop(),
            _ => Some(Self::Boolean(op, nodes)),
        }
    }

    pub fn predicate(&self) -> Option<&Predicate> {
        match self {
            Self::Predicate(predicate) => Some(predicate),
            Self::Boolean(..) => None,
        }
    }

    pub fn operator(&self) -> Option<Operator> {
        match self {
            Self::Predicate(_) => None,
            Self::Boolean(op, _) => Some(*op),
        }
    }

    /// The children of a boolean node. Empty for a predicate.
    pub fn children(&self) -> &[FilterNode] {
        match self {
            Self::Predicate(_) => &[],
            Self::Boolean(_, children) => children,
        }
    }
}

impl From<Predicate> for FilterNode {
    fn from(predicate: Predicate) -> Self {
        Self::Predicate(predicate)
    }
}
