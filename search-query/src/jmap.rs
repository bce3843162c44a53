//! # JMAP filter
//!
//! This module compiles a [`FilterNode`] tree into the filter object
//! expected by the JMAP `Email/query` method: either a single
//! condition (`{"from": "alice"}`) or an operator grouping other
//! filters (`{"operator": "AND", "conditions": […]}`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::{
    filter::{
        predicate::{DateBoundKind, Predicate, TextField},
        FilterNode, Operator,
    },
    Error, Result,
};

/// The JMAP filter operator.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JmapOperator {
    And,
    Or,
    Not,
}

impl From<Operator> for JmapOperator {
    fn from(op: Operator) -> Self {
        match op {
            Operator::And => Self::And,
            Operator::Or => Self::Or,
            Operator::Not => Self::Not,
        }
    }
}

/// The JMAP filter condition.
///
/// Serialized as an object holding one single property.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JmapCondition {
    Text(String),
    From(String),
    To(String),
    Cc(String),
    Bcc(String),
    Subject(String),
    Body(String),
    HasAttachment(bool),
    HasKeyword(String),
    NotKeyword(String),
    InMailbox(String),
    Before(String),
    After(String),
}

impl From<&Predicate> for JmapCondition {
    fn from(predicate: &Predicate) -> Self {
        match predicate {
            Predicate::FreeText(text) => Self::Text(text.clone()),
            Predicate::FieldText(field, text) => {
                let text = text.clone();
                match field {
                    TextField::From => Self::From(text),
                    TextField::To => Self::To(text),
                    TextField::Cc => Self::Cc(text),
                    TextField::Bcc => Self::Bcc(text),
                    TextField::Subject => Self::Subject(text),
                    TextField::Body => Self::Body(text),
                }
            }
            Predicate::HasAttachment(has) => Self::HasAttachment(*has),
            Predicate::KeywordPresence(keyword, true) => Self::HasKeyword(keyword.as_str().into()),
            Predicate::KeywordPresence(keyword, false) => Self::NotKeyword(keyword.as_str().into()),
            Predicate::MailboxRef(mailbox) => Self::InMailbox(mailbox.clone()),
            Predicate::DateBound(DateBoundKind::Before, date) => Self::Before(date.clone()),
            Predicate::DateBound(DateBoundKind::After, date) => Self::After(date.clone()),
        }
    }
}

/// The JMAP filter.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JmapFilter {
    Operator {
        operator: JmapOperator,
        conditions: Vec<JmapFilter>,
    },
    Condition(JmapCondition),
}

impl JmapFilter {
    pub fn and(filters: Vec<JmapFilter>) -> Self {
        Self::Operator {
            operator: JmapOperator::And,
            conditions: filters,
        }
    }

    pub fn to_json_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(Error::SerializeJmapFilterError)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::SerializeJmapFilterError)
    }
}

impl From<JmapCondition> for JmapFilter {
    fn from(condition: JmapCondition) -> Self {
        Self::Condition(condition)
    }
}

impl From<&FilterNode> for JmapFilter {
    fn from(node: &FilterNode) -> Self {
        match node {
            FilterNode::Predicate(predicate) => Self::Condition(predicate.into()),
            FilterNode::Boolean(Operator::And | Operator::Or, nodes) if nodes.len() == 1 => {
                Self::from(&nodes[0])
            }
            FilterNode::Boolean(op, nodes) => Self::Operator {
                operator: (*op).into(),
                conditions: nodes.iter().map(Self::from).collect(),
            },
        }
    }
}

impl From<FilterNode> for JmapFilter {
    fn from(node: FilterNode) -> Self {
        Self::from(&node)
    }
}

impl FilterNode {
    /// Compile the filter tree into a JMAP filter.
    pub fn to_jmap_filter(&self) -> JmapFilter {
        let filter = JmapFilter::from(self);
        trace!(?filter, "compiled jmap filter");
        filter
    }
}

/// Build the filter of a JMAP `Email/query` call.
///
/// The optional mailbox id restricts the search to that mailbox. It
/// is added to the conditions of a top-level `AND`, or combined with
/// the given filter in a new `AND` otherwise. Without filter nor
/// mailbox, the search is not filtered at all.
pub fn search_filter(filter: Option<JmapFilter>, mailbox_id: Option<&str>) -> Option<JmapFilter> {
    let mailbox = mailbox_id.map(|id| JmapFilter::from(JmapCondition::InMailbox(id.to_owned())));

    match (filter, mailbox) {
        (
            Some(JmapFilter::Operator {
                operator: JmapOperator::And,
                mut conditions,
            }),
            Some(mailbox),
        ) => {
            conditions.push(mailbox);
            Some(JmapFilter::and(conditions))
        }
        (Some(filter), Some(mailbox)) => Some(JmapFilter::and(vec![filter, mailbox])),
        (filter, mailbox) => filter.or(mailbox),
    }
}
