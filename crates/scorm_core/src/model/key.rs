//! Data-model key schema parser.
//!
//! # Responsibility
//! - Classify dotted element keys into scalar, list-member and nested
//!   list-member shapes.
//! - Keep all numeric interpretation of keys at this boundary.
//!
//! # Invariants
//! - Index segments are whole dot-delimited decimal segments fitting `u32`.
//!   Keys such as `cmi.objectives.3x.id` are therefore `Scalar`, a deliberate
//!   tightening over a bare `cmi.<list>.<digits>` prefix match, which would
//!   count them as index 3.
//! - A nested member is always also a member of the `interactions` list.

use once_cell::sync::Lazy;
use regex::Regex;

/// Root namespace shared by every data-model element.
pub const ROOT: &str = "cmi";
/// List family that owns the nested sub-lists.
pub const INTERACTIONS: &str = "interactions";
/// Suffix segment of synthetic count keys.
pub const COUNT_SUFFIX: &str = "_count";

static LIST_MEMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^cmi\.(\w+)\.(\d+)(?:\.|$)").expect("list member pattern is valid")
});

static NESTED_MEMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^cmi\.interactions\.(\d+)\.(objectives|correct_responses)\.(\d+)(?:\.|$)")
        .expect("nested member pattern is valid")
});

/// Repeating list scoped under one interaction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InteractionList {
    Objectives,
    CorrectResponses,
}

impl InteractionList {
    /// Key segment naming this sub-list.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Objectives => "objectives",
            Self::CorrectResponses => "correct_responses",
        }
    }

    fn from_segment(value: &str) -> Option<Self> {
        match value {
            "objectives" => Some(Self::Objectives),
            "correct_responses" => Some(Self::CorrectResponses),
            _ => None,
        }
    }
}

/// Classified shape of one data-model key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKey<'a> {
    /// Anything that is not indexed into a list family.
    Scalar,
    /// `cmi.<list>.<index>[...]`
    ListMember { list: &'a str, index: u32 },
    /// `cmi.interactions.<interaction>.<list>.<index>[...]`
    NestedListMember {
        interaction: u32,
        list: InteractionList,
        index: u32,
    },
}

impl<'a> ElementKey<'a> {
    /// Classifies `key`. Never fails; unknown shapes are `Scalar`.
    pub fn parse(key: &'a str) -> Self {
        if let Some(caps) = NESTED_MEMBER_RE.captures(key) {
            let interaction = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
            let list = caps
                .get(2)
                .and_then(|m| InteractionList::from_segment(m.as_str()));
            let index = caps.get(3).and_then(|m| m.as_str().parse::<u32>().ok());
            if let (Some(interaction), Some(list), Some(index)) = (interaction, list, index) {
                return Self::NestedListMember {
                    interaction,
                    list,
                    index,
                };
            }
        }

        if let Some(caps) = LIST_MEMBER_RE.captures(key) {
            let list = caps.get(1).map(|m| m.as_str());
            let index = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
            if let (Some(list), Some(index)) = (list, index) {
                return Self::ListMember { list, index };
            }
        }

        Self::Scalar
    }

    /// Top-level list membership, if any.
    ///
    /// Nested members report their parent interaction.
    pub fn list_member(&self) -> Option<(&'a str, u32)> {
        match *self {
            Self::Scalar => None,
            Self::ListMember { list, index } => Some((list, index)),
            Self::NestedListMember { interaction, .. } => Some((INTERACTIONS, interaction)),
        }
    }

    /// Nested interaction sub-list membership, if any.
    pub fn nested_member(&self) -> Option<(u32, InteractionList, u32)> {
        match *self {
            Self::NestedListMember {
                interaction,
                list,
                index,
            } => Some((interaction, list, index)),
            _ => None,
        }
    }
}

/// Builds `cmi.<list>._count`.
pub fn list_count_key(list: &str) -> String {
    format!("{ROOT}.{list}.{COUNT_SUFFIX}")
}

/// Builds `cmi.interactions.<n>.<list>._count`.
pub fn nested_count_key(interaction: u32, list: InteractionList) -> String {
    format!(
        "{ROOT}.{INTERACTIONS}.{interaction}.{}.{COUNT_SUFFIX}",
        list.as_str()
    )
}
