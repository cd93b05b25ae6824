//! Fixed vocabularies for the basis flags and the QA checklist.
//!
//! Both sets are closed: the form only ever offers these options, and the
//! schema layer rejects anything else arriving over the wire.  The
//! kebab-case identifiers are what gets stored and sent; the labels are what
//! a person sees.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::SchemaError;

/// A strategy the agent should use when engaging with the account's context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BasisOption {
    /// Offer support based on the account context.
    SupportContext,
    /// Offer an upsell based on the account context.
    UpsellContext,
}

impl BasisOption {
    /// Every option, in the order the form lists them.
    pub const ALL: [BasisOption; 2] = [BasisOption::SupportContext, BasisOption::UpsellContext];

    /// Wire identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            BasisOption::SupportContext => "support-context",
            BasisOption::UpsellContext => "upsell-context",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            BasisOption::SupportContext => "Offer support based on Context",
            BasisOption::UpsellContext => "Offer upsell based on Context",
        }
    }
}

impl FromStr for BasisOption {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownBasis(s.to_string()))
    }
}

impl fmt::Display for BasisOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One checklist question about agent conduct on a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QaItem {
    AppropriateGreeting,
    VerifiedCaller,
    AdditionalHelp,
}

impl QaItem {
    /// Every checklist item, in display order.
    pub const ALL: [QaItem; 3] = [
        QaItem::AppropriateGreeting,
        QaItem::VerifiedCaller,
        QaItem::AdditionalHelp,
    ];

    /// Wire identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            QaItem::AppropriateGreeting => "appropriate-greeting",
            QaItem::VerifiedCaller => "verified-caller",
            QaItem::AdditionalHelp => "additional-help",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            QaItem::AppropriateGreeting => "Agent used appropriate greeting",
            QaItem::VerifiedCaller => "Agent verified caller before entering account",
            QaItem::AdditionalHelp => "Agent asked if any additional help was needed",
        }
    }
}

impl FromStr for QaItem {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|q| q.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownQaItem(s.to_string()))
    }
}

impl fmt::Display for QaItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
