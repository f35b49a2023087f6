//! Migrator configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What an existence predicate does when its catalog query fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExistencePolicy {
    /// Return the error to the caller.
    #[default]
    Propagate,
    /// Log the error and report the object as absent.
    FailOpen,
}

/// What column introspection does with a Firebird type it cannot name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedTypePolicy {
    /// Keep the column with no canonical type; the raw name stays readable.
    #[default]
    Surface,
    /// Fail the whole introspection call.
    Reject,
}

/// Statements that switch foreign-key enforcement off and on for the session
/// around a multi-table drop.
///
/// The default is MySQL's `SET FOREIGN_KEY_CHECKS = 0/1`, which Firebird
/// rejects: with the default, every `drop_tables` call logs two warnings and
/// enforcement stays on. Firebird has no session-wide switch, so hosts should
/// replace these statements with their own or clear the toggle through
/// [`MigratorOptions::foreign_key_toggle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyToggle {
    /// Runs before the first drop.
    pub disable: String,
    /// Runs after the last drop, on every exit path.
    pub enable: String,
}

impl Default for ForeignKeyToggle {
    fn default() -> Self {
        Self {
            disable: "SET FOREIGN_KEY_CHECKS = 0".to_string(),
            enable: "SET FOREIGN_KEY_CHECKS = 1".to_string(),
        }
    }
}

/// Options for [`FirebirdMigrator`](crate::migrator::FirebirdMigrator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigratorOptions {
    /// Failure handling for `has_*` predicates.
    pub existence_errors: ExistencePolicy,
    /// Handling of unmapped catalog types.
    pub unmapped_types: UnmappedTypePolicy,
    /// Foreign-key toggle for `drop_tables`; `None` skips it.
    pub foreign_key_toggle: Option<ForeignKeyToggle>,
}

impl Default for MigratorOptions {
    fn default() -> Self {
        Self {
            existence_errors: ExistencePolicy::default(),
            unmapped_types: UnmappedTypePolicy::default(),
            foreign_key_toggle: Some(ForeignKeyToggle::default()),
        }
    }
}

impl MigratorOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from JSON; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Treats failed existence checks as "absent".
    #[must_use]
    pub fn fail_open_existence_checks(mut self) -> Self {
        self.existence_errors = ExistencePolicy::FailOpen;
        self
    }

    /// Rejects columns whose Firebird type has no canonical name.
    #[must_use]
    pub fn reject_unmapped_types(mut self) -> Self {
        self.unmapped_types = UnmappedTypePolicy::Reject;
        self
    }

    /// Sets or clears the foreign-key toggle.
    #[must_use]
    pub fn foreign_key_toggle(mut self, toggle: Option<ForeignKeyToggle>) -> Self {
        self.foreign_key_toggle = toggle;
        self
    }
}
