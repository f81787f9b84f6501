//! Schedule (Primavera P6) task location types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::{GridSpec, LocationType};

/// The location-bearing fields of one P6 schedule task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct P6Task {
    /// Activity id (e.g. `"FAB.L1.CR.1040"`).
    pub task_code: String,
    /// Activity description.
    pub task_name: String,
    /// WBS tier names from the project root down to the task's parent.
    pub wbs_path: Vec<String>,
    /// Activity code assignments keyed by code type (e.g. `"Building"`,
    /// `"Level"`, `"Area"`).
    pub activity_codes: BTreeMap<String, String>,
}

impl P6Task {
    /// Creates a task with a code and name.
    #[must_use]
    pub fn new(task_code: &str, task_name: &str) -> Self {
        Self {
            task_code: task_code.to_string(),
            task_name: task_name.to_string(),
            ..Self::default()
        }
    }

    /// Sets the WBS tier path.
    #[must_use]
    pub fn with_wbs<I, S>(mut self, tiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.wbs_path = tiers.into_iter().map(Into::into).collect();
        self
    }

    /// Adds an activity code assignment.
    #[must_use]
    pub fn with_activity_code(mut self, code_type: &str, value: &str) -> Self {
        self.activity_codes
            .insert(code_type.to_string(), value.to_string());
        self
    }
}

/// Which task field a P6 location was taken from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum P6LocationSource {
    /// A WBS tier name
    Wbs,
    /// The activity description
    TaskName,
    /// An activity code assignment
    ActivityCode,
    /// The activity id
    TaskCode,
    /// Nothing matched; project-wide default
    Default,
}

/// The location extracted for one P6 task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct P6LocationResult {
    /// Precedence tier that produced the location.
    pub location_type: LocationType,
    /// Location code to resolve against the dimension table.
    pub location_code: String,
    /// Canonical building code, when found.
    pub building: Option<String>,
    /// Canonical level code, when found.
    pub level: Option<String>,
    /// Parsed grid for gridline hits.
    pub grid: Option<GridSpec>,
    /// Where the location was found.
    pub location_source: P6LocationSource,
}
