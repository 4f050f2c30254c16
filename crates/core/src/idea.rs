//! Closed vocabularies for ideas and the review lifecycle.
//!
//! Every enum is stored and sent over the wire as a stable snake_case tag
//! (`in_development`, `other_orgs`). The Swedish display text used by the
//! municipality is available through `label()` and is never persisted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

macro_rules! define_tag_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => ($tag:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
        #[serde(rename_all = "snake_case")]
        #[sqlx(type_name = "TEXT", rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Stable machine-readable tag (storage and wire format).
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $tag ),+
                }
            }

            /// Localized display text.
            pub fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $tag => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        "Unknown {} '{other}'. Must be one of: {}",
                        stringify!($name),
                        [$( $tag ),+].join(", ")
                    ))),
                }
            }
        }
    };
}

define_tag_enum! {
    /// What kind of submission an idea is.
    IdeaType {
        Idea => ("idea", "idé"),
        Problem => ("problem", "problem"),
        Need => ("need", "behov"),
        Improvement => ("improvement", "förbättring"),
    }
}

define_tag_enum! {
    /// Review lifecycle state of an idea.
    IdeaStatus {
        New => ("new", "ny"),
        Reviewing => ("reviewing", "granskning"),
        Approved => ("approved", "godkänd"),
        InDevelopment => ("in_development", "utveckling"),
        Implemented => ("implemented", "implementerad"),
        Rejected => ("rejected", "avvisad"),
    }
}

define_tag_enum! {
    Priority {
        Low => ("low", "låg"),
        Medium => ("medium", "medel"),
        High => ("high", "hög"),
    }
}

define_tag_enum! {
    /// Who would benefit from the idea.
    TargetGroup {
        Citizens => ("citizens", "medborgare"),
        Businesses => ("businesses", "företag"),
        Employees => ("employees", "medarbetare"),
        OtherOrgs => ("other_orgs", "andra organisationer"),
    }
}

define_tag_enum! {
    /// Outcome of the service-mapping analysis.
    ServiceRecommendation {
        ExistingService => ("existing_service", "befintlig tjänst"),
        DevelopExisting => ("develop_existing", "vidareutveckla befintlig tjänst"),
        NewService => ("new_service", "ny tjänst"),
    }
}

define_tag_enum! {
    /// Estimated development effort attached to a service recommendation.
    DevelopmentImpact {
        Low => ("low", "låg"),
        Medium => ("medium", "medel"),
        High => ("high", "hög"),
    }
}

impl Default for IdeaStatus {
    fn default() -> Self {
        Self::New
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Priority {
    /// Sort weight, highest priority first when sorted descending.
    pub fn weight(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Status lifecycle
// ---------------------------------------------------------------------------

impl IdeaStatus {
    /// The next state on the main review path, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::New => Some(Self::Reviewing),
            Self::Reviewing => Some(Self::Approved),
            Self::Approved => Some(Self::InDevelopment),
            Self::InDevelopment => Some(Self::Implemented),
            Self::Implemented | Self::Rejected => None,
        }
    }

    /// Implemented and rejected ideas never change status again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Implemented | Self::Rejected)
    }

    /// Whether an explicit update may move an idea from `self` to `target`.
    ///
    /// Staying in the same state is always allowed (no-op). Otherwise the
    /// idea may advance one step along the review path, or be rejected from
    /// any non-terminal state.
    pub fn can_transition_to(self, target: Self) -> bool {
        if self == target {
            return true;
        }
        if target == Self::Rejected {
            return !self.is_terminal();
        }
        self.next() == Some(target)
    }
}

/// Check a requested status change, producing a validation error that names
/// both states when it is not allowed.
pub fn validate_status_transition(from: IdeaStatus, to: IdeaStatus) -> Result<(), CoreError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid status transition from '{from}' to '{to}'"
        )))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
