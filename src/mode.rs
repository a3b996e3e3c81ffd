//! Operating mode gating which rules run

use serde::{Deserialize, Serialize};

/// Linting mode
///
/// `toggle` cycles Draft -> Review -> Off -> Draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// No checking; diagnostics are cleared
    Off,
    /// Everyday checks while writing code
    #[default]
    Draft,
    /// Draft checks plus documentation, nesting and cleanliness checks
    Review,
}

impl Mode {
    /// The mode following this one in the toggle cycle
    pub fn next(self) -> Self {
        match self {
            Mode::Draft => Mode::Review,
            Mode::Review => Mode::Off,
            Mode::Off => Mode::Draft,
        }
    }

    pub fn is_active(self) -> bool {
        self != Mode::Off
    }

    pub fn is_review(self) -> bool {
        self == Mode::Review
    }

    /// Whether rules of tier `tier` run in this mode
    pub fn includes(self, tier: Mode) -> bool {
        match (self, tier) {
            (Mode::Off, _) | (_, Mode::Off) => false,
            (Mode::Draft, Mode::Review) => false,
            _ => true,
        }
    }

    /// Status indicator text
    pub fn status_label(self) -> String {
        format!("lint40: {}", self)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Off => write!(f, "off"),
            Mode::Draft => write!(f, "draft"),
            Mode::Review => write!(f, "review"),
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off" | "disabled" => Ok(Mode::Off),
            "draft" => Ok(Mode::Draft),
            "review" => Ok(Mode::Review),
            _ => Err(format!("Unknown mode: {}", s)),
        }
    }
}
