use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Rest,
}

impl Phase {
    /// The phase that follows this one. The cycle never ends.
    pub fn other(self) -> Self {
        match self {
            Phase::Work => Phase::Rest,
            Phase::Rest => Phase::Work,
        }
    }

    /// Display label used by the timer readout.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Work!",
            Phase::Rest => "Rest!",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::Rest => "rest",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
