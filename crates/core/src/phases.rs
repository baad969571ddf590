use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "size", rename_all = "snake_case")]
pub enum GroupSpec {
    Set(usize),
    Run(usize),
    Color(usize),
}

impl GroupSpec {
    pub fn size(self) -> usize {
        match self {
            GroupSpec::Set(size) | GroupSpec::Run(size) | GroupSpec::Color(size) => size,
        }
    }

    pub fn is_set(self) -> bool {
        matches!(self, GroupSpec::Set(_))
    }

    pub fn is_run(self) -> bool {
        matches!(self, GroupSpec::Run(_))
    }

    pub fn is_color(self) -> bool {
        matches!(self, GroupSpec::Color(_))
    }
}

impl fmt::Display for GroupSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupSpec::Set(size) => write!(f, "set of {size}"),
            GroupSpec::Run(size) => write!(f, "run of {size}"),
            GroupSpec::Color(size) => write!(f, "{size} cards of one color"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PhaseRequirement {
    pub description: &'static str,
    pub groups: &'static [GroupSpec],
}

/// How a requirement is searched for in a pooled hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhasePlan {
    Sets(Vec<usize>),
    Runs(Vec<usize>),
    Color(usize),
    Mixed { sets: Vec<usize>, runs: Vec<usize> },
}

impl PhaseRequirement {
    pub fn plan(&self) -> PhasePlan {
        let sets: Vec<usize> = self
            .groups
            .iter()
            .filter(|spec| spec.is_set())
            .map(|spec| spec.size())
            .collect();
        let runs: Vec<usize> = self
            .groups
            .iter()
            .filter(|spec| spec.is_run())
            .map(|spec| spec.size())
            .collect();
        if let Some(GroupSpec::Color(size)) = self.groups.iter().find(|spec| spec.is_color()) {
            return PhasePlan::Color(*size);
        }
        match (sets.is_empty(), runs.is_empty()) {
            (false, true) => PhasePlan::Sets(sets),
            (true, false) => PhasePlan::Runs(runs),
            _ => PhasePlan::Mixed { sets, runs },
        }
    }

    /// Whether a group of the same kind as `spec` (any size) belongs to this phase.
    pub fn allows_shape(&self, spec: GroupSpec) -> bool {
        self.groups
            .iter()
            .any(|own| std::mem::discriminant(own) == std::mem::discriminant(&spec))
    }
}

pub const PHASE_COUNT: usize = 10;

pub const PHASES: [PhaseRequirement; PHASE_COUNT] = [
    PhaseRequirement {
        description: "Two sets of three",
        groups: &[GroupSpec::Set(3), GroupSpec::Set(3)],
    },
    PhaseRequirement {
        description: "One set of three + one run of four",
        groups: &[GroupSpec::Set(3), GroupSpec::Run(4)],
    },
    PhaseRequirement {
        description: "One set of four + one run of four",
        groups: &[GroupSpec::Set(4), GroupSpec::Run(4)],
    },
    PhaseRequirement {
        description: "One run of seven",
        groups: &[GroupSpec::Run(7)],
    },
    PhaseRequirement {
        description: "One run of eight",
        groups: &[GroupSpec::Run(8)],
    },
    PhaseRequirement {
        description: "One run of nine",
        groups: &[GroupSpec::Run(9)],
    },
    PhaseRequirement {
        description: "Two sets of four",
        groups: &[GroupSpec::Set(4), GroupSpec::Set(4)],
    },
    PhaseRequirement {
        description: "Seven cards of one color",
        groups: &[GroupSpec::Color(7)],
    },
    PhaseRequirement {
        description: "One set of five + one set of two",
        groups: &[GroupSpec::Set(5), GroupSpec::Set(2)],
    },
    PhaseRequirement {
        description: "One set of five + one set of three",
        groups: &[GroupSpec::Set(5), GroupSpec::Set(3)],
    },
];

pub fn phase(index: usize) -> Option<&'static PhaseRequirement> {
    PHASES.get(index)
}

/// Phase a player moves to after completing `index`; wraps after the last.
pub fn next_phase(index: usize) -> usize {
    (index + 1) % PHASE_COUNT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plans_follow_group_kinds() {
        assert_eq!(PHASES[0].plan(), PhasePlan::Sets(vec![3, 3]));
        assert_eq!(
            PHASES[2].plan(),
            PhasePlan::Mixed {
                sets: vec![4],
                runs: vec![4]
            }
        );
        assert_eq!(PHASES[5].plan(), PhasePlan::Runs(vec![9]));
        assert_eq!(PHASES[7].plan(), PhasePlan::Color(7));
        assert_eq!(PHASES[8].plan(), PhasePlan::Sets(vec![5, 2]));
    }

    #[test]
    fn shapes_ignore_size() {
        assert!(PHASES[1].allows_shape(GroupSpec::Run(3)));
        assert!(!PHASES[0].allows_shape(GroupSpec::Run(4)));
        assert!(PHASES[7].allows_shape(GroupSpec::Color(9)));
    }

    #[test]
    fn out_of_range_phase_is_none() {
        assert!(phase(PHASE_COUNT).is_none());
        assert_eq!(next_phase(9), 0);
    }

    #[test]
    fn group_spec_wire_format() {
        let json = serde_json::to_string(&GroupSpec::Run(4)).expect("serialize");
        assert_eq!(json, r#"{"kind":"run","size":4}"#);
    }
}
