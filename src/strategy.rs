//! Optimization strategies and their fixed score weights.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::error::SimulationError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStrategy {
    #[default]
    General,
    Cpu,
    Memory,
    Io,
}

/// Weight of every score component. Each strategy's weights sum to 1.0 so scores of
/// different candidates are comparable.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyWeights {
    pub cpu_fit: f64,
    pub memory_fit: f64,
    pub io_fit: f64,
    pub cost_efficiency: f64,
    pub fit: f64,
    pub zone: f64,
    pub gpu: f64,
    pub ephemeral_os: f64,
    pub nested_virt: f64,
    pub spot: f64,
    pub confidential: f64,
}

const NO_WEIGHTS: StrategyWeights = StrategyWeights {
    cpu_fit: 0.0,
    memory_fit: 0.0,
    io_fit: 0.0,
    cost_efficiency: 0.0,
    fit: 0.0,
    zone: 0.0,
    gpu: 0.0,
    ephemeral_os: 0.0,
    nested_virt: 0.0,
    spot: 0.0,
    confidential: 0.0,
};

const GENERAL_WEIGHTS: StrategyWeights = StrategyWeights {
    cost_efficiency: 0.3,
    fit: 0.2,
    zone: 0.1,
    gpu: 0.1,
    ephemeral_os: 0.1,
    nested_virt: 0.1,
    spot: 0.05,
    confidential: 0.05,
    ..NO_WEIGHTS
};

const CPU_WEIGHTS: StrategyWeights = StrategyWeights {
    cpu_fit: 0.5,
    cost_efficiency: 0.2,
    fit: 0.1,
    zone: 0.1,
    gpu: 0.1,
    ..NO_WEIGHTS
};

const MEMORY_WEIGHTS: StrategyWeights = StrategyWeights {
    memory_fit: 0.5,
    cost_efficiency: 0.2,
    fit: 0.1,
    zone: 0.1,
    gpu: 0.1,
    ..NO_WEIGHTS
};

const IO_WEIGHTS: StrategyWeights = StrategyWeights {
    io_fit: 0.5,
    cost_efficiency: 0.2,
    fit: 0.1,
    zone: 0.1,
    gpu: 0.1,
    ..NO_WEIGHTS
};

impl StrategyWeights {
    pub fn total(&self) -> f64 {
        self.cpu_fit
            + self.memory_fit
            + self.io_fit
            + self.cost_efficiency
            + self.fit
            + self.zone
            + self.gpu
            + self.ephemeral_os
            + self.nested_virt
            + self.spot
            + self.confidential
    }
}

impl SelectionStrategy {
    pub const ALL: [SelectionStrategy; 4] = [
        SelectionStrategy::General,
        SelectionStrategy::Cpu,
        SelectionStrategy::Memory,
        SelectionStrategy::Io,
    ];

    pub fn weights(&self) -> &'static StrategyWeights {
        match self {
            SelectionStrategy::General => &GENERAL_WEIGHTS,
            SelectionStrategy::Cpu => &CPU_WEIGHTS,
            SelectionStrategy::Memory => &MEMORY_WEIGHTS,
            SelectionStrategy::Io => &IO_WEIGHTS,
        }
    }
}

impl Display for SelectionStrategy {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            SelectionStrategy::General => write!(f, "general"),
            SelectionStrategy::Cpu => write!(f, "cpu"),
            SelectionStrategy::Memory => write!(f, "memory"),
            SelectionStrategy::Io => write!(f, "io"),
        }
    }
}

impl FromStr for SelectionStrategy {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(SelectionStrategy::General),
            "cpu" => Ok(SelectionStrategy::Cpu),
            "memory" => Ok(SelectionStrategy::Memory),
            "io" => Ok(SelectionStrategy::Io),
            _ => Err(SimulationError::UnknownStrategy(s.to_string())),
        }
    }
}
