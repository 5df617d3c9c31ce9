use std::collections::HashMap;

use serde::Serialize;
use shared::domain::{Employee, Gender};

pub const TOP_STATES_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateCount {
    pub state: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EmployeeStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub male: usize,
    pub female: usize,
    pub other: usize,
    /// Distinct states seen, before the ranking is cut to the top entries.
    pub states_covered: usize,
    pub top_states: Vec<StateCount>,
}

impl EmployeeStats {
    pub fn gender_count(&self, gender: Gender) -> usize {
        match gender {
            Gender::Male => self.male,
            Gender::Female => self.female,
            Gender::Other => self.other,
        }
    }

    pub fn active_percentage(&self) -> f64 {
        percentage(self.active, self.total)
    }

    pub fn inactive_percentage(&self) -> f64 {
        percentage(self.inactive, self.total)
    }

    pub fn gender_percentage(&self, gender: Gender) -> f64 {
        percentage(self.gender_count(gender), self.total)
    }

    pub fn state_percentage(&self, entry: &StateCount) -> f64 {
        percentage(entry.count, self.total)
    }
}

/// Share of `part` in `total` as a percentage; an empty total yields 0.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

pub fn compute_stats(employees: &[Employee]) -> EmployeeStats {
    let mut stats = EmployeeStats {
        total: employees.len(),
        ..Default::default()
    };

    // First-seen order is kept so the stable sort below breaks ties by it.
    let mut states: Vec<StateCount> = Vec::new();
    let mut state_index: HashMap<&str, usize> = HashMap::new();

    for employee in employees {
        if employee.is_active {
            stats.active += 1;
        } else {
            stats.inactive += 1;
        }
        match employee.gender {
            Gender::Male => stats.male += 1,
            Gender::Female => stats.female += 1,
            Gender::Other => stats.other += 1,
        }
        match state_index.get(employee.state.as_str()) {
            Some(&idx) => states[idx].count += 1,
            None => {
                state_index.insert(employee.state.as_str(), states.len());
                states.push(StateCount {
                    state: employee.state.clone(),
                    count: 1,
                });
            }
        }
    }

    stats.states_covered = states.len();
    states.sort_by(|a, b| b.count.cmp(&a.count));
    states.truncate(TOP_STATES_LIMIT);
    stats.top_states = states;
    stats
}
