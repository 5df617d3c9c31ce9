use shared::domain::{Employee, Gender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenderFilter {
    #[default]
    All,
    Male,
    Female,
    Other,
}

impl GenderFilter {
    fn matches(self, gender: Gender) -> bool {
        match self {
            GenderFilter::All => true,
            GenderFilter::Male => gender == Gender::Male,
            GenderFilter::Female => gender == Gender::Female,
            GenderFilter::Other => gender == Gender::Other,
        }
    }
}

impl From<Gender> for GenderFilter {
    fn from(gender: Gender) -> Self {
        match gender {
            Gender::Male => GenderFilter::Male,
            Gender::Female => GenderFilter::Female,
            Gender::Other => GenderFilter::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    fn matches(self, is_active: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => is_active,
            StatusFilter::Inactive => !is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmployeeFilters {
    pub search: String,
    pub gender: GenderFilter,
    pub status: StatusFilter,
}

impl EmployeeFilters {
    pub fn has_active_filters(&self) -> bool {
        !self.search.is_empty()
            || self.gender != GenderFilter::All
            || self.status != StatusFilter::All
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        self.matches_folded(&self.search.to_lowercase(), employee)
    }

    // `needle` is the already lowercased search string.
    fn matches_folded(&self, needle: &str, employee: &Employee) -> bool {
        (needle.is_empty() || employee.full_name.to_lowercase().contains(needle))
            && self.gender.matches(employee.gender)
            && self.status.matches(employee.is_active)
    }
}

/// Returns the employees passing `filters`, in their original order.
pub fn apply_filters<'a>(
    employees: &'a [Employee],
    filters: &EmployeeFilters,
) -> Vec<&'a Employee> {
    let needle = filters.search.to_lowercase();
    employees
        .iter()
        .filter(|employee| filters.matches_folded(&needle, employee))
        .collect()
}
