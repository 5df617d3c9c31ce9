use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

id_newtype!(EmployeeId);
id_newtype!(UserId);

const MIN_FULL_NAME_CHARS: usize = 2;

/// States and union territories accepted for an employee's `state` field.
pub const INDIAN_STATES: &[&str] = &[
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
    "Andaman and Nicobar Islands",
    "Chandigarh",
    "Dadra and Nagar Haveli and Daman and Diu",
    "Delhi",
    "Jammu and Kashmir",
    "Ladakh",
    "Lakshadweep",
    "Puducherry",
];

pub fn is_known_state(state: &str) -> bool {
    INDIAN_STATES.contains(&state)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub full_name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub profile_image: String,
    pub state: String,
    pub is_active: bool,
}

impl Employee {
    pub fn has_profile_image(&self) -> bool {
        !self.profile_image.is_empty()
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_active {
            "Active"
        } else {
            "Inactive"
        }
    }
}

/// Everything an employee record carries except the endpoint-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeFormData {
    pub full_name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub profile_image: String,
    pub state: String,
    pub is_active: bool,
}

impl EmployeeFormData {
    pub fn new(
        full_name: impl Into<String>,
        gender: Gender,
        date_of_birth: NaiveDate,
        state: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            gender,
            date_of_birth,
            profile_image: String::new(),
            state: state.into(),
            is_active: true,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_at(Local::now().date_naive())
    }

    pub fn validate_at(&self, today: NaiveDate) -> Result<(), ValidationError> {
        if self.full_name.trim().chars().count() < MIN_FULL_NAME_CHARS {
            return Err(ValidationError::NameTooShort {
                min: MIN_FULL_NAME_CHARS,
            });
        }
        if self.date_of_birth > today {
            return Err(ValidationError::DateOfBirthInFuture(self.date_of_birth));
        }
        if !is_known_state(&self.state) {
            return Err(ValidationError::UnknownState(self.state.clone()));
        }
        if !self.profile_image.is_empty() {
            validate_profile_image(&self.profile_image)?;
        }
        Ok(())
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

impl From<&Employee> for EmployeeFormData {
    fn from(employee: &Employee) -> Self {
        Self {
            full_name: employee.full_name.clone(),
            gender: employee.gender,
            date_of_birth: employee.date_of_birth,
            profile_image: employee.profile_image.clone(),
            state: employee.state.clone(),
            is_active: employee.is_active,
        }
    }
}

/// Builds the `data:` URL stored in `profile_image`.
pub fn encode_profile_image(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(bytes))
}

fn validate_profile_image(raw: &str) -> Result<(), ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidProfileImage(reason.to_string());

    let rest = raw
        .strip_prefix("data:image/")
        .ok_or_else(|| invalid("expected a data:image/ url"))?;
    let (media, payload) = rest
        .split_once(',')
        .ok_or_else(|| invalid("missing payload separator"))?;
    let subtype = media
        .strip_suffix(";base64")
        .ok_or_else(|| invalid("payload must be base64 encoded"))?;
    if subtype.is_empty() {
        return Err(invalid("missing image subtype"));
    }
    STANDARD
        .decode(payload)
        .map_err(|err| invalid(&format!("bad base64 payload: {err}")))?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}
