use crate::models::user::Role;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub year_of_study: Option<String>,
    #[serde(default)]
    pub gpa: Option<String>,
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyProfile {
    pub id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub university: Option<String>,
}

/// Role-specific profile record
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Profile {
    Student(StudentProfile),
    Faculty(FacultyProfile),
}

impl Profile {
    /// Decode a profile record for the given role.
    ///
    /// The two record shapes overlap (every field but the ids is optional),
    /// so the role has to pick the shape.
    pub fn from_value(role: Role, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match role {
            Role::Student => Profile::Student(serde_json::from_value(value)?),
            Role::Faculty => Profile::Faculty(serde_json::from_value(value)?),
        })
    }
}

/// Partial profile update. Unset fields are left untouched by the service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_of_study: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
}

impl ProfileUpdate {
    /// Names of the set fields that the given role may not edit
    pub fn disallowed_fields(&self, role: Role) -> Vec<&'static str> {
        let student_only = [
            ("student_id", self.student_id.is_some()),
            ("major", self.major.is_some()),
            ("year_of_study", self.year_of_study.is_some()),
            ("gpa", self.gpa.is_some()),
            ("bio", self.bio.is_some()),
        ];
        let faculty_only = [
            ("employee_id", self.employee_id.is_some()),
            ("department", self.department.is_some()),
            ("position", self.position.is_some()),
        ];

        let foreign: &[(&'static str, bool)] = match role {
            Role::Student => &faculty_only,
            Role::Faculty => &student_only,
        };

        foreign
            .iter()
            .filter(|(_, set)| *set)
            .map(|(name, _)| *name)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        *self == ProfileUpdate::default()
    }
}
