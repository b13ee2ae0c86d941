// User records read from the export file and rows written for the downgrade file

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Format of the `Last Login(UTC)` column
pub const LAST_LOGIN_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format of the `Creation Date` column
pub const CREATION_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format timestamps are stored in
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Account type assigned to every exported user
pub const DOWNGRADE_USER_TYPE: &str = "Basic";

/// Header row of the downgrade file, in column order
pub const EXPORT_HEADERS: [&str; 10] = [
    "Email",
    "First Name",
    "Last Name",
    "Phone Number",
    "Department",
    "User Type",
    "Large Meeting",
    "Webinar",
    "Job Title",
    "Location",
];

/// One user from the platform export. Columns are matched by header name;
/// extra columns are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "First Name")]
    pub first_name: String,
    #[serde(rename = "Last Name")]
    pub last_name: String,
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "User Group")]
    pub user_group: String,
    #[serde(rename = "IM Group")]
    pub im_group: String,
    /// None when the user never logged in (empty column)
    #[serde(rename = "Last Login(UTC)", deserialize_with = "deserialize_last_login")]
    pub last_login: Option<NaiveDateTime>,
    #[serde(rename = "Last Client Version")]
    pub last_client: String,
    #[serde(rename = "Creation Date", deserialize_with = "deserialize_creation_date")]
    pub creation_date: NaiveDate,
    #[serde(rename = "Role")]
    pub role: String,
    #[serde(rename = "User Type")]
    pub user_type: String,
    #[serde(rename = "Login Type")]
    pub login_type: String,
    #[serde(rename = "User Status")]
    pub user_status: String,
    #[serde(rename = "PMI")]
    pub pmi: String,
    #[serde(rename = "Job Title")]
    pub job_title: String,
    #[serde(rename = "Location")]
    pub location: String,
}

impl UserRecord {
    /// Stored text for the last login; empty when the user never logged in
    pub fn last_login_text(&self) -> String {
        self.last_login
            .map(|at| at.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default()
    }

    /// Stored text for the creation date, at midnight
    pub fn creation_date_text(&self) -> String {
        format!("{} 00:00:00", self.creation_date.format(CREATION_DATE_FORMAT))
    }
}

fn deserialize_last_login<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if raw.is_empty() {
        return Ok(None);
    }

    NaiveDateTime::parse_from_str(&raw, LAST_LOGIN_FORMAT)
        .map(Some)
        .map_err(|e| de::Error::custom(format!("invalid Last Login(UTC) {:?}: {}", raw, e)))
}

fn deserialize_creation_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;

    NaiveDate::parse_from_str(&raw, CREATION_DATE_FORMAT)
        .map_err(|e| de::Error::custom(format!("invalid Creation Date {:?}: {}", raw, e)))
}

/// The columns of a stored user that the downgrade file needs
#[derive(Debug, Clone, PartialEq)]
pub struct InactiveUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    pub job_title: String,
    pub location: String,
    pub last_login: String,
}

/// One row of the downgrade file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "First Name")]
    pub first_name: String,
    #[serde(rename = "Last Name")]
    pub last_name: String,
    #[serde(rename = "Phone Number")]
    pub phone_number: String,
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "User Type")]
    pub user_type: String,
    #[serde(rename = "Large Meeting")]
    pub large_meeting: String,
    #[serde(rename = "Webinar")]
    pub webinar: String,
    #[serde(rename = "Job Title")]
    pub job_title: String,
    #[serde(rename = "Location")]
    pub location: String,
}

impl ExportRow {
    /// Row requesting a downgrade of `user` to the basic account type
    pub fn downgrade(user: InactiveUser) -> Self {
        Self {
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone_number: String::new(),
            department: user.department,
            user_type: DOWNGRADE_USER_TYPE.to_string(),
            large_meeting: String::new(),
            webinar: String::new(),
            job_title: user.job_title,
            location: user.location,
        }
    }
}
