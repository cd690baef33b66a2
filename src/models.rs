use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Patient => "PATIENT",
            Role::Doctor => "DOCTOR",
            Role::Admin => "ADMIN",
        }
    }

    pub fn from_str(s: &str) -> Option<Role> {
        match s {
            "PATIENT" => Some(Role::Patient),
            "DOCTOR" => Some(Role::Doctor),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentType {
    InPerson,
    Teleconsultation,
}

impl AppointmentType {
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentType::InPerson => "IN_PERSON",
            AppointmentType::Teleconsultation => "TELECONSULTATION",
        }
    }

    pub fn from_str(s: &str) -> Option<AppointmentType> {
        match s {
            "IN_PERSON" => Some(AppointmentType::InPerson),
            "TELECONSULTATION" => Some(AppointmentType::Teleconsultation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "SCHEDULED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn from_str(s: &str) -> Option<AppointmentStatus> {
        match s {
            "SCHEDULED" => Some(AppointmentStatus::Scheduled),
            "COMPLETED" => Some(AppointmentStatus::Completed),
            "CANCELLED" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    // The stored bcrypt hash, serialized under the wire name of the
    // plaintext field it replaces.
    #[serde(rename = "password")]
    pub password_hash: String,
    pub role: Role,
    pub validated: bool,
    pub profile_picture_path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub validated: bool,
    #[serde(default)]
    pub profile_picture_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub date_time: NaiveDateTime,
    pub duration_in_minutes: i64,
    #[serde(rename = "type")]
    pub kind: AppointmentType,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub date_time: NaiveDateTime,
    pub duration_in_minutes: i64,
    #[serde(rename = "type")]
    pub kind: AppointmentType,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: i64,
    pub patient_id: i64,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub file_paths: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    pub patient_id: i64,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub file_paths: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub sender_id: i64,
    pub recipient_id: i64,
    pub content: String,
}
