use crate::db::DbConnection;
use crate::models::{
    Appointment, AppointmentStatus, AppointmentType, Message, NewAppointment, NewMessage,
    NewRecord, NewUser, Record, Role, User,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

fn user_from_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        password_hash: row.get(4)?,
        role: Role::from_str(&row.get::<_, String>(5)?).unwrap(),
        validated: row.get(6)?,
        profile_picture_path: row.get(7)?,
    })
}

pub async fn insert_user(
    conn: &DbConnection,
    new: &NewUser,
    password_hash: &str,
) -> Result<User, rusqlite::Error> {
    let conn = conn.lock().await;
    conn.execute(
        "INSERT INTO users (first_name, last_name, email, password_hash, role, validated, profile_picture_path) VALUES (?, ?, ?, ?, ?, ?, ?)",
        params![
            new.first_name,
            new.last_name,
            new.email,
            password_hash,
            new.role.as_str(),
            new.validated,
            new.profile_picture_path
        ],
    )?;

    Ok(User {
        id: conn.last_insert_rowid(),
        first_name: new.first_name.clone(),
        last_name: new.last_name.clone(),
        email: new.email.clone(),
        password_hash: password_hash.to_string(),
        role: new.role,
        validated: new.validated,
        profile_picture_path: new.profile_picture_path.clone(),
    })
}

pub async fn find_user_by_email(
    conn: &DbConnection,
    email: &str,
) -> Result<Option<User>, rusqlite::Error> {
    conn.lock()
        .await
        .query_row(
            "SELECT id, first_name, last_name, email, password_hash, role, validated, profile_picture_path FROM users WHERE email = ?",
            [email],
            user_from_row,
        )
        .optional()
}

fn appointment_from_row(row: &rusqlite::Row) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        date_time: NaiveDateTime::parse_from_str(&row.get::<_, String>(3)?, DATE_TIME_FORMAT)
            .unwrap(),
        duration_in_minutes: row.get(4)?,
        kind: AppointmentType::from_str(&row.get::<_, String>(5)?).unwrap(),
        status: AppointmentStatus::from_str(&row.get::<_, String>(6)?).unwrap(),
        notes: row.get(7)?,
    })
}

pub async fn insert_appointment(
    conn: &DbConnection,
    new: &NewAppointment,
) -> Result<Appointment, rusqlite::Error> {
    let conn = conn.lock().await;
    conn.execute(
        "INSERT INTO appointments (patient_id, doctor_id, date_time, duration_in_minutes, type, status, notes) VALUES (?, ?, ?, ?, ?, ?, ?)",
        params![
            new.patient_id,
            new.doctor_id,
            new.date_time.format(DATE_TIME_FORMAT).to_string(),
            new.duration_in_minutes,
            new.kind.as_str(),
            new.status.as_str(),
            new.notes
        ],
    )?;

    Ok(Appointment {
        id: conn.last_insert_rowid(),
        patient_id: new.patient_id,
        doctor_id: new.doctor_id,
        date_time: new.date_time,
        duration_in_minutes: new.duration_in_minutes,
        kind: new.kind,
        status: new.status,
        notes: new.notes.clone(),
    })
}

pub async fn list_appointments(conn: &DbConnection) -> Result<Vec<Appointment>, rusqlite::Error> {
    let conn = conn.lock().await;
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, doctor_id, date_time, duration_in_minutes, type, status, notes FROM appointments",
    )?;
    let appointments = stmt.query_map([], appointment_from_row)?;
    appointments.collect()
}

pub async fn appointments_for_patient(
    conn: &DbConnection,
    patient_id: i64,
) -> Result<Vec<Appointment>, rusqlite::Error> {
    let conn = conn.lock().await;
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, doctor_id, date_time, duration_in_minutes, type, status, notes FROM appointments WHERE patient_id = ?",
    )?;
    let appointments = stmt.query_map([patient_id], appointment_from_row)?;
    appointments.collect()
}

pub async fn appointments_for_doctor(
    conn: &DbConnection,
    doctor_id: i64,
) -> Result<Vec<Appointment>, rusqlite::Error> {
    let conn = conn.lock().await;
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, doctor_id, date_time, duration_in_minutes, type, status, notes FROM appointments WHERE doctor_id = ?",
    )?;
    let appointments = stmt.query_map([doctor_id], appointment_from_row)?;
    appointments.collect()
}

fn record_from_row(row: &rusqlite::Row) -> rusqlite::Result<Record> {
    Ok(Record {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        date: NaiveDate::parse_from_str(&row.get::<_, String>(4)?, "%Y-%m-%d").unwrap(),
        file_paths: Vec::new(),
    })
}

fn load_file_paths(conn: &Connection, mut record: Record) -> Result<Record, rusqlite::Error> {
    let mut stmt =
        conn.prepare("SELECT file_path FROM record_files WHERE record_id = ? ORDER BY position")?;
    let paths = stmt.query_map([record.id], |row| row.get(0))?;
    record.file_paths = paths.collect::<Result<_, _>>()?;
    Ok(record)
}

pub async fn insert_record(
    conn: &DbConnection,
    new: &NewRecord,
) -> Result<Record, rusqlite::Error> {
    let conn = conn.lock().await;
    conn.execute(
        "INSERT INTO records (patient_id, title, description, date) VALUES (?, ?, ?, ?)",
        params![
            new.patient_id,
            new.title,
            new.description,
            new.date.to_string()
        ],
    )?;
    let id = conn.last_insert_rowid();

    for (position, file_path) in new.file_paths.iter().enumerate() {
        conn.execute(
            "INSERT INTO record_files (record_id, position, file_path) VALUES (?, ?, ?)",
            params![id, position as i64, file_path],
        )?;
    }

    Ok(Record {
        id,
        patient_id: new.patient_id,
        title: new.title.clone(),
        description: new.description.clone(),
        date: new.date,
        file_paths: new.file_paths.clone(),
    })
}

pub async fn list_records(conn: &DbConnection) -> Result<Vec<Record>, rusqlite::Error> {
    let conn = conn.lock().await;
    let mut stmt = conn.prepare("SELECT id, patient_id, title, description, date FROM records")?;
    let records: Vec<Record> = stmt
        .query_map([], record_from_row)?
        .collect::<Result<_, _>>()?;
    records
        .into_iter()
        .map(|record| load_file_paths(&conn, record))
        .collect()
}

pub async fn records_for_patient(
    conn: &DbConnection,
    patient_id: i64,
) -> Result<Vec<Record>, rusqlite::Error> {
    let conn = conn.lock().await;
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, title, description, date FROM records WHERE patient_id = ?",
    )?;
    let records: Vec<Record> = stmt
        .query_map([patient_id], record_from_row)?
        .collect::<Result<_, _>>()?;
    records
        .into_iter()
        .map(|record| load_file_paths(&conn, record))
        .collect()
}

fn message_from_row(row: &rusqlite::Row) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get(0)?,
        sender_id: row.get(1)?,
        recipient_id: row.get(2)?,
        content: row.get(3)?,
        timestamp: DateTime::parse_from_rfc3339(&row.get::<_, String>(4)?)
            .unwrap()
            .with_timezone(&Utc),
    })
}

pub async fn insert_message(
    conn: &DbConnection,
    new: &NewMessage,
) -> Result<Message, rusqlite::Error> {
    let timestamp = Utc::now();
    let conn = conn.lock().await;
    conn.execute(
        "INSERT INTO messages (sender_id, recipient_id, content, timestamp) VALUES (?, ?, ?, ?)",
        params![
            new.sender_id,
            new.recipient_id,
            new.content,
            timestamp.to_rfc3339()
        ],
    )?;

    Ok(Message {
        id: conn.last_insert_rowid(),
        sender_id: new.sender_id,
        recipient_id: new.recipient_id,
        content: new.content.clone(),
        timestamp,
    })
}

pub async fn list_messages(conn: &DbConnection) -> Result<Vec<Message>, rusqlite::Error> {
    let conn = conn.lock().await;
    let mut stmt =
        conn.prepare("SELECT id, sender_id, recipient_id, content, timestamp FROM messages")?;
    let messages = stmt.query_map([], message_from_row)?;
    messages.collect()
}

pub async fn messages_for_user(
    conn: &DbConnection,
    user_id: i64,
) -> Result<Vec<Message>, rusqlite::Error> {
    let conn = conn.lock().await;
    let mut stmt = conn.prepare(
        "SELECT id, sender_id, recipient_id, content, timestamp FROM messages WHERE sender_id = ?1 OR recipient_id = ?1",
    )?;
    let messages = stmt.query_map([user_id], message_from_row)?;
    messages.collect()
}
