//! CSV export of session history.

use crate::{Result, WorkoutSession};
use std::io;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    plan: String,
    started_at: String,
    completed_at: Option<String>,
    body_weight: Option<f64>,
    tonnage: f64,
}

impl From<&WorkoutSession> for CsvRow {
    fn from(session: &WorkoutSession) -> Self {
        CsvRow {
            id: session.id.to_string(),
            plan: session.plan_name.clone(),
            started_at: session.started_at.to_rfc3339(),
            completed_at: session.completed_at.map(|t| t.to_rfc3339()),
            body_weight: session.body_weight,
            tonnage: session.tonnage,
        }
    }
}

/// Write session history as CSV, returning the number of rows written
pub fn write_history_csv<W: io::Write>(writer: W, sessions: &[WorkoutSession]) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for session in sessions {
        csv_writer.serialize(CsvRow::from(session))?;
    }
    csv_writer.flush()?;

    tracing::debug!("Wrote {} sessions to CSV", sessions.len());
    Ok(sessions.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn session(plan_name: &str, tonnage: f64) -> WorkoutSession {
        WorkoutSession {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            plan_id: None,
            plan_name: plan_name.into(),
            body_weight: Some(180.0),
            started_at: Utc::now(),
            completed_at: Some(Utc::now()),
            tonnage,
        }
    }

    #[test]
    fn test_writes_header_and_rows() {
        let sessions = vec![session("Push Day", 2200.0), session("Pull Day", 1750.0)];

        let mut buf = Vec::new();
        let count = write_history_csv(&mut buf, &sessions).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("plan"));
        assert!(lines[0].contains("tonnage"));
        assert!(lines[1].contains("Push Day"));
        assert!(lines[2].contains("Pull Day"));
    }

    #[test]
    fn test_empty_history_writes_nothing() {
        let mut buf = Vec::new();
        let count = write_history_csv(&mut buf, &[]).unwrap();
        assert_eq!(count, 0);
        assert!(buf.is_empty());
    }
}
