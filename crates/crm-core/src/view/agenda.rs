// File: crm-core/src/view/agenda.rs
// Purpose: Day planner view of the appointment collection

use chrono::NaiveDate;

use crate::model::Appointment;
use crate::text::collate;

/// Every appointment scheduled on `day`, completed ones included.
///
/// Ordered by priority (highest first), then by title ignoring case and
/// accents.
pub fn appointments_on(appointments: &[Appointment], day: NaiveDate) -> Vec<&Appointment> {
    let mut matching: Vec<&Appointment> = appointments.iter().filter(|a| a.date == day).collect();

    matching.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| collate(&a.title, &b.title))
            .then_with(|| a.id.cmp(&b.id))
    });

    matching
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, RecordId};

    fn appt(id: &str, title: &str, date: &str, priority: Priority, completed: bool) -> Appointment {
        Appointment {
            id: RecordId::new(id),
            title: title.to_string(),
            completed,
            priority,
            contact: None,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_day_view_orders_by_priority() {
        let appointments = vec![
            appt("A", "Ligar", "2024-06-01", Priority::Low, false),
            appt("B", "Visita", "2024-06-01", Priority::High, false),
            appt("C", "Reunião", "2024-05-30", Priority::Low, false),
        ];

        let ids: Vec<&str> = appointments_on(&appointments, day("2024-06-01"))
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn test_day_view_includes_completed_and_sorts_titles() {
        let appointments = vec![
            appt("1", "visita apto", "2024-06-01", Priority::Medium, true),
            appt("2", "Assinatura", "2024-06-01", Priority::Medium, false),
            appt("3", "Ótica comercial", "2024-06-01", Priority::Medium, false),
        ];

        let titles: Vec<&str> = appointments_on(&appointments, day("2024-06-01"))
            .iter()
            .map(|a| a.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Assinatura", "Ótica comercial", "visita apto"]);
    }

    #[test]
    fn test_day_view_empty_day() {
        let appointments = vec![appt("A", "Ligar", "2024-06-01", Priority::Low, false)];
        assert!(appointments_on(&appointments, day("2024-06-02")).is_empty());
    }
}
