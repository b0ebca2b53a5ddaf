// File: crm-core/src/view/stats.rs
// Purpose: Dashboard statistics over the appointment collection

use serde::Serialize;
use std::cmp::Ordering;

use crate::model::{Appointment, Priority};
use crate::snapshot::Snapshot;

/// How many pending appointments the dashboard lists
pub const SOONEST_LIMIT: usize = 3;

/// Pending appointments per priority level. All three levels are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityCounts {
    pub fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }

    fn bump(&mut self, priority: Priority) {
        match priority {
            Priority::High => self.high += 1,
            Priority::Medium => self.medium += 1,
            Priority::Low => self.low += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppointmentStats {
    pub total: usize,
    pub pending: usize,
    pub pending_by_priority: PriorityCounts,
    /// Up to [`SOONEST_LIMIT`] pending appointments, soonest first
    pub soonest: Vec<Appointment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub contacts: usize,
    pub properties: usize,
    pub appointments: AppointmentStats,
}

/// Due-date ordering: date ascending, then priority descending.
///
/// Title and id break any remaining tie so the order never depends on how
/// the backend happened to return the rows.
pub fn due_order(a: &Appointment, b: &Appointment) -> Ordering {
    a.date
        .cmp(&b.date)
        .then_with(|| b.priority.cmp(&a.priority))
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn appointment_stats(appointments: &[Appointment]) -> AppointmentStats {
    let mut pending_by_priority = PriorityCounts::default();
    let mut pending: Vec<&Appointment> = Vec::new();

    for appointment in appointments.iter().filter(|a| !a.completed) {
        pending_by_priority.bump(appointment.priority);
        pending.push(appointment);
    }

    pending.sort_by(|a, b| due_order(a, b));

    AppointmentStats {
        total: appointments.len(),
        pending: pending.len(),
        pending_by_priority,
        soonest: pending.into_iter().take(SOONEST_LIMIT).cloned().collect(),
    }
}

pub fn dashboard_stats(snapshot: &Snapshot) -> DashboardStats {
    DashboardStats {
        contacts: snapshot.contacts.len(),
        properties: snapshot.properties.len(),
        appointments: appointment_stats(&snapshot.appointments),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordId;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn appt(id: &str, date: &str, priority: Priority, completed: bool) -> Appointment {
        Appointment {
            id: RecordId::new(id),
            title: format!("Compromisso {id}"),
            completed,
            priority,
            contact: None,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        }
    }

    fn ids(appointments: &[Appointment]) -> Vec<&str> {
        appointments.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_empty_collection_yields_zeroes() {
        let stats = appointment_stats(&[]);
        assert_eq!(stats, AppointmentStats::default());
        assert_eq!(stats.pending_by_priority.get(Priority::High), 0);
    }

    #[test]
    fn test_soonest_orders_by_date_then_priority() {
        let appointments = vec![
            appt("A", "2024-06-01", Priority::Low, false),
            appt("B", "2024-06-01", Priority::High, false),
            appt("C", "2024-05-30", Priority::Low, false),
        ];

        let stats = appointment_stats(&appointments);
        assert_eq!(ids(&stats.soonest), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_soonest_skips_completed_and_truncates() {
        let appointments = vec![
            appt("done", "2024-01-01", Priority::High, true),
            appt("p1", "2024-02-01", Priority::Low, false),
            appt("p2", "2024-02-02", Priority::Medium, false),
            appt("p3", "2024-02-03", Priority::High, false),
            appt("p4", "2024-02-04", Priority::High, false),
        ];

        let stats = appointment_stats(&appointments);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.pending, 4);
        assert_eq!(ids(&stats.soonest), vec!["p1", "p2", "p3"]);
        assert_eq!(
            stats.pending_by_priority,
            PriorityCounts {
                high: 2,
                medium: 1,
                low: 1
            }
        );
    }

    #[test]
    fn test_counts_are_consistent_for_every_mix() {
        let priorities = [Priority::Low, Priority::Medium, Priority::High];
        let mut appointments = Vec::new();
        for i in 0..30 {
            appointments.push(appt(
                &format!("x{i:02}"),
                &format!("2024-03-{:02}", (i % 28) + 1),
                priorities[i % 3],
                i % 4 == 0,
            ));
            let stats = appointment_stats(&appointments);
            assert_eq!(stats.pending_by_priority.total(), stats.pending);
            assert!(stats.pending <= stats.total);
            assert_eq!(stats.soonest.len(), stats.pending.min(SOONEST_LIMIT));
        }
    }

    #[test]
    fn test_soonest_is_independent_of_input_order() {
        let mut appointments = vec![
            appt("m", "2024-06-01", Priority::Medium, false),
            appt("n", "2024-06-01", Priority::Medium, false),
            appt("o", "2024-06-02", Priority::High, false),
            appt("p", "2024-06-01", Priority::Medium, false),
        ];
        let forward = appointment_stats(&appointments);
        appointments.reverse();
        let backward = appointment_stats(&appointments);

        assert_eq!(forward.soonest, backward.soonest);
    }

    #[test]
    fn test_dashboard_counts_collections() {
        let snapshot = Snapshot::new(
            Vec::new(),
            vec![appt("A", "2024-06-01", Priority::Low, false)],
            Vec::new(),
        );
        let stats = dashboard_stats(&snapshot);
        assert_eq!(stats.contacts, 0);
        assert_eq!(stats.properties, 0);
        assert_eq!(stats.appointments.pending, 1);
    }
}
