//! # Shortest-Job-First (no preemptivo)
//!
//! En cada punto de decisión se elige, entre los procesos ya llegados y no
//! completados, el de menor ráfaga. Empates: menor llegada y luego menor
//! índice de entrada.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::error::{Result, SchedulerError};
use crate::metrics::{MetricsSummary, ScheduleMetrics};
use crate::process::{Process, WorkingSet};
use crate::scheduler::SchedulingAlgorithm;

/// Simula SJF no preemptivo y retorna la planificación completa.
///
/// La cola de listos es un min-heap ordenado por `(ráfaga, llegada, índice)`,
/// equivalente a elegir el mínimo por recorrido lineal.
///
/// # Errors
///
/// Retorna error si la lista está vacía o algún proceso tiene ráfaga 0.
pub fn sjf_schedule(processes: &[Process]) -> Result<ScheduleMetrics> {
    let mut working = WorkingSet::prepare(processes, SchedulingAlgorithm::Sjf)?;
    let order = working.arrival_order();
    let total = order.len();

    let mut ready = BinaryHeap::with_capacity(total);
    let mut cursor = 0;
    let mut clock = 0;

    while working.completed_count() < total {
        while cursor < total && working.arrival_time(order[cursor]) <= clock {
            let idx = order[cursor];
            ready.push(Reverse((
                working.remaining_time(idx),
                working.arrival_time(idx),
                idx,
            )));
            cursor += 1;
        }

        match ready.pop() {
            Some(Reverse((_, _, idx))) => {
                clock = working.execute(idx, clock);
            }
            None => {
                // Quedan procesos sin completar y ninguno listo: el próximo aún no llega
                let Some(&next) = order.get(cursor) else {
                    return Err(SchedulerError::InvariantViolation {
                        id: String::from("-"),
                        detail: String::from("cola vacía con procesos pendientes"),
                    });
                };
                let next_arrival = working.arrival_time(next);
                debug!(from = clock, to = next_arrival, "CPU ociosa");
                clock = next_arrival;
            }
        }
    }

    working.finish()
}

/// Promedios de turnaround, espera y respuesta bajo SJF no preemptivo.
pub fn sjf_metrics(processes: &[Process]) -> Result<MetricsSummary> {
    sjf_schedule(processes).map(|schedule| schedule.summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sjf_picks_shortest_arrived_job() {
        let processes = vec![
            Process::new("A", 0, 7),
            Process::new("B", 2, 4),
            Process::new("C", 4, 1),
            Process::new("D", 5, 4),
        ];
        let schedule = sjf_schedule(&processes).unwrap();

        // A 0-7, C 7-8, B 8-12, D 12-16
        assert_eq!(schedule.completion_order, vec!["A", "C", "B", "D"]);
        assert_eq!(schedule.summary.avg_waiting, 4.0);
    }

    #[test]
    fn test_sjf_is_not_preemptive() {
        let processes = vec![Process::new("Long", 0, 10), Process::new("Short", 1, 1)];
        let schedule = sjf_schedule(&processes).unwrap();

        assert_eq!(schedule.processes[0].completion_time, 10);
        assert_eq!(schedule.processes[1].start_time, 10);
    }

    #[test]
    fn test_sjf_burst_tie_prefers_earlier_arrival() {
        let processes = vec![
            Process::new("A", 0, 4),
            Process::new("Late", 3, 2),
            Process::new("Early", 1, 2),
        ];
        let schedule = sjf_schedule(&processes).unwrap();
        assert_eq!(schedule.completion_order, vec!["A", "Early", "Late"]);
    }

    #[test]
    fn test_sjf_full_tie_prefers_input_order() {
        let processes = vec![
            Process::new("P0", 0, 3),
            Process::new("P1", 0, 3),
            Process::new("P2", 0, 3),
        ];
        let schedule = sjf_schedule(&processes).unwrap();
        assert_eq!(schedule.completion_order, vec!["P0", "P1", "P2"]);
    }

    #[test]
    fn test_sjf_waits_for_first_arrival() {
        let processes = vec![Process::new("A", 5, 2)];
        let schedule = sjf_schedule(&processes).unwrap();

        assert_eq!(schedule.processes[0].start_time, 5);
        assert_eq!(schedule.summary.avg_response, 0.0);
    }
}
