//! # Round Robin
//!
//! Planificación preemptiva con quantum fijo sobre una cola FIFO de listos.
//!
//! Regla de admisión: tras cada porción de ejecución se encolan primero los
//! procesos que llegaron durante esa porción (en orden de llegada y luego de
//! índice) y solo después se reencola el proceso interrumpido.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::error::{Result, SchedulerError};
use crate::metrics::{MetricsSummary, ScheduleMetrics};
use crate::process::{Process, WorkingSet};
use crate::scheduler::SchedulingAlgorithm;

/// Cola de listos con su cursor de admisión sobre los procesos pendientes.
struct ReadyQueue {
    /// Índices de procesos ordenados por (llegada, índice)
    order: Vec<usize>,
    /// Primer proceso de `order` aún no admitido
    cursor: usize,
    queue: VecDeque<usize>,
}

impl ReadyQueue {
    fn new(order: Vec<usize>) -> Self {
        let capacity = order.len();
        Self {
            order,
            cursor: 0,
            queue: VecDeque::with_capacity(capacity),
        }
    }

    /// Encola todos los procesos no admitidos con llegada <= `clock`.
    fn admit(&mut self, working: &WorkingSet, clock: u64) {
        while let Some(&idx) = self.order.get(self.cursor) {
            if working.arrival_time(idx) > clock {
                break;
            }
            self.queue.push_back(idx);
            self.cursor += 1;
        }
    }

    fn next_arrival(&self, working: &WorkingSet) -> Option<u64> {
        self.order
            .get(self.cursor)
            .map(|&idx| working.arrival_time(idx))
    }
}

/// Simula Round Robin con el quantum indicado y retorna la planificación completa.
///
/// # Errors
///
/// - [`SchedulerError::InvalidQuantum`] si `quantum == 0`
/// - Los errores de validación de la lista de procesos
pub fn round_robin_schedule(processes: &[Process], quantum: u64) -> Result<ScheduleMetrics> {
    if quantum == 0 {
        warn!("Quantum 0 rechazado");
        return Err(SchedulerError::InvalidQuantum(quantum));
    }

    let mut working = WorkingSet::prepare(processes, SchedulingAlgorithm::RoundRobin { quantum })?;
    let total = working.records.len();
    let mut ready = ReadyQueue::new(working.arrival_order());
    let mut clock = 0;

    while working.completed_count() < total {
        ready.admit(&working, clock);

        let Some(idx) = ready.queue.pop_front() else {
            match ready.next_arrival(&working) {
                Some(next_arrival) => {
                    debug!(from = clock, to = next_arrival, "CPU ociosa");
                    clock = next_arrival;
                    continue;
                }
                None => {
                    return Err(SchedulerError::InvariantViolation {
                        id: String::from("-"),
                        detail: String::from("cola vacía con procesos pendientes"),
                    })
                }
            }
        };

        clock = working.execute(idx, clock);

        // Los recién llegados van delante del proceso interrumpido
        ready.admit(&working, clock);

        if working.remaining_time(idx) > 0 {
            debug!(
                id = %working.records[idx].process.id,
                remaining = working.remaining_time(idx),
                "Quantum agotado, reencolando"
            );
            ready.queue.push_back(idx);
        }
    }

    working.finish()
}

/// Promedios de turnaround, espera y respuesta bajo Round Robin.
///
/// # Examples
///
/// ```rust
/// use cpu_scheduling_simulator::{round_robin_metrics, Process};
///
/// let processes = vec![Process::new("A", 0, 4), Process::new("B", 0, 4)];
/// let summary = round_robin_metrics(&processes, 2).unwrap();
/// assert_eq!(summary.avg_response, 1.0);
/// assert!(round_robin_metrics(&processes, 0).is_err());
/// ```
pub fn round_robin_metrics(processes: &[Process], quantum: u64) -> Result<MetricsSummary> {
    round_robin_schedule(processes, quantum).map(|schedule| schedule.summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(schedule: &ScheduleMetrics) -> Vec<(String, u64, u64)> {
        schedule
            .timeline
            .iter()
            .map(|slice| (slice.id.clone(), slice.start, slice.end))
            .collect()
    }

    #[test]
    fn test_zero_quantum_is_rejected() {
        let processes = vec![Process::new("A", 0, 3)];
        let err = round_robin_schedule(&processes, 0).unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidQuantum(0)));
    }

    #[test]
    fn test_newcomers_queue_ahead_of_preempted_process() {
        // B llega durante la porción de A: debe correr antes que A vuelva
        let processes = vec![Process::new("A", 0, 4), Process::new("B", 1, 2)];
        let schedule = round_robin_schedule(&processes, 2).unwrap();

        assert_eq!(
            spans(&schedule),
            vec![
                ("A".to_string(), 0, 2),
                ("B".to_string(), 2, 4),
                ("A".to_string(), 4, 6),
            ]
        );
    }

    #[test]
    fn test_newcomer_at_slice_end_goes_first() {
        // B llega exactamente cuando A agota su quantum
        let processes = vec![Process::new("A", 0, 3), Process::new("B", 2, 1)];
        let schedule = round_robin_schedule(&processes, 2).unwrap();
        assert_eq!(schedule.completion_order, vec!["B", "A"]);
    }

    #[test]
    fn test_simultaneous_newcomers_keep_arrival_order() {
        let processes = vec![
            Process::new("A", 0, 3),
            Process::new("C", 2, 1),
            Process::new("B", 1, 1),
        ];
        let schedule = round_robin_schedule(&processes, 3).unwrap();
        assert_eq!(schedule.completion_order, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_tied_newcomers_follow_input_order() {
        // C y B llegan juntos durante la porción de A: C va primero por índice
        let processes = vec![
            Process::new("A", 0, 4),
            Process::new("C", 1, 1),
            Process::new("B", 1, 1),
        ];
        let schedule = round_robin_schedule(&processes, 3).unwrap();

        assert_eq!(
            spans(&schedule),
            vec![
                ("A".to_string(), 0, 3),
                ("C".to_string(), 3, 4),
                ("B".to_string(), 4, 5),
                ("A".to_string(), 5, 6),
            ]
        );
    }

    #[test]
    fn test_response_is_fixed_at_first_dispatch() {
        let processes = vec![Process::new("A", 0, 5), Process::new("B", 0, 5)];
        let schedule = round_robin_schedule(&processes, 1).unwrap();

        assert_eq!(schedule.processes[0].start_time, 0);
        assert_eq!(schedule.processes[1].start_time, 1);
        assert_eq!(schedule.processes[0].response_time, 0);
        assert_eq!(schedule.processes[1].response_time, 1);
    }

    #[test]
    fn test_idle_gap_before_late_arrival() {
        let processes = vec![Process::new("A", 3, 2), Process::new("B", 20, 1)];
        let schedule = round_robin_schedule(&processes, 4).unwrap();

        assert_eq!(
            spans(&schedule),
            vec![("A".to_string(), 3, 5), ("B".to_string(), 20, 21)]
        );
        assert_eq!(schedule.summary.avg_waiting, 0.0);
    }

    #[test]
    fn test_many_requeues_are_not_capped() {
        let processes = vec![Process::new("A", 0, 2_000), Process::new("B", 0, 2_000)];
        let schedule = round_robin_schedule(&processes, 1).unwrap();

        assert_eq!(schedule.timeline.len(), 4_000);
        assert_eq!(schedule.processes[0].completion_time, 3_999);
        assert_eq!(schedule.processes[1].completion_time, 4_000);
    }
}
