//! # First-Come First-Served
//!
//! Planificación no preemptiva en orden de llegada. Los empates de llegada
//! conservan el orden de la lista de entrada.

use tracing::debug;

use crate::error::Result;
use crate::metrics::{MetricsSummary, ScheduleMetrics};
use crate::process::{Process, WorkingSet};
use crate::scheduler::SchedulingAlgorithm;

/// Simula FCFS y retorna la planificación completa.
///
/// # Errors
///
/// Retorna error si la lista está vacía o algún proceso tiene ráfaga 0.
pub fn fcfs_schedule(processes: &[Process]) -> Result<ScheduleMetrics> {
    let mut working = WorkingSet::prepare(processes, SchedulingAlgorithm::Fcfs)?;
    let mut clock = 0;

    for idx in working.arrival_order() {
        let arrival = working.arrival_time(idx);
        if clock < arrival {
            debug!(from = clock, to = arrival, "CPU ociosa");
            clock = arrival;
        }

        clock = working.execute(idx, clock);
    }

    working.finish()
}

/// Promedios de turnaround, espera y respuesta bajo FCFS.
///
/// # Examples
///
/// ```rust
/// use cpu_scheduling_simulator::{fcfs_metrics, Process};
///
/// let summary = fcfs_metrics(&[Process::new("A", 0, 5)]).unwrap();
/// assert_eq!(summary.avg_turnaround, 5.0);
/// assert_eq!(summary.avg_waiting, 0.0);
/// ```
pub fn fcfs_metrics(processes: &[Process]) -> Result<MetricsSummary> {
    fcfs_schedule(processes).map(|schedule| schedule.summary)
}
