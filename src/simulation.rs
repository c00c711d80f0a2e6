//! # Módulo de Simulación Principal
//!
//! Este módulo ejecuta una misma carga de trabajo bajo varios algoritmos y
//! reúne los resultados para compararlos.

use tracing::{info, info_span};

use crate::config;
use crate::error::Result;
use crate::metrics::{MetricsCalculator, ScheduleMetrics};
use crate::process::{validate_processes, Process};
use crate::scheduler::SchedulingAlgorithm;

/// Orquestador de la comparación entre algoritmos.
///
/// La `Simulation` conserva la carga de trabajo y la lista de algoritmos;
/// cada corrida es independiente y no modifica los procesos.
pub struct Simulation {
    /// Procesos a planificar
    processes: Vec<Process>,
    /// Algoritmos a comparar, en el orden del reporte
    algorithms: Vec<SchedulingAlgorithm>,
    /// Calculadora de métricas para generar reportes
    metrics_calculator: MetricsCalculator,
}

impl Simulation {
    /// Crea una simulación que compara FCFS, SJF y Round Robin con el
    /// quantum por defecto.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduling_simulator::{config, Simulation};
    ///
    /// let simulation = Simulation::new(config::default_processes());
    /// let schedules = simulation.run().unwrap();
    /// assert_eq!(schedules.len(), 3);
    /// ```
    pub fn new(processes: Vec<Process>) -> Self {
        Self::with_algorithms(processes, config::default_algorithms(config::DEFAULT_QUANTUM))
    }

    /// Crea una simulación con una lista de algoritmos personalizada.
    ///
    /// # Arguments
    ///
    /// * `processes` - Carga de trabajo
    /// * `algorithms` - Algoritmos a comparar
    pub fn with_algorithms(processes: Vec<Process>, algorithms: Vec<SchedulingAlgorithm>) -> Self {
        Self {
            processes,
            algorithms,
            metrics_calculator: MetricsCalculator::new(),
        }
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn algorithms(&self) -> &[SchedulingAlgorithm] {
        &self.algorithms
    }

    /// Ejecuta cada algoritmo sobre la carga de trabajo.
    ///
    /// # Errors
    ///
    /// La carga se valida una sola vez antes de simular; el primer error de
    /// cualquier algoritmo aborta la comparación.
    pub fn run(&self) -> Result<Vec<ScheduleMetrics>> {
        validate_processes(&self.processes)?;

        info!(
            processes = self.processes.len(),
            algorithms = self.algorithms.len(),
            "Iniciando simulación"
        );

        self.algorithms
            .iter()
            .map(|algorithm| -> Result<ScheduleMetrics> {
                let _span = info_span!(
                    "algorithm",
                    name = %algorithm,
                    preemptive = algorithm.is_preemptive(),
                    quantum = algorithm.get_quantum()
                )
                .entered();
                let schedule = algorithm.simulate(&self.processes)?;

                info!(
                    avg_turnaround = schedule.summary.avg_turnaround,
                    avg_waiting = schedule.summary.avg_waiting,
                    avg_response = schedule.summary.avg_response,
                    makespan = schedule.makespan,
                    "Simulación completada"
                );

                Ok(schedule)
            })
            .collect()
    }

    /// Genera el reporte detallado de cada planificación y la tabla comparativa.
    pub fn generate_report(&self, schedules: &[ScheduleMetrics]) -> String {
        let mut report = String::new();

        for schedule in schedules {
            report.push_str(&self.metrics_calculator.generate_report(schedule));
        }

        if schedules.len() > 1 {
            report.push_str(&self.metrics_calculator.generate_comparison(schedules));
        }

        report
    }

    /// Genera el CSV de cada planificación, precedido por el nombre del algoritmo.
    pub fn generate_csv_report(&self, schedules: &[ScheduleMetrics]) -> String {
        schedules
            .iter()
            .map(|schedule| {
                format!(
                    "# {}\n{}",
                    schedule.algorithm,
                    self.metrics_calculator.generate_csv_report(schedule)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchedulerError;

    #[test]
    fn test_runs_every_algorithm_in_order() {
        let simulation = Simulation::new(config::default_processes());
        let schedules = simulation.run().unwrap();

        let algorithms: Vec<SchedulingAlgorithm> = schedules.iter().map(|s| s.algorithm).collect();
        assert_eq!(algorithms, simulation.algorithms());
    }

    #[test]
    fn test_empty_workload_is_rejected() {
        let simulation = Simulation::new(Vec::new());
        assert!(matches!(simulation.run(), Err(SchedulerError::EmptyProcessList)));
    }

    #[test]
    fn test_invalid_quantum_aborts_comparison() {
        let simulation = Simulation::with_algorithms(
            config::default_processes(),
            vec![SchedulingAlgorithm::fcfs(), SchedulingAlgorithm::round_robin(0)],
        );
        assert!(matches!(simulation.run(), Err(SchedulerError::InvalidQuantum(0))));
    }

    #[test]
    fn test_report_includes_comparison() {
        let simulation = Simulation::new(config::default_processes());
        let schedules = simulation.run().unwrap();

        let report = simulation.generate_report(&schedules);
        assert!(report.contains("COMPARACIÓN DE ALGORITMOS"));
        assert!(report.contains("Shortest-Job-First"));

        let csv = simulation.generate_csv_report(&schedules);
        assert!(csv.contains("# RR (q=2)"));
    }
}
