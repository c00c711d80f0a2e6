//! # Simulador de Planificación de CPU
//!
//! Esta biblioteca implementa un simulador didáctico de planificación de CPU:
//! dado un conjunto fijo de procesos (llegada, ráfaga), calcula el turnaround,
//! la espera y la respuesta promedio bajo tres políticas clásicas.
//!
//! ## Características principales
//!
//! - **Reloj virtual discreto**: todo el tiempo simulado es entero.
//! - **Algoritmos de scheduling**: FCFS, SJF no preemptivo y Round Robin con
//!   quantum configurable.
//! - **Sin estado compartido**: cada simulación trabaja sobre una copia privada
//!   de los procesos y puede invocarse concurrentemente.
//! - **Métricas detalladas**: por proceso, promedios, línea de tiempo,
//!   utilización de CPU y throughput.
//!
//! ## Estructura del proyecto
//!
//! - `process`: Procesos de entrada y copia de trabajo de cada simulación
//! - `fcfs`, `sjf`, `round_robin`: Los tres simuladores
//! - `scheduler`: Enumeración de algoritmos y despacho a cada simulador
//! - `metrics`: Cálculo de métricas y reportes
//! - `simulation`: Comparación de varios algoritmos sobre la misma carga
//! - `workload`: Carga de procesos desde JSON y generación aleatoria
//! - `error`: Errores del simulador

pub mod error;
pub mod fcfs;
pub mod metrics;
pub mod process;
pub mod round_robin;
pub mod scheduler;
pub mod simulation;
pub mod sjf;
pub mod workload;

// Re-exportar las estructuras principales para facilitar su uso
pub use error::{Result, SchedulerError};
pub use fcfs::{fcfs_metrics, fcfs_schedule};
pub use metrics::{ExecutionSlice, MetricsCalculator, MetricsSummary, ProcessMetrics, ScheduleMetrics};
pub use process::{validate_processes, Process, ProcessRecord};
pub use round_robin::{round_robin_metrics, round_robin_schedule};
pub use scheduler::SchedulingAlgorithm;
pub use simulation::Simulation;
pub use sjf::{sjf_metrics, sjf_schedule};

/// Configuración por defecto del simulador
pub mod config {
    use super::{Process, SchedulingAlgorithm};

    /// Quantum por defecto para Round Robin (en unidades de tiempo)
    pub const DEFAULT_QUANTUM: u64 = 2;

    /// Probabilidad de que llegue un proceso en cada tick de la carga aleatoria (`--random`)
    pub const RANDOM_P_ARRIVAL: f64 = 0.3;
    /// Probabilidad de que un proceso aleatorio tenga ráfaga corta
    pub const RANDOM_P_SHORT: f64 = 0.3;
    /// Ráfaga de los procesos aleatorios cortos
    pub const RANDOM_SHORT_BURST: u64 = 2;
    /// Ráfaga de los procesos aleatorios largos
    pub const RANDOM_LONG_BURST: u64 = 6;

    /// Carga de trabajo de demostración.
    pub fn default_processes() -> Vec<Process> {
        vec![
            Process::new("A", 0, 5),
            Process::new("B", 1, 3),
            Process::new("C", 2, 8),
        ]
    }

    /// Algoritmos comparados por defecto.
    pub fn default_algorithms(quantum: u64) -> Vec<SchedulingAlgorithm> {
        vec![
            SchedulingAlgorithm::fcfs(),
            SchedulingAlgorithm::sjf(),
            SchedulingAlgorithm::round_robin(quantum),
        ]
    }
}
