//! # Módulo de Algoritmos de Planificación
//!
//! Este módulo define los algoritmos de scheduling disponibles y despacha
//! cada uno a su simulador correspondiente.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};
use crate::fcfs::fcfs_schedule;
use crate::metrics::ScheduleMetrics;
use crate::process::Process;
use crate::round_robin::round_robin_schedule;
use crate::sjf::sjf_schedule;

/// Algoritmos de planificación disponibles.
///
/// Cada algoritmo define una estrategia diferente para asignar la CPU:
/// - FCFS atiende los procesos en orden de llegada
/// - SJF elige el trabajo más corto entre los que ya llegaron
/// - Round Robin reparte la CPU en porciones de tamaño fijo
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchedulingAlgorithm {
    /// First-Come First-Served: no preemptivo, en orden de llegada.
    ///
    /// Simple, pero un proceso largo al frente hace esperar a todos los demás
    /// (efecto convoy).
    Fcfs,

    /// Shortest-Job-First no preemptivo.
    ///
    /// Minimiza la espera promedio cuando las ráfagas se conocen de antemano,
    /// a costa de posible inanición de los procesos largos.
    Sjf,

    /// Round Robin: preemptivo con quantum fijo.
    ///
    /// Los procesos se atienden en rondas; cada uno recibe como máximo un
    /// quantum antes de volver al final de la cola.
    RoundRobin {
        /// Máximo de unidades de tiempo continuas por porción
        quantum: u64,
    },
}

impl SchedulingAlgorithm {
    /// Crea un nuevo algoritmo FCFS.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduling_simulator::SchedulingAlgorithm;
    ///
    /// let algorithm = SchedulingAlgorithm::fcfs();
    /// assert!(!algorithm.is_preemptive());
    /// ```
    pub fn fcfs() -> Self {
        Self::Fcfs
    }

    /// Crea un nuevo algoritmo SJF no preemptivo.
    pub fn sjf() -> Self {
        Self::Sjf
    }

    /// Crea un nuevo algoritmo Round Robin con el quantum especificado.
    ///
    /// El quantum se valida al simular: un quantum 0 produce
    /// [`SchedulerError::InvalidQuantum`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduling_simulator::SchedulingAlgorithm;
    ///
    /// let algorithm = SchedulingAlgorithm::round_robin(4);
    /// assert_eq!(algorithm.get_quantum(), Some(4));
    /// ```
    pub fn round_robin(quantum: u64) -> Self {
        Self::RoundRobin { quantum }
    }

    /// Ejecuta la simulación de este algoritmo sobre la lista de procesos.
    ///
    /// La lista de entrada no se modifica.
    ///
    /// # Errors
    ///
    /// Propaga los errores de validación de cada simulador.
    pub fn simulate(&self, processes: &[Process]) -> Result<ScheduleMetrics> {
        match self {
            Self::Fcfs => fcfs_schedule(processes),
            Self::Sjf => sjf_schedule(processes),
            Self::RoundRobin { quantum } => round_robin_schedule(processes, *quantum),
        }
    }

    /// Determina si el algoritmo es preemptivo.
    pub fn is_preemptive(&self) -> bool {
        match self {
            Self::Fcfs | Self::Sjf => false,
            Self::RoundRobin { .. } => true,
        }
    }

    /// Calcula cuánto se ejecuta un proceso en su próximo despacho.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduling_simulator::SchedulingAlgorithm;
    ///
    /// assert_eq!(SchedulingAlgorithm::sjf().calculate_slice(5), 5);
    /// assert_eq!(SchedulingAlgorithm::round_robin(3).calculate_slice(5), 3);
    /// assert_eq!(SchedulingAlgorithm::round_robin(8).calculate_slice(5), 5);
    /// ```
    pub fn calculate_slice(&self, remaining_time: u64) -> u64 {
        match self {
            Self::Fcfs | Self::Sjf => remaining_time,
            Self::RoundRobin { quantum } => remaining_time.min(*quantum),
        }
    }

    /// Obtiene el quantum configurado para Round Robin.
    pub fn get_quantum(&self) -> Option<u64> {
        match self {
            Self::Fcfs | Self::Sjf => None,
            Self::RoundRobin { quantum } => Some(*quantum),
        }
    }

    /// Obtiene una descripción textual del algoritmo.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduling_simulator::SchedulingAlgorithm;
    ///
    /// let fcfs = SchedulingAlgorithm::fcfs();
    /// assert_eq!(fcfs.description(), "First-Come First-Served (no preemptivo)");
    ///
    /// let rr = SchedulingAlgorithm::round_robin(2);
    /// assert!(rr.description().contains("Round Robin"));
    /// ```
    pub fn description(&self) -> String {
        match self {
            Self::Fcfs => "First-Come First-Served (no preemptivo)".to_string(),
            Self::Sjf => "Shortest-Job-First (no preemptivo)".to_string(),
            Self::RoundRobin { quantum } => {
                format!("Round Robin preemptivo (quantum: {} unidades)", quantum)
            }
        }
    }
}

impl fmt::Display for SchedulingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fcfs => write!(f, "FCFS"),
            Self::Sjf => write!(f, "SJF"),
            Self::RoundRobin { quantum } => write!(f, "RR (q={})", quantum),
        }
    }
}

/// Parsea `fcfs`, `sjf`, `rr` (quantum por defecto) o `rr:<quantum>`.
impl FromStr for SchedulingAlgorithm {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        let (name, quantum) = match lower.split_once(':') {
            Some((name, quantum)) => (name, Some(quantum)),
            None => (lower.as_str(), None),
        };

        match (name, quantum) {
            ("fcfs", None) => Ok(Self::Fcfs),
            ("sjf", None) => Ok(Self::Sjf),
            ("rr" | "round_robin", None) => Ok(Self::round_robin(crate::config::DEFAULT_QUANTUM)),
            ("rr" | "round_robin", Some(q)) => {
                let quantum: u64 = q
                    .parse()
                    .map_err(|_| SchedulerError::InvalidArgument(format!("quantum inválido: {}", q)))?;
                if quantum == 0 {
                    return Err(SchedulerError::InvalidQuantum(quantum));
                }
                Ok(Self::round_robin(quantum))
            }
            _ => Err(SchedulerError::InvalidArgument(format!(
                "algoritmo desconocido '{}'. Válidos: fcfs, sjf, rr, rr:<quantum>",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin_creation() {
        let algorithm = SchedulingAlgorithm::round_robin(5);

        match algorithm {
            SchedulingAlgorithm::RoundRobin { quantum } => assert_eq!(quantum, 5),
            _ => panic!("Expected RoundRobin variant"),
        }

        assert!(algorithm.is_preemptive());
        assert!(!SchedulingAlgorithm::sjf().is_preemptive());
    }

    #[test]
    fn test_slice_calculation() {
        let remaining = 8;

        assert_eq!(SchedulingAlgorithm::fcfs().calculate_slice(remaining), remaining);
        assert_eq!(SchedulingAlgorithm::round_robin(3).calculate_slice(remaining), 3);
        assert_eq!(SchedulingAlgorithm::round_robin(10).calculate_slice(remaining), remaining);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", SchedulingAlgorithm::fcfs()), "FCFS");
        assert_eq!(format!("{}", SchedulingAlgorithm::sjf()), "SJF");
        assert_eq!(format!("{}", SchedulingAlgorithm::round_robin(2)), "RR (q=2)");
    }

    #[test]
    fn test_parsing() {
        assert_eq!("fcfs".parse::<SchedulingAlgorithm>().unwrap(), SchedulingAlgorithm::Fcfs);
        assert_eq!("SJF".parse::<SchedulingAlgorithm>().unwrap(), SchedulingAlgorithm::Sjf);
        assert_eq!(
            "rr:4".parse::<SchedulingAlgorithm>().unwrap(),
            SchedulingAlgorithm::round_robin(4)
        );
        assert_eq!(
            "rr".parse::<SchedulingAlgorithm>().unwrap(),
            SchedulingAlgorithm::round_robin(crate::config::DEFAULT_QUANTUM)
        );
        assert!(matches!(
            "rr:0".parse::<SchedulingAlgorithm>(),
            Err(SchedulerError::InvalidQuantum(0))
        ));
        assert!("priority".parse::<SchedulingAlgorithm>().is_err());
        assert!("fcfs:2".parse::<SchedulingAlgorithm>().is_err());
    }

    #[test]
    fn test_serde_representation() {
        let json = serde_json::to_string(&SchedulingAlgorithm::round_robin(3)).unwrap();
        assert_eq!(json, r#"{"kind":"round_robin","quantum":3}"#);

        let back: SchedulingAlgorithm = serde_json::from_str(r#"{"kind":"sjf"}"#).unwrap();
        assert_eq!(back, SchedulingAlgorithm::Sjf);
    }

    #[test]
    fn test_simulate_dispatches() {
        let processes = vec![Process::new("A", 0, 5)];
        for algorithm in [
            SchedulingAlgorithm::fcfs(),
            SchedulingAlgorithm::sjf(),
            SchedulingAlgorithm::round_robin(2),
        ] {
            let schedule = algorithm.simulate(&processes).unwrap();
            assert_eq!(schedule.algorithm, algorithm);
        }
    }
}
