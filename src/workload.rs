//! # Módulo de Cargas de Trabajo
//!
//! Obtención de listas de procesos: desde archivos JSON o generadas
//! aleatoriamente con una semilla reproducible.

use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Result, SchedulerError};
use crate::process::{validate_processes, Process};

/// Carga de trabajo lista para simular.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    pub processes: Vec<Process>,
    /// Quantum sugerido por el archivo, si lo declara
    pub quantum: Option<u64>,
}

/// Formatos aceptados: un arreglo de procesos o un objeto con quantum opcional.
#[derive(Deserialize)]
#[serde(untagged)]
enum WorkloadFile {
    List(Vec<Process>),
    Document {
        #[serde(default)]
        quantum: Option<u64>,
        processes: Vec<Process>,
    },
}

/// Parsea una carga de trabajo en JSON y la valida.
///
/// # Examples
///
/// ```rust
/// use cpu_scheduling_simulator::workload::parse_processes;
///
/// let json = r#"{"quantum": 3, "processes": [{"id": "A", "arrival_time": 0, "burst_time": 4}]}"#;
/// let workload = parse_processes(json).unwrap();
/// assert_eq!(workload.quantum, Some(3));
/// assert_eq!(workload.processes.len(), 1);
/// ```
///
/// # Errors
///
/// - [`SchedulerError::Parse`] si el JSON no tiene el formato esperado
///   (incluidos tiempos negativos)
/// - Los errores de validación de la lista de procesos
/// - [`SchedulerError::InvalidQuantum`] si el quantum declarado es 0
pub fn parse_processes(json: &str) -> Result<Workload> {
    let workload = match serde_json::from_str::<WorkloadFile>(json)? {
        WorkloadFile::List(processes) => Workload {
            processes,
            quantum: None,
        },
        WorkloadFile::Document { quantum, processes } => Workload { processes, quantum },
    };

    validate_processes(&workload.processes)?;
    if workload.quantum == Some(0) {
        return Err(SchedulerError::InvalidQuantum(0));
    }

    Ok(workload)
}

/// Lee y parsea una carga de trabajo desde un archivo JSON.
pub fn load_processes(path: impl AsRef<Path>) -> Result<Workload> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let workload = parse_processes(&contents)?;

    info!(
        path = %path.display(),
        processes = workload.processes.len(),
        "Carga de trabajo leída"
    );

    Ok(workload)
}

/// Genera procesos con llegadas Bernoulli.
///
/// Recorre el tiempo desde 0; en cada tick llega un proceso con probabilidad
/// `p_arrival`, y es corto (`short_burst`) con probabilidad `p_short` o largo
/// (`long_burst`) en caso contrario. Se detiene al generar `count` procesos.
///
/// # Examples
///
/// ```rust
/// use cpu_scheduling_simulator::workload::bernoulli_processes;
///
/// let a = bernoulli_processes(10, 0.5, 0.3, 2, 6, 42).unwrap();
/// let b = bernoulli_processes(10, 0.5, 0.3, 2, 6, 42).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 10);
/// ```
///
/// # Errors
///
/// [`SchedulerError::InvalidArgument`] si `count` es 0, alguna ráfaga es 0,
/// `p_arrival` no está en (0, 1] o `p_short` no está en [0, 1].
pub fn bernoulli_processes(
    count: usize,
    p_arrival: f64,
    p_short: f64,
    short_burst: u64,
    long_burst: u64,
    seed: u64,
) -> Result<Vec<Process>> {
    if count == 0 {
        return Err(SchedulerError::InvalidArgument(
            "se requiere al menos un proceso".to_string(),
        ));
    }
    if !(p_arrival > 0.0 && p_arrival <= 1.0) {
        return Err(SchedulerError::InvalidArgument(format!(
            "probabilidad de llegada fuera de (0, 1]: {}",
            p_arrival
        )));
    }
    if !(0.0..=1.0).contains(&p_short) {
        return Err(SchedulerError::InvalidArgument(format!(
            "probabilidad de proceso corto fuera de [0, 1]: {}",
            p_short
        )));
    }
    if short_burst == 0 || long_burst == 0 {
        return Err(SchedulerError::InvalidArgument(
            "las ráfagas deben ser > 0".to_string(),
        ));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut processes = Vec::with_capacity(count);
    let mut tick = 0;

    while processes.len() < count {
        if rng.gen_bool(p_arrival) {
            let burst_time = if rng.gen_bool(p_short) {
                short_burst
            } else {
                long_burst
            };
            processes.push(Process::new(
                format!("P{}", processes.len() + 1),
                tick,
                burst_time,
            ));
        }
        tick += 1;
    }

    debug!(count, seed, last_arrival = tick - 1, "Carga aleatoria generada");
    Ok(processes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_list() {
        let json = r#"[
            {"id": "A", "arrival_time": 0, "burst_time": 5},
            {"id": "B", "arrival_time": 1, "burst_time": 3}
        ]"#;
        let workload = parse_processes(json).unwrap();

        assert_eq!(workload.quantum, None);
        assert_eq!(workload.processes[1], Process::new("B", 1, 3));
    }

    #[test]
    fn test_negative_arrival_is_parse_error() {
        let json = r#"[{"id": "A", "arrival_time": -1, "burst_time": 5}]"#;
        assert!(matches!(parse_processes(json), Err(SchedulerError::Parse(_))));
    }

    #[test]
    fn test_zero_burst_is_rejected() {
        let json = r#"[{"id": "A", "arrival_time": 0, "burst_time": 0}]"#;
        assert!(matches!(
            parse_processes(json),
            Err(SchedulerError::InvalidBurstTime { .. })
        ));
    }

    #[test]
    fn test_empty_list_and_zero_quantum_are_rejected() {
        assert!(matches!(parse_processes("[]"), Err(SchedulerError::EmptyProcessList)));

        let json = r#"{"quantum": 0, "processes": [{"id": "A", "arrival_time": 0, "burst_time": 1}]}"#;
        assert!(matches!(parse_processes(json), Err(SchedulerError::InvalidQuantum(0))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_processes("/nonexistent/workload.json");
        assert!(matches!(result, Err(SchedulerError::Io(_))));
    }

    #[test]
    fn test_bernoulli_arrivals_are_sorted_and_valid() {
        let processes = bernoulli_processes(50, 0.3, 0.5, 2, 6, 7).unwrap();

        assert_eq!(processes.len(), 50);
        assert!(processes.windows(2).all(|w| w[0].arrival_time < w[1].arrival_time));
        assert!(processes.iter().all(|p| p.burst_time == 2 || p.burst_time == 6));
        assert_eq!(processes[0].id, "P1");
    }

    #[test]
    fn test_bernoulli_certain_arrival_fills_every_tick() {
        let processes = bernoulli_processes(4, 1.0, 1.0, 3, 9, 0).unwrap();
        let arrivals: Vec<u64> = processes.iter().map(|p| p.arrival_time).collect();

        assert_eq!(arrivals, vec![0, 1, 2, 3]);
        assert!(processes.iter().all(|p| p.burst_time == 3));
    }

    #[test]
    fn test_bernoulli_rejects_bad_parameters() {
        assert!(bernoulli_processes(0, 0.5, 0.5, 1, 2, 0).is_err());
        assert!(bernoulli_processes(5, 0.0, 0.5, 1, 2, 0).is_err());
        assert!(bernoulli_processes(5, 0.5, 1.5, 1, 2, 0).is_err());
        assert!(bernoulli_processes(5, 0.5, 0.5, 0, 2, 0).is_err());
    }
}
