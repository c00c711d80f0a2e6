//! # Módulo de Procesos
//!
//! Este módulo define los procesos que recibe el simulador y la copia de
//! trabajo privada que cada algoritmo mantiene durante una ejecución.
//!
//! La lista de procesos del llamador nunca se modifica: cada simulador crea su
//! propio [`WorkingSet`] al entrar y lo descarta al retornar.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SchedulerError};
use crate::metrics::{ExecutionSlice, MetricsCalculator, ScheduleMetrics};
use crate::scheduler::SchedulingAlgorithm;

/// Proceso de entrada para la simulación.
///
/// Todos los tiempos se expresan en unidades enteras de tiempo simulado (ticks).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Process {
    /// Identificador opaco, usado solo para trazas y reportes
    pub id: String,
    /// Instante en que el proceso se vuelve elegible para ejecutarse
    pub arrival_time: u64,
    /// Tiempo total de CPU requerido (debe ser > 0)
    pub burst_time: u64,
}

impl Process {
    /// Crea un nuevo proceso.
    ///
    /// # Arguments
    ///
    /// * `id` - Identificador del proceso
    /// * `arrival_time` - Tiempo de llegada
    /// * `burst_time` - Tiempo de ráfaga
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduling_simulator::Process;
    ///
    /// let process = Process::new("A", 0, 5);
    /// assert_eq!(process.id, "A");
    /// assert_eq!(process.burst_time, 5);
    /// ```
    pub fn new(id: impl Into<String>, arrival_time: u64, burst_time: u64) -> Self {
        Self {
            id: id.into(),
            arrival_time,
            burst_time,
        }
    }
}

/// Verifica las precondiciones comunes a todos los algoritmos.
///
/// # Errors
///
/// - [`SchedulerError::EmptyProcessList`] si no hay procesos
/// - [`SchedulerError::InvalidBurstTime`] si algún proceso tiene ráfaga 0
/// - [`SchedulerError::TimeOverflow`] si la última llegada más la ráfaga total
///   no cabe en el reloj de 64 bits
pub fn validate_processes(processes: &[Process]) -> Result<()> {
    if processes.is_empty() {
        warn!("Lista de procesos vacía rechazada");
        return Err(SchedulerError::EmptyProcessList);
    }

    if let Some(process) = processes.iter().find(|p| p.burst_time == 0) {
        warn!(id = %process.id, "Proceso con ráfaga 0 rechazado");
        return Err(SchedulerError::InvalidBurstTime {
            id: process.id.clone(),
        });
    }

    // El reloj nunca supera la última llegada más el trabajo total
    let horizon = processes
        .iter()
        .try_fold(0u64, |total, p| total.checked_add(p.burst_time))
        .and_then(|total| {
            let last_arrival = processes.iter().map(|p| p.arrival_time).max().unwrap_or(0);
            last_arrival.checked_add(total)
        });
    if horizon.is_none() {
        warn!(count = processes.len(), "Carga de trabajo fuera del rango del reloj");
        return Err(SchedulerError::TimeOverflow);
    }

    Ok(())
}

/// Estado de planificación de un proceso durante una única ejecución.
#[derive(Debug, Clone)]
pub struct ProcessRecord {
    /// Copia del proceso de entrada
    pub process: Process,
    /// Momento del primer despacho; se registra una sola vez
    pub start_time: Option<u64>,
    /// Momento en que terminó la última porción de ejecución
    pub completion_time: Option<u64>,
    /// Ráfaga aún no servida
    pub remaining_time: u64,
}

impl ProcessRecord {
    fn new(process: &Process) -> Self {
        Self {
            process: process.clone(),
            start_time: None,
            completion_time: None,
            remaining_time: process.burst_time,
        }
    }

    /// Indica si el proceso ya terminó toda su ráfaga.
    pub fn is_completed(&self) -> bool {
        self.completion_time.is_some()
    }
}

/// Copia de trabajo privada de un simulador.
///
/// Agrupa los registros por proceso (en el orden de entrada), la línea de
/// tiempo de ejecución y el orden de finalización.
#[derive(Debug)]
pub(crate) struct WorkingSet {
    algorithm: SchedulingAlgorithm,
    pub records: Vec<ProcessRecord>,
    timeline: Vec<ExecutionSlice>,
    completion_order: Vec<usize>,
}

impl WorkingSet {
    /// Valida la entrada y crea la copia de trabajo para `algorithm`.
    pub fn prepare(processes: &[Process], algorithm: SchedulingAlgorithm) -> Result<Self> {
        validate_processes(processes)?;

        Ok(Self {
            algorithm,
            records: processes.iter().map(ProcessRecord::new).collect(),
            timeline: Vec::new(),
            completion_order: Vec::with_capacity(processes.len()),
        })
    }

    /// Índices de los procesos ordenados por llegada; empates por índice original.
    pub fn arrival_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.records.len()).collect();
        // sort_by_key es estable: los empates conservan el orden de entrada
        order.sort_by_key(|&idx| self.records[idx].process.arrival_time);
        order
    }

    pub fn arrival_time(&self, idx: usize) -> u64 {
        self.records[idx].process.arrival_time
    }

    pub fn remaining_time(&self, idx: usize) -> u64 {
        self.records[idx].remaining_time
    }

    /// Despacha el proceso `idx` en `now` por la porción que fija el algoritmo.
    ///
    /// Registra el primer despacho, la porción en la línea de tiempo y, si la
    /// ráfaga se agota, la finalización. Retorna el nuevo valor del reloj.
    pub fn execute(&mut self, idx: usize, now: u64) -> u64 {
        let record = &mut self.records[idx];
        let slice = self.algorithm.calculate_slice(record.remaining_time);
        // validate_processes acota el reloj a u64
        let end = now + slice;

        if record.start_time.is_none() {
            record.start_time = Some(now);
        }
        record.remaining_time -= slice;

        debug!(
            id = %record.process.id,
            start = now,
            end,
            remaining = record.remaining_time,
            "Porción de ejecución"
        );

        self.timeline.push(ExecutionSlice {
            id: record.process.id.clone(),
            start: now,
            end,
        });

        if record.remaining_time == 0 {
            record.completion_time = Some(end);
            self.completion_order.push(idx);
        }

        end
    }

    pub fn completed_count(&self) -> usize {
        self.completion_order.len()
    }

    /// Consume la copia de trabajo y calcula las métricas finales.
    pub fn finish(self) -> Result<ScheduleMetrics> {
        MetricsCalculator::new().calculate_schedule_metrics(
            self.algorithm,
            &self.records,
            self.timeline,
            &self.completion_order,
        )
    }
}
