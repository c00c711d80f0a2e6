//! # Módulo de Métricas y Reportes
//!
//! Este módulo calcula las métricas por proceso y agregadas de una
//! planificación, verifica sus invariantes y genera reportes en texto y CSV.

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::{Result, SchedulerError};
use crate::process::ProcessRecord;
use crate::scheduler::SchedulingAlgorithm;

/// Promedios de una planificación sobre los n procesos.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    /// Turnaround promedio (finalización - llegada)
    pub avg_turnaround: f64,
    /// Espera promedio (turnaround - ráfaga)
    pub avg_waiting: f64,
    /// Respuesta promedio (primer despacho - llegada)
    pub avg_response: f64,
}

/// Métricas individuales de un proceso.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessMetrics {
    pub id: String,
    pub arrival_time: u64,
    pub burst_time: u64,
    pub start_time: u64,
    pub completion_time: u64,
    pub turnaround_time: u64,
    pub waiting_time: u64,
    pub response_time: u64,
}

/// Porción contigua de ejecución de un proceso en la CPU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSlice {
    pub id: String,
    pub start: u64,
    pub end: u64,
}

impl ExecutionSlice {
    /// Unidades de tiempo que abarca la porción.
    pub fn duration(&self) -> u64 {
        self.end - self.start
    }
}

/// Resultado completo de simular un algoritmo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMetrics {
    /// Algoritmo que produjo la planificación
    pub algorithm: SchedulingAlgorithm,
    /// Métricas por proceso, en el orden de la lista de entrada
    pub processes: Vec<ProcessMetrics>,
    /// Promedios
    pub summary: MetricsSummary,
    /// IDs en orden de finalización
    pub completion_order: Vec<String>,
    /// Porciones de ejecución en orden cronológico
    pub timeline: Vec<ExecutionSlice>,
    /// Instante en que terminó el último proceso
    pub makespan: u64,
    /// Unidades de tiempo con la CPU ocupada
    pub busy_time: u64,
    /// Fracción ocupada entre la primera llegada y el makespan
    pub cpu_utilization: f64,
    /// Procesos completados por unidad de tiempo en esa misma ventana
    pub throughput: f64,
}

/// Calculadora de métricas para la simulación.
///
/// Proporciona métodos para calcular métricas individuales y agregadas,
/// así como para generar reportes formateados de los resultados.
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Crea una nueva instancia del calculador de métricas.
    pub fn new() -> Self {
        Self
    }

    /// Calcula las métricas de un proceso ya completado.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::InvariantViolation`] si el proceso nunca fue
    /// despachado o completado, o si alguna métrica resulta negativa.
    pub fn calculate_process_metrics(&self, record: &ProcessRecord) -> Result<ProcessMetrics> {
        let process = &record.process;

        let (start_time, completion_time) = match (record.start_time, record.completion_time) {
            (Some(start), Some(completion)) => (start, completion),
            _ => {
                return Err(Self::violation(
                    &process.id,
                    "el proceso no fue completado".to_string(),
                ))
            }
        };

        let turnaround_time =
            Self::non_negative(&process.id, "turnaround", completion_time, process.arrival_time)?;
        let waiting_time =
            Self::non_negative(&process.id, "espera", turnaround_time, process.burst_time)?;
        let response_time =
            Self::non_negative(&process.id, "respuesta", start_time, process.arrival_time)?;

        Ok(ProcessMetrics {
            id: process.id.clone(),
            arrival_time: process.arrival_time,
            burst_time: process.burst_time,
            start_time,
            completion_time,
            turnaround_time,
            waiting_time,
            response_time,
        })
    }

    /// Calcula las métricas agregadas de una planificación.
    ///
    /// # Arguments
    ///
    /// * `algorithm` - Algoritmo simulado
    /// * `records` - Registros de trabajo, en el orden de entrada
    /// * `timeline` - Porciones de ejecución en orden cronológico
    /// * `completion_order` - Índices de `records` en orden de finalización
    ///
    /// # Errors
    ///
    /// Retorna el primer invariante violado; nunca promedia métricas inválidas.
    pub fn calculate_schedule_metrics(
        &self,
        algorithm: SchedulingAlgorithm,
        records: &[ProcessRecord],
        timeline: Vec<ExecutionSlice>,
        completion_order: &[usize],
    ) -> Result<ScheduleMetrics> {
        if records.is_empty() {
            return Err(SchedulerError::EmptyProcessList);
        }

        let processes = records
            .iter()
            .map(|record| self.calculate_process_metrics(record))
            .collect::<Result<Vec<_>>>()?;

        let count = processes.len() as f64;
        let total_turnaround: u128 = processes.iter().map(|p| p.turnaround_time as u128).sum();
        let total_waiting: u128 = processes.iter().map(|p| p.waiting_time as u128).sum();
        let total_response: u128 = processes.iter().map(|p| p.response_time as u128).sum();

        let summary = MetricsSummary {
            avg_turnaround: total_turnaround as f64 / count,
            avg_waiting: total_waiting as f64 / count,
            avg_response: total_response as f64 / count,
        };

        let makespan = processes.iter().map(|p| p.completion_time).max().unwrap_or(0);
        let first_arrival = processes.iter().map(|p| p.arrival_time).min().unwrap_or(0);
        let busy_time: u64 = timeline.iter().map(ExecutionSlice::duration).sum();
        let total_burst: u64 = processes.iter().map(|p| p.burst_time).sum();

        if busy_time != total_burst {
            return Err(Self::violation(
                "*",
                format!("tiempo ocupado {} distinto de la ráfaga total {}", busy_time, total_burst),
            ));
        }

        // Ráfagas > 0 garantizan una ventana no vacía
        let window = makespan.saturating_sub(first_arrival).max(1) as f64;

        Ok(ScheduleMetrics {
            algorithm,
            completion_order: completion_order
                .iter()
                .map(|&idx| records[idx].process.id.clone())
                .collect(),
            processes,
            summary,
            timeline,
            makespan,
            busy_time,
            cpu_utilization: busy_time as f64 / window,
            throughput: count / window,
        })
    }

    /// Genera un reporte detallado de una planificación.
    pub fn generate_report(&self, metrics: &ScheduleMetrics) -> String {
        let mut report = String::new();

        report.push_str(&format!(
            "\n=== {} ===\n\n",
            metrics.algorithm.description()
        ));

        report.push_str(&format!(
            "{:<8} {:>8} {:>8} {:>8} {:>8} {:>11} {:>8} {:>10}\n",
            "ID", "Llegada", "Ráfaga", "Inicio", "Fin", "Turnaround", "Espera", "Respuesta"
        ));
        report.push_str(&format!("{}\n", "-".repeat(78)));

        for p in &metrics.processes {
            report.push_str(&format!(
                "{:<8} {:>8} {:>8} {:>8} {:>8} {:>11} {:>8} {:>10}\n",
                p.id,
                p.arrival_time,
                p.burst_time,
                p.start_time,
                p.completion_time,
                p.turnaround_time,
                p.waiting_time,
                p.response_time
            ));
        }

        report.push_str(&format!("{}\n", "-".repeat(78)));
        report.push_str(&format!(
            "{:<8} {:>8} {:>8} {:>8} {:>8} {:>11.2} {:>8.2} {:>10.2}\n",
            "PROM",
            "",
            "",
            "",
            "",
            metrics.summary.avg_turnaround,
            metrics.summary.avg_waiting,
            metrics.summary.avg_response
        ));

        report.push_str("\n=== ESTADÍSTICAS RESUMIDAS ===\n");
        report.push_str(&format!(
            "Línea de tiempo: {}\n",
            Self::format_timeline(&metrics.timeline)
        ));
        report.push_str(&format!(
            "Orden de finalización: {:?}\n",
            metrics.completion_order
        ));
        report.push_str(&format!("Makespan: {}\n", metrics.makespan));
        report.push_str(&format!(
            "Utilización de CPU: {:.1}%\n",
            metrics.cpu_utilization * 100.0
        ));
        report.push_str(&format!(
            "Throughput: {:.3} procesos/unidad\n",
            metrics.throughput
        ));

        report
    }

    /// Genera un reporte por proceso en formato CSV.
    pub fn generate_csv_report(&self, metrics: &ScheduleMetrics) -> String {
        let mut csv = String::new();

        csv.push_str("ProcessID,ArrivalTime,BurstTime,StartTime,CompletionTime,Turnaround,Waiting,Response\n");

        for p in &metrics.processes {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{}\n",
                p.id,
                p.arrival_time,
                p.burst_time,
                p.start_time,
                p.completion_time,
                p.turnaround_time,
                p.waiting_time,
                p.response_time
            ));
        }

        csv
    }

    /// Genera una tabla comparativa entre varias planificaciones.
    pub fn generate_comparison(&self, schedules: &[ScheduleMetrics]) -> String {
        let mut table = String::new();

        table.push_str("\n=== COMPARACIÓN DE ALGORITMOS ===\n");
        table.push_str(&format!(
            "| {:<10} | {:>11} | {:>8} | {:>10} | {:>11} |\n",
            "Algoritmo", "Turnaround", "Espera", "Respuesta", "Utilización"
        ));
        table.push_str(&format!(
            "|{}|{}|{}|{}|{}|\n",
            "-".repeat(12),
            "-".repeat(13),
            "-".repeat(10),
            "-".repeat(12),
            "-".repeat(13)
        ));

        for schedule in schedules {
            table.push_str(&format!(
                "| {:<10} | {:>11.2} | {:>8.2} | {:>10.2} | {:>10.1}% |\n",
                schedule.algorithm.to_string(),
                schedule.summary.avg_turnaround,
                schedule.summary.avg_waiting,
                schedule.summary.avg_response,
                schedule.cpu_utilization * 100.0
            ));
        }

        table
    }

    /// Formatea la línea de tiempo como `A[0-2] B[2-4] ...`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cpu_scheduling_simulator::{ExecutionSlice, MetricsCalculator};
    ///
    /// let timeline = vec![
    ///     ExecutionSlice { id: "A".into(), start: 0, end: 2 },
    ///     ExecutionSlice { id: "B".into(), start: 2, end: 3 },
    /// ];
    /// assert_eq!(MetricsCalculator::format_timeline(&timeline), "A[0-2] B[2-3]");
    /// ```
    pub fn format_timeline(timeline: &[ExecutionSlice]) -> String {
        timeline
            .iter()
            .map(|slice| format!("{}[{}-{}]", slice.id, slice.start, slice.end))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn non_negative(id: &str, metric: &str, minuend: u64, subtrahend: u64) -> Result<u64> {
        minuend.checked_sub(subtrahend).ok_or_else(|| {
            Self::violation(
                id,
                format!("{} = {}", metric, minuend as i128 - subtrahend as i128),
            )
        })
    }

    fn violation(id: &str, detail: String) -> SchedulerError {
        error!(%id, %detail, "Invariante de planificación violado");
        SchedulerError::InvariantViolation {
            id: id.to_string(),
            detail,
        }
    }
}

impl Default for MetricsCalculator {
    fn default() -> Self {
        Self::new()
    }
}
