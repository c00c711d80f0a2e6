//! # Módulo de Errores
//!
//! Errores que puede producir el simulador. Todas las validaciones de entrada
//! se realizan antes de simular, de modo que nunca se retornan resultados parciales.

use thiserror::Error;

/// Errores del simulador de planificación.
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// La lista de procesos no contiene ningún elemento.
    #[error("La lista de procesos está vacía")]
    EmptyProcessList,

    /// Un proceso declara un tiempo de ráfaga igual a cero.
    #[error("Proceso '{id}': el tiempo de ráfaga debe ser > 0")]
    InvalidBurstTime { id: String },

    /// Quantum de Round Robin no positivo.
    #[error("Quantum inválido: {0} (debe ser > 0)")]
    InvalidQuantum(u64),

    /// La última llegada más la ráfaga total excede el reloj de 64 bits.
    #[error("La carga de trabajo excede el rango del reloj simulado")]
    TimeOverflow,

    /// Una métrica calculada quedó negativa: indica un defecto de planificación.
    #[error("Invariante violado en proceso '{id}': {detail}")]
    InvariantViolation { id: String, detail: String },

    /// Argumento de línea de comandos inválido.
    #[error("Argumento inválido: {0}")]
    InvalidArgument(String),

    #[error("Error de E/S: {0}")]
    Io(#[from] std::io::Error),

    #[error("Formato de procesos inválido: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Resultado con el error del simulador.
pub type Result<T> = std::result::Result<T, SchedulerError>;
