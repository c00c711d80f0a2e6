//! Ejemplo: comparación de FCFS, SJF y Round Robin sobre una carga aleatoria

use cpu_scheduling_simulator::{config, workload, MetricsCalculator, SchedulingAlgorithm, Simulation};

fn main() {
    println!("=== Ejemplo: Comparación de Algoritmos ===\n");

    // Carga reproducible: 12 procesos, 40% cortos
    let processes = workload::bernoulli_processes(12, 0.4, 0.4, 2, 8, 2025)
        .expect("parámetros de generación válidos");

    println!("Procesos generados:");
    for p in &processes {
        println!("  {:<4} llegada={:>3} ráfaga={:>2}", p.id, p.arrival_time, p.burst_time);
    }

    // Round Robin con varios quantums junto a FCFS y SJF
    let mut algorithms = vec![SchedulingAlgorithm::fcfs(), SchedulingAlgorithm::sjf()];
    algorithms.extend([1, config::DEFAULT_QUANTUM, 4, 8].map(SchedulingAlgorithm::round_robin));

    let simulation = Simulation::with_algorithms(processes, algorithms);
    let schedules = simulation.run().expect("la carga generada es válida");

    let calculator = MetricsCalculator::new();
    println!("{}", calculator.generate_comparison(&schedules));

    // Detalle del mejor algoritmo por espera promedio
    if let Some(best) = schedules
        .iter()
        .min_by(|a, b| a.summary.avg_waiting.total_cmp(&b.summary.avg_waiting))
    {
        println!("Menor espera promedio: {}", best.algorithm.description());
        println!("{}", calculator.generate_report(best));
    }
}
