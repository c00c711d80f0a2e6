use std::env;
use std::process;

use cpu_scheduling_simulator::workload::{self, Workload};
use cpu_scheduling_simulator::{config, Result, SchedulerError, SchedulingAlgorithm, Simulation};
use tracing::{error, info};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Opciones de línea de comandos.
#[derive(Debug, Default)]
struct CliOptions {
    file: Option<String>,       // archivo JSON con la carga de trabajo
    quantum: Option<u64>,       // quantum de Round Robin (sobrescribe el del archivo)
    algorithm: Option<String>,  // fcfs | sjf | rr | rr:<q> | all
    random: Option<usize>,      // cantidad de procesos aleatorios
    seed: u64,                  // semilla de la carga aleatoria
    csv: bool,
    json: bool,
    help: bool,
}

/// Inicializa el logging estructurado.
///
/// Variables de entorno:
/// - RUST_LOG: nivel de log (por defecto: info)
/// - SCHED_TRACE_JSON: salida JSON (por defecto: false)
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = env::var("SCHED_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    // Los logs van a stderr para no mezclarse con reportes CSV/JSON en stdout
    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .init();
    }
}

fn usage(bin: &str) -> String {
    format!(
        "Uso:\n  {bin} [--file <procesos.json>] [--random <n> [--seed <s>]] \
         [--algorithm <fcfs|sjf|rr|rr:q|all>] [--quantum <q>] [--csv | --json]\n\
         Sin --file ni --random se usa la carga de demostración.\n\
         Ejemplos:\n  {bin} --file procesos.json --quantum 4\n  {bin} --random 20 --seed 7 --algorithm sjf"
    )
}

/// Obtiene el valor que sigue a una bandera.
fn next_value<'a>(args: &'a [String], idx: &mut usize, flag: &str) -> Result<&'a str> {
    *idx += 1;
    args.get(*idx)
        .map(String::as_str)
        .ok_or_else(|| SchedulerError::InvalidArgument(format!("falta el valor de {}", flag)))
}

fn parse_number<T: std::str::FromStr>(value: &str, flag: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| SchedulerError::InvalidArgument(format!("valor inválido para {}: {}", flag, value)))
}

fn parse_args(args: &[String]) -> Result<CliOptions> {
    let mut options = CliOptions::default();
    let mut idx = 0;

    while idx < args.len() {
        match args[idx].as_str() {
            "--file" | "-f" => options.file = Some(next_value(args, &mut idx, "--file")?.to_string()),
            "--quantum" | "-q" => {
                let quantum: u64 = parse_number(next_value(args, &mut idx, "--quantum")?, "--quantum")?;
                if quantum == 0 {
                    return Err(SchedulerError::InvalidQuantum(quantum));
                }
                options.quantum = Some(quantum);
            }
            "--algorithm" | "-a" => {
                options.algorithm = Some(next_value(args, &mut idx, "--algorithm")?.to_lowercase())
            }
            "--random" => {
                options.random = Some(parse_number(next_value(args, &mut idx, "--random")?, "--random")?)
            }
            "--seed" => options.seed = parse_number(next_value(args, &mut idx, "--seed")?, "--seed")?,
            "--csv" => options.csv = true,
            "--json" => options.json = true,
            "--help" | "-h" => options.help = true,
            other => {
                return Err(SchedulerError::InvalidArgument(format!(
                    "argumento desconocido: {}",
                    other
                )))
            }
        }
        idx += 1;
    }

    if options.file.is_some() && options.random.is_some() {
        return Err(SchedulerError::InvalidArgument(
            "--file y --random son excluyentes".to_string(),
        ));
    }
    if options.csv && options.json {
        return Err(SchedulerError::InvalidArgument(
            "--csv y --json son excluyentes".to_string(),
        ));
    }

    Ok(options)
}

fn load_workload(options: &CliOptions) -> Result<Workload> {
    if let Some(path) = &options.file {
        return workload::load_processes(path);
    }

    if let Some(count) = options.random {
        let processes = workload::bernoulli_processes(
            count,
            config::RANDOM_P_ARRIVAL,
            config::RANDOM_P_SHORT,
            config::RANDOM_SHORT_BURST,
            config::RANDOM_LONG_BURST,
            options.seed,
        )?;
        return Ok(Workload { processes, quantum: None });
    }

    Ok(Workload {
        processes: config::default_processes(),
        quantum: None,
    })
}

fn select_algorithms(choice: Option<&str>, quantum: u64) -> Result<Vec<SchedulingAlgorithm>> {
    match choice {
        None | Some("all") => Ok(config::default_algorithms(quantum)),
        Some("rr") | Some("round_robin") => Ok(vec![SchedulingAlgorithm::round_robin(quantum)]),
        Some(other) => Ok(vec![other.parse()?]),
    }
}

fn run(options: &CliOptions) -> Result<()> {
    let workload = load_workload(options)?;
    let quantum = options
        .quantum
        .or(workload.quantum)
        .unwrap_or(config::DEFAULT_QUANTUM);
    let algorithms = select_algorithms(options.algorithm.as_deref(), quantum)?;

    let simulation = Simulation::with_algorithms(workload.processes, algorithms);
    info!(
        processes = simulation.processes().len(),
        quantum,
        "Carga de trabajo preparada"
    );

    let schedules = simulation.run()?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&schedules)?);
    } else if options.csv {
        print!("{}", simulation.generate_csv_report(&schedules));
    } else {
        println!("{}", simulation.generate_report(&schedules));
    }

    Ok(())
}

fn main() {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let bin = args.first().map(String::as_str).unwrap_or("cpu-scheduling-simulator");

    let options = parse_args(args.get(1..).unwrap_or_default()).unwrap_or_else(|e| {
        eprintln!("{}\nError: {}", usage(bin), e);
        process::exit(1);
    });

    if options.help {
        println!("{}", usage(bin));
        return;
    }

    if let Err(e) = run(&options) {
        error!(error = %e, "La simulación falló");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_full_command_line() {
        let options = parse_args(&args(&["--file", "p.json", "-q", "4", "--algorithm", "SJF", "--csv"])).unwrap();

        assert_eq!(options.file.as_deref(), Some("p.json"));
        assert_eq!(options.quantum, Some(4));
        assert_eq!(options.algorithm.as_deref(), Some("sjf"));
        assert!(options.csv);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_args(&args(&["--quantum", "0"])).is_err());
        assert!(parse_args(&args(&["--quantum"])).is_err());
        assert!(parse_args(&args(&["--random", "x"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
        assert!(parse_args(&args(&["--csv", "--json"])).is_err());
        assert!(parse_args(&args(&["--file", "a.json", "--random", "3"])).is_err());
    }

    #[test]
    fn test_select_algorithms_uses_quantum() {
        assert_eq!(select_algorithms(None, 3).unwrap().len(), 3);
        assert_eq!(
            select_algorithms(Some("rr"), 3).unwrap(),
            vec![SchedulingAlgorithm::round_robin(3)]
        );
        assert_eq!(
            select_algorithms(Some("rr:5"), 3).unwrap(),
            vec![SchedulingAlgorithm::round_robin(5)]
        );
        assert!(select_algorithms(Some("lottery"), 3).is_err());
    }

    #[test]
    fn test_random_workload_is_seeded() {
        let options = CliOptions {
            random: Some(8),
            seed: 11,
            ..CliOptions::default()
        };
        let first = load_workload(&options).unwrap();
        let second = load_workload(&options).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.processes.len(), 8);
    }
}
