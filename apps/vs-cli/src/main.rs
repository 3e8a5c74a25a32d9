use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc;
use tracing::info;
use vs_app::{
    AppError, AppResult, BurstReport, ConsolePublisher, MqttPublisher, Publisher, Session,
    install_interrupt_handler, spawn_stdin_reader,
};
use vs_config::{GeneratorConfig, validate_config};
use vs_signal::Mode;

#[derive(Parser)]
#[command(name = "vs-cli")]
#[command(about = "VirtuSense signal generator - publishes simulated sensor readings over MQTT", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive control panel
    Run {
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Send bursts of one mode without prompting
    Burst {
        /// Signal mode (normal, anomaly, idle or n/a/i)
        mode: Mode,
        /// Number of bursts to send
        #[arg(long, default_value_t = 1)]
        count: usize,
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Print the effective configuration
    Config {
        /// Path to a YAML or JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print JSON instead of YAML
        #[arg(long)]
        json: bool,
    },
    /// Validate a config file
    Validate {
        /// Path to the config file
        config_path: PathBuf,
    },
}

#[derive(Args)]
struct SessionArgs {
    /// Path to a YAML or JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Broker host name or address
    #[arg(long)]
    host: Option<String>,
    /// Broker TCP port
    #[arg(long)]
    port: Option<u16>,
    /// Topic to publish samples to
    #[arg(long)]
    topic: Option<String>,
    /// MQTT client identifier
    #[arg(long)]
    client_id: Option<String>,
    /// Samples per burst
    #[arg(long)]
    burst_size: Option<usize>,
    /// Pause between samples in seconds
    #[arg(long)]
    delay: Option<f64>,
    /// Log payloads instead of connecting to a broker
    #[arg(long)]
    dry_run: bool,
}

impl SessionArgs {
    /// Defaults, then the config file, then command line flags.
    fn resolve(&self) -> AppResult<GeneratorConfig> {
        let mut config = load_or_default(self.config.as_deref())?;
        if let Some(host) = &self.host {
            config.broker.host = host.clone();
        }
        if let Some(port) = self.port {
            config.broker.port = port;
        }
        if let Some(topic) = &self.topic {
            config.broker.topic = topic.clone();
        }
        if let Some(client_id) = &self.client_id {
            config.broker.client_id = client_id.clone();
        }
        if let Some(size) = self.burst_size {
            config.burst.size = size;
        }
        if let Some(delay) = self.delay {
            config.burst.delay_s = delay;
        }
        validate_config(&config)?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    // Logs go to stderr; stdout is the operator console
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();

    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(message) = failure_message(&e) {
                eprintln!("{}", message);
            }
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: Cli) -> AppResult<()> {
    match cli.command {
        Commands::Run { session } => cmd_run(&session),
        Commands::Burst {
            mode,
            count,
            session,
        } => cmd_burst(mode, count, &session),
        Commands::Config { config, json } => cmd_config(config.as_deref(), json),
        Commands::Validate { config_path } => cmd_validate(&config_path),
    }
}

/// Text to print for a failed command, or `None` when it was already shown.
fn failure_message(err: &AppError) -> Option<String> {
    match err {
        // connect() prints "Connection Failed: ..." itself
        AppError::Connect(_) => None,
        other => Some(format!("Error: {}", other)),
    }
}

fn cmd_run(args: &SessionArgs) -> AppResult<()> {
    let config = args.resolve()?;
    let publisher = connect(&config, args.dry_run)?;

    let (tx, rx) = mpsc::channel();
    install_interrupt_handler(tx.clone())?;
    spawn_stdin_reader(tx)?;

    let mut session = Session::new(&config, publisher, rand::rng())?;
    let summary = session.run(&rx, &mut io::stdout())?;
    info!(
        bursts = summary.bursts,
        published = summary.samples_published,
        invalid_commands = summary.invalid_commands,
        "control panel closed"
    );
    Ok(())
}

fn cmd_burst(mode: Mode, count: usize, args: &SessionArgs) -> AppResult<()> {
    let config = args.resolve()?;
    let publisher = connect(&config, args.dry_run)?;

    // No console input here; the channel only carries Ctrl-C
    let (tx, rx) = mpsc::channel();
    install_interrupt_handler(tx)?;

    let mut session = Session::new(&config, publisher, rand::rng())?;
    let mut stdout = io::stdout();
    for _ in 0..count {
        let report = session.run_burst(mode, &rx, &mut stdout)?;
        print_burst_report(&report);
        if report.interrupted {
            break;
        }
    }
    let summary = session.finish(&mut stdout)?;

    println!("  Bursts:    {}", summary.bursts);
    println!("  Published: {}", summary.samples_published);
    if summary.publish_failures > 0 {
        println!("  Failed:    {}", summary.publish_failures);
    }
    Ok(())
}

fn cmd_config(config_path: Option<&Path>, json: bool) -> AppResult<()> {
    let config = load_or_default(config_path)?;
    let rendered = if json {
        serde_json::to_string_pretty(&config).map_err(|e| AppError::Config(e.to_string()))?
    } else {
        serde_yaml::to_string(&config).map_err(|e| AppError::Config(e.to_string()))?
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

fn cmd_validate(config_path: &Path) -> AppResult<()> {
    println!("Validating config: {}", config_path.display());
    let config = vs_config::load_path(config_path)?;
    println!("✓ Config is valid");
    println!(
        "  Broker: {}:{} (topic {})",
        config.broker.host, config.broker.port, config.broker.topic
    );
    println!(
        "  Burst:  {} samples every {:.3} s",
        config.burst.size, config.burst.delay_s
    );
    Ok(())
}

fn load_or_default(path: Option<&Path>) -> AppResult<GeneratorConfig> {
    match path {
        Some(path) => Ok(vs_config::load_path(path)?),
        None => Ok(GeneratorConfig::default()),
    }
}

fn connect(config: &GeneratorConfig, dry_run: bool) -> AppResult<Box<dyn Publisher>> {
    if dry_run {
        println!("Dry run: payloads for {} are not sent", config.broker.topic);
        return Ok(Box::new(ConsolePublisher::new()));
    }

    println!("Connecting to Broker: {}...", config.broker.host);
    match MqttPublisher::connect(&config.broker) {
        Ok(publisher) => {
            println!("Connected! Target Topic: {}", config.broker.topic);
            Ok(Box::new(publisher))
        }
        Err(e) => {
            println!("Connection Failed: {}", e);
            Err(e.into())
        }
    }
}

fn print_burst_report(report: &BurstReport) {
    let status = if report.interrupted {
        "✗ Burst interrupted"
    } else {
        "✓ Burst complete"
    };
    println!(
        "{} ({}, started {}): {} published, {} failed",
        status,
        report.mode,
        report.started_at.format("%H:%M:%S"),
        report.published,
        report.failed
    );
    if let (Some(min), Some(max)) = (report.min, report.max) {
        println!("  Range: {} - {}", min.padded(), max.padded());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_args(argv: &[&str]) -> SessionArgs {
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Run { session } | Commands::Burst { session, .. } => session,
            _ => panic!("expected a session command"),
        }
    }

    #[test]
    fn flags_override_defaults() {
        let args = session_args(&[
            "vs-cli",
            "run",
            "--host",
            "localhost",
            "--port",
            "1884",
            "--burst-size",
            "5",
            "--delay",
            "0.1",
        ]);
        let config = args.resolve().unwrap();
        assert_eq!(config.broker.host, "localhost");
        assert_eq!(config.broker.port, 1884);
        assert_eq!(config.broker.topic, "virtusense/unique_id_123/signal_input");
        assert_eq!(config.burst.size, 5);
        assert_eq!(config.burst.delay_s, 0.1);
    }

    #[test]
    fn flags_override_config_file() {
        let path = std::env::temp_dir().join("vs_cli_flags_override.yaml");
        std::fs::write(&path, "broker:\n  host: file.host\n  port: 2000\n").unwrap();
        let path_str = path.to_string_lossy().to_string();

        let args = session_args(&["vs-cli", "run", "--config", &path_str, "--port", "3000"]);
        let config = args.resolve().unwrap();
        assert_eq!(config.broker.host, "file.host");
        assert_eq!(config.broker.port, 3000);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let args = session_args(&["vs-cli", "run", "--burst-size", "0"]);
        assert!(args.resolve().is_err());
    }

    #[test]
    fn connection_failure_is_reported_once() {
        let err = AppError::from(vs_app::ConnectError {
            host: "broker.invalid".to_string(),
            port: 1883,
            reason: "refused".to_string(),
        });
        assert_eq!(failure_message(&err), None);

        let err = AppError::Config("burst.size = 0".to_string());
        assert_eq!(
            failure_message(&err).as_deref(),
            Some("Error: Config error: burst.size = 0")
        );
    }

    #[test]
    fn burst_accepts_short_and_long_modes() {
        for (arg, expected) in [("anomaly", Mode::Anomaly), ("n", Mode::Normal)] {
            let cli = Cli::try_parse_from(["vs-cli", "burst", arg, "--dry-run"]).unwrap();
            match cli.command {
                Commands::Burst { mode, count, session } => {
                    assert_eq!(mode, expected);
                    assert_eq!(count, 1);
                    assert!(session.dry_run);
                }
                _ => panic!("expected burst"),
            }
        }
        assert!(Cli::try_parse_from(["vs-cli", "burst", "loud"]).is_err());
    }
}
