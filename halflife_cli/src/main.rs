use clap::{Args, Parser, Subcommand};
use halflife_core::export::{self, write_atomic};
use halflife_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "halflife")]
#[command(about = "Half-life calculator for repeated, escalating dose regimens", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override config file location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate the quantity over time (default)
    Run {
        #[command(flatten)]
        regimen: RegimenArgs,

        /// Output format (table, csv, json)
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Write output to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Clamp the initial dose to the max dose as well
        #[arg(long)]
        clamp_initial: bool,
    },

    /// List every dose the regimen administers
    Schedule {
        #[command(flatten)]
        regimen: RegimenArgs,

        /// Clamp the initial dose to the max dose as well
        #[arg(long)]
        clamp_initial: bool,
    },

    /// Show peak, trough and totals for the regimen
    Summary {
        #[command(flatten)]
        regimen: RegimenArgs,

        /// Clamp the initial dose to the max dose as well
        #[arg(long)]
        clamp_initial: bool,
    },

    /// Print the effective configuration
    Config {
        /// Write the configuration to the config path
        #[arg(long)]
        init: bool,
    },
}

/// Regimen fields as raw text; unset fields come from the config
#[derive(Args, Default)]
struct RegimenArgs {
    /// Time units for the quantity to decay by half
    #[arg(long, allow_hyphen_values = true)]
    half_life: Option<String>,

    /// Dose given at time 0
    #[arg(long, allow_hyphen_values = true)]
    initial_dose: Option<String>,

    /// Time units between doses
    #[arg(long, allow_hyphen_values = true)]
    dose_interval: Option<String>,

    /// Amount added to the dose per escalation interval
    #[arg(long, allow_hyphen_values = true)]
    dose_increase: Option<String>,

    /// Time units per escalation step
    #[arg(long, allow_hyphen_values = true)]
    dose_increase_intervals: Option<String>,

    /// Upper bound on escalated doses
    #[arg(long, allow_hyphen_values = true)]
    max_dose: Option<String>,

    /// Last time step to simulate
    #[arg(long, allow_hyphen_values = true)]
    time_span: Option<String>,
}

impl RegimenArgs {
    /// Layer the given fields over the configured regimen
    fn to_form(&self, config: &Config) -> RegimenForm {
        let mut form = RegimenForm::from(&config.regimen());
        let overrides = [
            (&self.half_life, &mut form.half_life),
            (&self.initial_dose, &mut form.initial_dose),
            (&self.dose_interval, &mut form.dose_interval),
            (&self.dose_increase, &mut form.dose_increase),
            (&self.dose_increase_intervals, &mut form.dose_increase_intervals),
            (&self.max_dose, &mut form.max_dose),
            (&self.time_span, &mut form.time_span),
        ];
        for (arg, field) in overrides {
            if let Some(value) = arg {
                *field = value.clone();
            }
        }
        form
    }
}

fn main() -> Result<()> {
    // Initialize logging
    halflife_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) if path.exists() => Config::load_from(path)?,
        Some(path) => {
            tracing::info!("No config file at {:?}, using defaults", path);
            Config::default()
        }
        None => Config::load()?,
    };

    match cli.command {
        Some(Commands::Run {
            regimen,
            format,
            output,
            clamp_initial,
        }) => cmd_run(&regimen, format, output, clamp_initial, &config),
        Some(Commands::Schedule {
            regimen,
            clamp_initial,
        }) => cmd_schedule(&regimen, clamp_initial, &config),
        Some(Commands::Summary {
            regimen,
            clamp_initial,
        }) => cmd_summary(&regimen, clamp_initial, &config),
        Some(Commands::Config { init }) => cmd_config(cli.config, init, &config),
        None => {
            // Default to "run" with the configured regimen
            cmd_run(&RegimenArgs::default(), None, None, false, &config)
        }
    }
}

/// Coerce the arguments and work out the simulation options
fn resolve(
    regimen: &RegimenArgs,
    clamp_initial: bool,
    config: &Config,
) -> Result<(RegimenParameters, SimulationOptions)> {
    let params = regimen.to_form(config).to_parameters()?;

    let mut options = config.simulation.options();
    if clamp_initial {
        options.clamp_policy = ClampPolicy::AllDoses;
    }

    let problems = params.validate(options.max_time_span);
    if !problems.is_empty() {
        eprintln!("Regimen warnings:");
        for problem in problems {
            eprintln!("  - {}", problem);
        }
    }

    Ok((params, options))
}

fn cmd_run(
    regimen: &RegimenArgs,
    format: Option<OutputFormat>,
    output: Option<PathBuf>,
    clamp_initial: bool,
    config: &Config,
) -> Result<()> {
    let (params, options) = resolve(regimen, clamp_initial, config)?;
    let series = simulate(&params, &options)?;
    let format = format.unwrap_or(config.output.format);

    let rendered = match format {
        OutputFormat::Table => render_table(&series, config.output.precision),
        OutputFormat::Csv => export::to_csv(&series)?,
        OutputFormat::Json => {
            let summary = summarize(&series, &params, options.clamp_policy);
            let report = SimulationReport::new(params, options.clamp_policy, summary, series);
            let mut json = export::to_json(&report)?;
            json.push('\n');
            json
        }
    };

    match output {
        Some(path) => {
            write_atomic(&path, rendered.as_bytes())?;
            println!(
                "✓ Wrote {} samples to {}",
                params.time_span as usize + 1,
                path.display()
            );
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

fn cmd_schedule(regimen: &RegimenArgs, clamp_initial: bool, config: &Config) -> Result<()> {
    let (params, options) = resolve(regimen, clamp_initial, config)?;
    let precision = config.output.precision;
    let events = checked_schedule(&params, &options)?;

    println!("{:>6}  {:>12}", "time", "dose");
    for event in events {
        let marker = if event.clamped { "  (clamped)" } else { "" };
        println!(
            "{:>6}  {:>12.*}{}",
            event.time, precision, event.amount, marker
        );
    }

    Ok(())
}

fn cmd_summary(regimen: &RegimenArgs, clamp_initial: bool, config: &Config) -> Result<()> {
    let (params, options) = resolve(regimen, clamp_initial, config)?;
    let series = simulate(&params, &options)?;
    let summary = summarize(&series, &params, options.clamp_policy);
    let p = config.output.precision;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  REGIMEN SUMMARY");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Samples:            {}", summary.samples);
    println!("  Doses:              {}", summary.doses);
    println!("  Total administered: {:.*}", p, summary.total_administered);
    println!(
        "  Peak:               {:.*} at t={}",
        p, summary.peak.quantity, summary.peak.time
    );
    println!(
        "  Trough:             {:.*} at t={}",
        p, summary.trough.quantity, summary.trough.time
    );
    println!("  Final quantity:     {:.*}", p, summary.final_quantity);
    println!();

    Ok(())
}

fn cmd_config(path: Option<PathBuf>, init: bool, config: &Config) -> Result<()> {
    if !init {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let path = match path {
        Some(path) => path,
        None => Config::default_config_path()?,
    };
    if path.exists() {
        return Err(Error::Config(format!(
            "{} already exists",
            path.display()
        )));
    }

    config.save_to(&path)?;
    println!("✓ Wrote config to {}", path.display());
    Ok(())
}

fn render_table(series: &Series, precision: usize) -> String {
    let mut out = format!("{:>6}  {:>12}\n", "time", "quantity");
    for sample in series {
        out.push_str(&format!(
            "{:>6}  {:>12.*}\n",
            sample.time, precision, sample.quantity
        ));
    }
    out
}
