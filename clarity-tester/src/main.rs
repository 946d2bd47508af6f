mod logic;
mod scenario;
mod util;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Parser;
use clarity_core::WidgetProfile;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use logic::{LogicTester, ScenarioResult};
use scenario::{ScenarioCtx, all_keys, get_scenario, list_scenarios};
use util::{parse_seeds, split_csv};

#[derive(Debug, Parser)]
#[command(name = "clarity-tester", version = "0.1.0")]
#[command(about = "Seeded property runs against the Clarity settings engine")]
struct Args {
    /// Widget profile: a built-in name (classic, modern) or a path to a JSON profile
    #[arg(long, default_value = "modern")]
    profile: String,

    /// Scenarios to run (comma-separated, or "all")
    #[arg(long, default_value = "all")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated, decimal or 0x-hex)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 25)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let profile = resolve_profile(&args.profile)?;
    let seeds = parse_seeds(&args.seeds)?;
    let scenarios = expand_scenarios(&args.scenarios);
    log::info!(
        "running {} scenario(s) x {} seed(s) x {} iteration(s) on '{}'",
        scenarios.len(),
        seeds.len(),
        args.iterations,
        profile.name
    );

    let ctx = ScenarioCtx {
        profile,
        verbose: args.verbose,
    };
    let results = run_logic_scenarios(&ctx, &scenarios, &seeds, args.iterations);

    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:25} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "♿ Clarity Settings Engine Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn resolve_profile(arg: &str) -> Result<WidgetProfile> {
    if let Some(profile) = WidgetProfile::builtin(arg) {
        return Ok(profile);
    }
    let path = PathBuf::from(arg);
    if !path.exists() {
        bail!(
            "unknown profile '{arg}': expected one of {:?} or a JSON file",
            WidgetProfile::builtin_names()
        );
    }
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    WidgetProfile::from_json(&json).with_context(|| format!("invalid profile in {}", path.display()))
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios.retain(|s| s != "all");
        for key in all_keys() {
            if !scenarios.iter().any(|s| s == key) {
                scenarios.push(key.to_string());
            }
        }
    }
    scenarios
}

fn run_logic_scenarios(
    ctx: &ScenarioCtx,
    scenarios: &[String],
    seeds: &[u64],
    iterations: usize,
) -> Vec<ScenarioResult> {
    println!("{}", "🧠 Running Logic Tests".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let logic_tester = LogicTester::new(ctx.clone());
    let mut results = Vec::new();
    for scenario_name in scenarios {
        if let Some(scenario) = get_scenario(scenario_name) {
            results.extend(logic_tester.run_scenario(&scenario, seeds, iterations));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
        }
    }
    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    let generated_at = Utc::now();

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, results, generated_at)?,
        "markdown" => {
            logic::reports::generate_markdown_report(&mut output_target, results, generated_at)?;
        }
        _ => {
            if results.is_empty() {
                writeln!(&mut output_target, "No logic scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                    generated_at,
                )?;
            }
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            profile: "modern".to_string(),
            scenarios: "scale-clamping".to_string(),
            list_scenarios: false,
            seeds: "1337".to_string(),
            iterations: 1,
            report: "json".to_string(),
            verbose: false,
            output: None,
        }
    }

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "clarity-main-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn all_expands_to_every_scenario_once() {
        let expanded = expand_scenarios("store-roundtrip,all");
        assert_eq!(expanded.len(), all_keys().len());
        assert_eq!(expanded[0], "store-roundtrip");
    }

    #[test]
    fn profiles_resolve_by_name_or_file() {
        assert_eq!(resolve_profile("classic").unwrap().font_step, 25);
        assert!(resolve_profile("nope-not-a-profile").is_err());

        let path = temp_path("profile");
        std::fs::write(&path, r#"{"name":"custom","font_step":5}"#).unwrap();
        let custom = resolve_profile(path.to_str().unwrap()).unwrap();
        assert_eq!(custom.name, "custom");
        assert_eq!(custom.font_step, 5);
        assert_eq!(custom.storage_key, "clarity-settings");
    }

    #[test]
    fn list_scenarios_writes_to_file() {
        let path = temp_path("list");
        let args = Args {
            list_scenarios: true,
            output: Some(path.clone()),
            ..base_args()
        };
        assert!(maybe_list_scenarios(&args).unwrap());
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("reconcile-idempotent"));
    }

    #[test]
    fn json_report_written_to_output() {
        let path = temp_path("json");
        let args = Args {
            output: Some(path.clone()),
            ..base_args()
        };
        let ctx = ScenarioCtx {
            profile: WidgetProfile::modern(),
            verbose: false,
        };
        let results = run_logic_scenarios(&ctx, &["scale-clamping".to_string()], &[1], 1);
        write_reports(&args, &results, Instant::now()).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["passed"], 1);
    }
}
