use clap::{Arg, Command};
use log::LevelFilter;
use phishlens::analyzer::PhishingAnalyzer;
use phishlens::config::PhishlensConfig;
use phishlens::model_client::{CompletionModel, ModelConfig, OpenAiClient};
use phishlens::patterns::Catalog;
use phishlens::simulation::{self, EmailJsMailer, SimulationManager};
use phishlens::synthesis::RiskReport;
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let matches = Command::new("phishlens")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Phishing/scam text analyzer with pattern scoring and optional LLM enrichment")
        .arg(
            Arg::new("text")
                .value_name("TEXT")
                .help("Text to analyze (SMS, email, or chat message)")
                .index(1),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a sample configuration file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the report as JSON instead of pretty text")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("demo")
                .long("demo")
                .help("Run the built-in sample texts through the pipeline")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-scenarios")
                .long("list-scenarios")
                .help("List available phishing training scenarios")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("send-simulation")
                .long("send-simulation")
                .value_name("SCENARIO")
                .help("Send a training scenario email (requires --to)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("to")
                .long("to")
                .value_name("EMAIL")
                .help("Recipient for --send-simulation")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .value_name("URL")
                .help("Base URL for the training debrief link")
                .default_value("http://localhost:5173")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(path) = matches.get_one::<String>("generate-config") {
        match PhishlensConfig::sample().to_file(path) {
            Ok(()) => println!("Sample configuration written to {path}"),
            Err(e) => {
                eprintln!("Error writing configuration: {e}");
                process::exit(1);
            }
        }
        return;
    }

    let config = match matches.get_one::<String>("config") {
        Some(path) => match PhishlensConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading configuration {path}: {e}");
                process::exit(1);
            }
        },
        None => PhishlensConfig::default(),
    };

    if matches.get_flag("list-scenarios") {
        list_scenarios();
        return;
    }

    if let Some(scenario_id) = matches.get_one::<String>("send-simulation") {
        let Some(target) = matches.get_one::<String>("to") else {
            eprintln!("--send-simulation requires --to <EMAIL>");
            process::exit(1);
        };
        let base_url = matches.get_one::<String>("base-url").unwrap();
        send_simulation(&config, scenario_id, target, base_url).await;
        return;
    }

    let catalog = match &config.catalog_file {
        Some(path) => match Catalog::from_file(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                eprintln!("Error loading catalog {path}: {e}");
                process::exit(1);
            }
        },
        None => Catalog::builtin(),
    };

    // Model availability is decided once here; no key means the local
    // fallback path for the rest of the process.
    let model_config = config.model.clone().unwrap_or_else(ModelConfig::default);
    let model: Option<Arc<dyn CompletionModel>> = OpenAiClient::from_config(&model_config)
        .map(|client| Arc::new(client) as Arc<dyn CompletionModel>);

    let analyzer = match PhishingAnalyzer::new(catalog, model) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            eprintln!("Error building analyzer: {e}");
            process::exit(1);
        }
    };

    if matches.get_flag("demo") {
        run_demo(&analyzer, matches.get_flag("json")).await;
        return;
    }

    let Some(text) = matches.get_one::<String>("text") else {
        eprintln!("No text to analyze. Pass TEXT as an argument or use --demo.");
        process::exit(1);
    };

    let report = analyzer.analyze(text).await;
    print_report(&report, matches.get_flag("json"));
}

fn list_scenarios() {
    println!("📧 Available training scenarios:");
    println!();
    for scenario in simulation::scenarios() {
        println!("  {} - {}", scenario.id, scenario.title);
        println!("      발신자: {} <{}>", scenario.sender_name, scenario.sender_email);
        println!("      제목: {}", scenario.subject);
        println!();
    }
}

async fn send_simulation(config: &PhishlensConfig, scenario_id: &str, target: &str, base_url: &str) {
    let Some(mailer_config) = config.mailer.clone() else {
        eprintln!("No mailer section in configuration; cannot send training email.");
        process::exit(1);
    };

    let mailer = match EmailJsMailer::new(mailer_config) {
        Ok(mailer) => mailer,
        Err(e) => {
            eprintln!("Error building mailer: {e}");
            process::exit(1);
        }
    };

    let manager = SimulationManager::new(Arc::new(mailer));
    match manager.send_training_email(target, scenario_id, base_url).await {
        Ok(()) => println!("✅ Training email '{scenario_id}' sent to {target}"),
        Err(e) => {
            eprintln!("Error sending training email: {e}");
            process::exit(1);
        }
    }
}

async fn run_demo(analyzer: &PhishingAnalyzer, json: bool) {
    let samples = [
        "sdlkfjaslfjewjf;lasjfwpsdf",
        "긴급! 국세청입니다. 세금 환급을 위해 계좌번호를 회신해주세요.",
        "당첨되셨습니다! 지금 즉시 링크를 클릭하여 상금을 수령하세요.",
    ];

    println!("🔍 phishlens demo - {} sample texts", samples.len());
    println!();
    for (index, sample) in samples.iter().enumerate() {
        println!("[{}] {sample}", index + 1);
        let report = analyzer.analyze(sample).await;
        print_report(&report, json);
        println!("{}", "-".repeat(70));
    }
}

fn print_report(report: &RiskReport, json: bool) {
    if json {
        match serde_json::to_string_pretty(report) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => eprintln!("Error rendering report: {e}"),
        }
        return;
    }

    println!(
        "{} {} ({}%)",
        report.severity.emoji(),
        report.severity.label(),
        report.risk_score
    );

    if !report.matches.is_empty() {
        println!();
        println!("탐지된 패턴:");
        for matched in &report.matches {
            println!(
                "  - {} ({}): {} [+{:.1}]",
                matched.category,
                matched.description,
                matched.matched_keywords.join(", "),
                matched.score
            );
        }
    }

    println!();
    println!("권장사항:");
    for recommendation in &report.recommendations {
        println!("  {recommendation}");
    }

    println!();
    println!("요약: {}", report.summary);

    if let Some(error) = &report.error {
        println!("⚠️ 분석 오류: {error}");
    }
}
