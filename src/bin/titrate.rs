use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use titration_rl::ai::{Agent, IndicatorAgent, RandomAgent};
use titration_rl::config::AppConfig;
use titration_rl::env::TitrationEnvironment;
use titration_rl::training::{
    run_episode, EpisodeStats, ReliabilityEvaluator, Trainer, TrainingCallback, TrainingMetrics,
    TrainingSummary,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    Indicator,
    Random,
}

/// Roll out titration policies and check them against the reliability gate.
#[derive(Parser)]
#[command(name = "titrate", about = "Weak-acid titration environment runner")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Policy to drive the environment with
    #[arg(long, value_enum, default_value = "indicator")]
    policy: Policy,

    /// Seed for the random policy
    #[arg(long)]
    seed: Option<u64>,

    /// Number of episodes to roll out
    #[arg(long, default_value_t = 32)]
    episodes: usize,

    /// Run the trainer loop for this many timesteps with the reliability gate attached
    #[arg(long)]
    train_steps: Option<usize>,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct Report {
    policy: String,
    equivalence_volume_ml: f64,
    rollout: EpisodeStats,
    band_success_rate: f64,
    training: Option<TrainingSummary>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    if cli.print_default_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }
    if cli.episodes == 0 {
        bail!("--episodes must be > 0");
    }

    let mut app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(steps) = cli.train_steps {
        app_config.training.total_timesteps = steps;
        app_config.validate().context("validating CLI overrides")?;
    }

    let params = app_config.titration.clone();
    let mut env = TitrationEnvironment::new(params.clone()).context("building environment")?;
    let mut agent = make_agent(cli.policy, cli.seed, &app_config, &env);

    let mut metrics = TrainingMetrics::with_capacity(cli.episodes);
    for _ in 0..cli.episodes {
        let trace = run_episode(&mut env, agent.as_mut(), true);
        metrics.record_episode(trace.result);
    }
    let band = &app_config.reliability;
    let rollout = metrics.stats(cli.episodes);
    let band_success_rate = metrics.band_success_rate(cli.episodes, band.ph_low, band.ph_high);

    let training = match cli.train_steps {
        Some(_) => {
            let mut evaluator =
                ReliabilityEvaluator::new(app_config.reliability.clone(), params.clone())
                    .context("building reliability evaluator")?;
            let trainer = Trainer::new(app_config.training.clone());
            let mut callbacks: [&mut dyn TrainingCallback; 1] = [&mut evaluator];
            let (summary, _) = trainer.train(agent.as_mut(), &mut env, &mut callbacks);
            Some(summary)
        }
        None => None,
    };

    let report = Report {
        policy: agent.name().to_string(),
        equivalence_volume_ml: env.equivalence_volume_ml(),
        rollout,
        band_success_rate,
        training,
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serializing report")?
        );
    } else {
        print_report(&report, band.ph_low, band.ph_high);
    }
    Ok(())
}

fn make_agent(
    policy: Policy,
    seed: Option<u64>,
    config: &AppConfig,
    env: &TitrationEnvironment,
) -> Box<dyn Agent> {
    match policy {
        Policy::Indicator => Box::new(IndicatorAgent::new(
            config.indicator_agent.clone(),
            config.titration.addable_volumes_ml.len(),
        )),
        Policy::Random => match seed {
            Some(seed) => Box::new(RandomAgent::seeded(env.num_actions(), seed)),
            None => Box::new(RandomAgent::new(env.num_actions())),
        },
    }
}

fn print_report(report: &Report, ph_low: f64, ph_high: f64) {
    let s = &report.rollout;
    println!("Policy: {}", report.policy);
    println!("Equivalence volume: {:.2} mL", report.equivalence_volume_ml);
    println!("-------------------------------------------");
    println!("Episodes:        {}", s.episodes);
    println!(
        "Reward:          mean {:.2} | std {:.2} | min {:.2} | max {:.2}",
        s.mean_reward, s.std_reward, s.min_reward, s.max_reward
    );
    println!("Episode length:  mean {:.1}", s.mean_length);
    println!("Final pH:        mean {:.3}", s.mean_final_ph);
    println!(
        "In band [{}, {}]: {:.1}%",
        ph_low,
        ph_high,
        report.band_success_rate * 100.0
    );
    if let Some(t) = &report.training {
        println!("-------------------------------------------");
        println!(
            "Training: {} timesteps, {} episodes, {}",
            t.timesteps,
            t.episodes,
            if t.stopped_early {
                "stopped early by reliability gate"
            } else {
                "budget exhausted"
            }
        );
    }
}
