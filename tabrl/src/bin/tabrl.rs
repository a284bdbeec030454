use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::{
    io::{self, Write},
    sync::Arc,
};
use tabrl::default_coordinator;
use tabrl_coordinator::{replay_policy_event, CoordinatorConfig, SseChunk, TrainingStream};
use tabrl_core::{
    params::{ParamValue, Parameters},
    DiscreteEnv as _,
};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lists the algorithms
    Algorithms,

    /// Lists the environments
    Environments,

    /// Prints the parameter schema of an algorithm as JSON
    Schema {
        /// Name of the algorithm
        algorithm: String,

        /// Specializes defaults for an environment
        #[arg(short, long)]
        environment: Option<String>,
    },

    /// Trains a new session and prints the event stream
    Train {
        /// Name of the algorithm
        #[arg(short, long)]
        algorithm: String,

        /// Name of the environment
        #[arg(short, long)]
        environment: String,

        /// Parameter of the algorithm, e.g. `--param learning_rate=0.5`
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, ParamValue)>,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Configuration of the stream in YAML
        #[arg(short, long)]
        config: Option<String>,

        /// Replays the learned policy after training
        #[arg(short, long, default_value_t = false)]
        replay: bool,
    },

    /// Prints the initial frame of an environment as base64 PNG
    Preview {
        /// Name of the environment
        environment: String,
    },
}

fn parse_param(s: &str) -> Result<(String, ParamValue)> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected NAME=VALUE, got '{}'", s))?;
    Ok((name.trim().to_string(), ParamValue::parse(value.trim())))
}

fn train(
    algorithm: &str,
    environment: &str,
    params: Vec<(String, ParamValue)>,
    seed: Option<u64>,
    config: &CoordinatorConfig,
    replay: bool,
) -> Result<()> {
    let coordinator = Arc::new(default_coordinator());
    let params = params.into_iter().collect::<Parameters>();
    let id = coordinator.create_session(algorithm, environment, &params, seed)?;

    let mut out = io::stdout().lock();
    let mut stream = TrainingStream::spawn(coordinator.clone(), &id, config)?;
    for chunk in &mut stream {
        write!(out, "{}", chunk)?;
        out.flush()?;
    }
    stream.join()?;

    if replay {
        let event = replay_policy_event(&coordinator, &id);
        write!(out, "{}", SseChunk::data(&event)?)?;
    }
    Ok(())
}

fn preview(environment: &str) -> Result<()> {
    let coordinator = default_coordinator();
    let mut env = coordinator.environments().build(environment, None)?;
    env.reset(None)?;
    println!("{}", env.render()?.to_base64_png()?);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match args.command {
        Command::Algorithms => {
            for name in default_coordinator().algorithms().names() {
                println!("{}", name);
            }
        }
        Command::Environments => {
            for name in default_coordinator().environments().names() {
                println!("{}", name);
            }
        }
        Command::Schema {
            algorithm,
            environment,
        } => {
            let schema = default_coordinator().parameter_schema(&algorithm, environment.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Command::Train {
            algorithm,
            environment,
            params,
            seed,
            config,
            replay,
        } => {
            let config = match config {
                Some(path) => CoordinatorConfig::load(path)?,
                None => CoordinatorConfig::default(),
            };
            train(&algorithm, &environment, params, seed, &config, replay)?;
        }
        Command::Preview { environment } => preview(&environment)?,
    }

    Ok(())
}
