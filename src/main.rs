use anyhow::{Context, Result};
use clap::Parser;
use squidmind_lib::app::{App, AppOptions};
use squidmind_lib::{AppConfig, Personality};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Personality of a new creature (timid, adventurous, lazy, energetic,
    /// introvert, greedy, stubborn)
    #[arg(short, long, default_value = "adventurous")]
    personality: String,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 3600)]
    ticks: u64,

    /// Seed for the random source; random if omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// TOML file overriding the brain parameters
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for save slots; saving is disabled without it
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Append neurogenesis events to this file
    #[arg(long)]
    journal: Option<PathBuf>,

    /// Simulated seconds per tick
    #[arg(long, default_value_t = 1.0)]
    tick_secs: f64,

    /// Continue from the autosave slot in --save-dir
    #[arg(long)]
    resume: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    let Some(path) = path else {
        return Ok(AppConfig::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    AppConfig::from_toml(&content).with_context(|| format!("parsing config {}", path.display()))
}

fn main() -> Result<()> {
    squidmind_lib::squidmind_core::init_logging();
    let args = Args::parse();

    let personality: Personality = args.personality.parse()?;
    let options = AppOptions {
        personality,
        config: load_config(args.config.as_ref())?,
        seed: args.seed,
        save_dir: args.save_dir,
        journal: args.journal,
        tick_secs: args.tick_secs,
        resume: args.resume,
    };

    let mut app = App::new(options)?;
    app.run(args.ticks)?;
    let summary = app.finish()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{summary}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["squidmind"]);
        assert_eq!(args.personality, "adventurous");
        assert_eq!(args.ticks, 3600);
        assert!(args.seed.is_none());
        assert_eq!(args.tick_secs, 1.0);
        assert!(!args.resume);
    }

    #[test]
    fn test_args_full() {
        let args = Args::parse_from([
            "squidmind",
            "--personality",
            "timid",
            "--ticks",
            "10",
            "--seed",
            "7",
            "--save-dir",
            "/tmp/squid",
            "--journal",
            "/tmp/squid/journal.log",
            "--tick-secs",
            "0.5",
            "--resume",
        ]);
        assert_eq!(args.personality, "timid");
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.save_dir, Some(PathBuf::from("/tmp/squid")));
        assert_eq!(args.tick_secs, 0.5);
        assert!(args.resume);
    }

    #[test]
    fn test_missing_config_file() {
        let path = PathBuf::from("/nonexistent/squidmind.toml");
        assert!(load_config(Some(&path)).is_err());
        assert!(load_config(None).is_ok());
    }
}
