//! Monte Carlo dice driver
//!
//! Usage:
//!   montecarlo                          - Classic demo: three d6, one loaded, 8 rolls
//!   montecarlo --config sim.json        - Dice and rolls from a JSON config
//!   montecarlo --faces h,t --dice 5     - Five fair coins
//!   montecarlo -w 0:6=5 --rolls 1000    - Load face 6 of die 0 five times over
//!   montecarlo --json --output run.json - Write table and statistics as JSON

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;

use mc_sim::{
    AnalysisReport, DieSpec, FaceLabel, OutcomeAnalyzer, PlayRecorder, PlayResults, ResultForm,
    SimConfig,
};

#[derive(Parser)]
#[command(name = "montecarlo", about = "Weighted dice Monte Carlo runs")]
struct Cli {
    /// JSON config file (defaults to the classic demo)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rolls per play
    #[arg(short, long)]
    rolls: Option<usize>,

    /// RNG seed for reproducible runs
    #[arg(short, long)]
    seed: Option<u64>,

    /// Table form: wide or narrow
    #[arg(short, long)]
    form: Option<String>,

    /// Comma-separated faces for fair dice (e.g. "1,2,3,4,5,6" or "h,t")
    #[arg(long)]
    faces: Option<String>,

    /// Number of dice built from --faces
    #[arg(long, default_value_t = 3)]
    dice: usize,

    /// Weight override DIE:FACE=WEIGHT (repeatable)
    #[arg(short, long = "weight")]
    weights: Vec<String>,

    /// Print JSON instead of text tables
    #[arg(long)]
    json: bool,

    /// Write JSON output to a file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// One weight override from the command line
#[derive(Debug, PartialEq)]
struct WeightFlag {
    die: usize,
    face: FaceLabel,
    weight: String,
}

fn parse_weight_flag(text: &str) -> Result<WeightFlag> {
    let (die, rest) = text
        .split_once(':')
        .with_context(|| format!("weight '{}' must look like DIE:FACE=WEIGHT", text))?;
    let (face, weight) = rest
        .split_once('=')
        .with_context(|| format!("weight '{}' must look like DIE:FACE=WEIGHT", text))?;
    let die = die
        .trim()
        .parse()
        .with_context(|| format!("invalid die index '{}'", die))?;

    Ok(WeightFlag {
        die,
        face: FaceLabel::infer(face),
        weight: weight.trim().to_string(),
    })
}

fn build_config(cli: &Cli) -> Result<SimConfig> {
    let mut config = match &cli.config {
        Some(path) => SimConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::classic(),
    };

    if let Some(faces) = &cli.faces {
        if cli.dice == 0 {
            bail!("--dice must be at least 1");
        }
        let spec = DieSpec {
            faces: faces.split(',').map(FaceLabel::infer).collect(),
            weights: Vec::new(),
        };
        config.dice = vec![spec; cli.dice];
    }
    if let Some(rolls) = cli.rolls {
        config.rolls = rolls;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(form) = &cli.form {
        config.form = form.parse::<ResultForm>()?;
    }
    Ok(config)
}

fn apply_weights(game: &PlayRecorder, flags: &[WeightFlag]) -> Result<()> {
    for flag in flags {
        let die = game
            .dice()
            .get(flag.die)
            .with_context(|| format!("die {} does not exist", flag.die))?;
        die.write()
            .set_weight_str(&flag.face, &flag.weight)
            .with_context(|| format!("setting weight on die {}", flag.die))?;
    }
    Ok(())
}

#[derive(Serialize)]
struct RunOutput<'a> {
    config: &'a SimConfig,
    results: PlayResults,
    report: AnalysisReport,
}

fn print_text(game: &PlayRecorder, results: &PlayResults, analyzer: &OutcomeAnalyzer<'_>) {
    println!("Play results ({}):", results.form());
    println!("{}", results);
    println!("Jackpots: {}", analyzer.jackpot_count());
    println!();
    println!("Face counts per roll:");
    println!("{}", analyzer.face_count_per_roll());
    println!("Combinations:");
    println!("{}", analyzer.combo_count());
    println!("Permutations:");
    println!("{}", analyzer.permutation_count());

    for (idx, die) in game.dice().iter().enumerate() {
        println!("Die {}:", idx);
        println!("{}", die.current_state());
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = build_config(&cli)?;
    let flags = cli
        .weights
        .iter()
        .map(|w| parse_weight_flag(w))
        .collect::<Result<Vec<_>>>()?;

    let mut game = config.build_recorder().context("building dice")?;
    apply_weights(&game, &flags)?;

    log::info!(
        "Playing {} rolls with {} dice",
        config.rolls,
        game.num_dice()
    );
    game.play(config.rolls)?;

    let results = game.results(config.form);
    let analyzer = OutcomeAnalyzer::new(&game)?;

    if cli.json || cli.output.is_some() {
        let output = RunOutput {
            config: &config,
            results,
            report: analyzer.report(),
        };
        let json = serde_json::to_string_pretty(&output)?;
        match &cli.output {
            Some(path) => {
                std::fs::write(path, json)
                    .with_context(|| format!("writing {}", path.display()))?;
                log::info!("Wrote results to {}", path.display());
            }
            None => println!("{}", json),
        }
    } else {
        print_text(&game, &results, &analyzer);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weight_flag() {
        let flag = parse_weight_flag("2:3=10").unwrap();
        assert_eq!(
            flag,
            WeightFlag {
                die: 2,
                face: FaceLabel::from(3),
                weight: "10".into(),
            }
        );

        let flag = parse_weight_flag("0:o=2.5").unwrap();
        assert_eq!(flag.face, FaceLabel::from("o"));
    }

    #[test]
    fn test_parse_weight_flag_errors() {
        assert!(parse_weight_flag("3=10").is_err());
        assert!(parse_weight_flag("x:3=10").is_err());
        assert!(parse_weight_flag("1:3").is_err());
    }

    #[test]
    fn test_build_config_from_flags() {
        let cli = Cli::parse_from([
            "montecarlo", "--faces", "h,t", "--dice", "5", "--rolls", "20", "--form", "narrow",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.dice.len(), 5);
        assert_eq!(config.dice[0].faces, vec![FaceLabel::from("h"), FaceLabel::from("t")]);
        assert_eq!(config.rolls, 20);
        assert_eq!(config.form, ResultForm::Narrow);
    }

    #[test]
    fn test_bad_form_rejected() {
        let cli = Cli::parse_from(["montecarlo", "--form", "diagonal"]);
        assert!(build_config(&cli).is_err());
    }

    #[test]
    fn test_apply_weights() {
        let game = SimConfig::uniform(2, 6).build_recorder().unwrap();
        let flags = vec![parse_weight_flag("1:6=4").unwrap()];
        apply_weights(&game, &flags).unwrap();
        assert_eq!(
            game.dice()[1].current_state().weight(&FaceLabel::from(6)),
            Some(4.0)
        );

        let bad = vec![parse_weight_flag("7:1=1").unwrap()];
        assert!(apply_weights(&game, &bad).is_err());
    }
}
