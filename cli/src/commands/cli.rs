use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use batchgen_core::api::Language;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageArg {
    Zh,
    En,
}

impl From<LanguageArg> for Language {
    fn from(value: LanguageArg) -> Self {
        match value {
            LanguageArg::Zh => Language::Zh,
            LanguageArg::En => Language::En,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "batchgen", version, about = "Parse poster prompts and generate them in batch")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file; defaults to ~/.batchgen/config.toml, then ./config.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ParseArgs {
    /// Model output to parse; stdin when omitted.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Print report and tasks as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Write the reviewable task list to this file.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Product image sent to the analysis model.
    #[arg(long)]
    pub image: PathBuf,

    #[arg(long)]
    pub brand: Option<String>,

    #[arg(long)]
    pub requirements: Option<String>,

    #[arg(long, value_enum)]
    pub language: Option<LanguageArg>,

    /// Write the reviewable task list to this file.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RunArgs {
    /// JSON task list produced by `parse --out` or `analyze --out`.
    #[arg(long)]
    pub tasks: PathBuf,

    /// Reference image attached to every generation request.
    #[arg(long)]
    pub reference: Option<PathBuf>,

    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Re-run failed tasks up to N more times.
    #[arg(long, default_value_t = 0)]
    pub retry_failed: u32,

    /// Write the final queue as JSON to this file.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Decode `data:` image results into files under this directory.
    #[arg(long)]
    pub save_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split model output into generation tasks.
    Parse(ParseArgs),
    /// Analyse a product image and parse the returned prompts.
    Analyze(AnalyzeArgs),
    /// Generate every task of a task list.
    Run(RunArgs),
    /// Send a tiny request to confirm the configured key and endpoint work.
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_flags() {
        let args = Args::try_parse_from([
            "batchgen",
            "run",
            "--tasks",
            "tasks.json",
            "--max-concurrency",
            "3",
            "--retry-failed",
            "2",
            "--config",
            "c.toml",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("c.toml")));
        match args.command {
            Commands::Run(run) => {
                assert_eq!(run.max_concurrency, Some(3));
                assert_eq!(run.retry_failed, 2);
                assert!(run.reference.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn check_takes_no_arguments() {
        let args = Args::try_parse_from(["batchgen", "check"]).unwrap();
        assert!(matches!(args.command, Commands::Check));
        assert!(Args::try_parse_from(["batchgen", "check", "--image", "a.png"]).is_err());
    }

    #[test]
    fn analyze_requires_image() {
        assert!(Args::try_parse_from(["batchgen", "analyze"]).is_err());
        let args =
            Args::try_parse_from(["batchgen", "analyze", "--image", "a.png", "--language", "en"])
                .unwrap();
        match args.command {
            Commands::Analyze(a) => assert_eq!(a.language, Some(LanguageArg::En)),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
