use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Parser};

// A rule replacement given as `ID=PRODUCTION`
#[derive(Debug, Clone, PartialEq)]
pub struct EditArg {
    pub index: usize,
    pub production: String
}

fn parse_edit(text: &str) -> Result<EditArg, String> {
    let (index, production) = text
        .split_once('=')
        .ok_or_else(|| format!("expected ID=PRODUCTION, got `{}`", text))?;
    let index = index
        .trim()
        .parse()
        .map_err(|_| format!("`{}` is not a rule id", index.trim()))?;

    Ok(EditArg {
        index,
        production: production.to_string()
    })
}

#[derive(Parser)]
#[command(version, about)]
#[command(group(ArgGroup::new("source").required(true).args(["grammar", "rules"])))]
pub struct Cli {
    /// Strings to test against the grammar
    pub strings: Vec<String>,

    /// File containing the grammar
    #[arg(short, long, value_name = "FILE")]
    pub grammar: Option<PathBuf>,

    /// A rule such as `S = aB | b`, instead of a file (repeatable)
    #[arg(short, long = "rule", value_name = "RULE")]
    pub rules: Vec<String>,

    /// Replace a rule before parsing, ids as shown by `list` (repeatable)
    #[arg(short, long = "edit", value_name = "ID=PRODUCTION", value_parser = parse_edit)]
    pub edits: Vec<EditArg>,

    /// Deepest tree level to print (default: all)
    #[arg(short, long, value_name = "LEVEL")]
    pub depth: Option<usize>,

    /// Amount of random sentences to generate
    #[arg(short = 'n', long, value_name = "AMOUNT")]
    pub generate: Option<u32>,

    /// Start symbol for generated sentences (default: the grammar's)
    #[arg(short, long, value_name = "SYMBOL")]
    pub start: Option<char>,

    /// Keep reading commands from standard input
    #[arg(short, long)]
    pub interactive: bool,

    /// Log more (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool
}
