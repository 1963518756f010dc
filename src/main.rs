use ares::config::Config;
use ares::presentation::Presentation;
use ares::sink::InMemorySink;
use ares::{graded_dimension_string, Resolver};

use std::error::Error;
use std::fmt;

fn main() {
    let args: Vec<_> = std::env::args().collect();
    match run(&args) {
        Ok(message) => println!("{message}"),
        Err(e) => {
            eprintln!("Application error: {e}");
            std::process::exit(1);
        }
    }
}

#[derive(Debug)]
struct UsageError {
    message: String,
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for UsageError {}

const USAGE: &str = "\
Usage:
  ares res <complex.json> [t_max] [stem_max] [db]
  ares prod <ring.json> <t_max> [stem_max]
  ares prod_mod <mod.json> <ring.json> <t_max> [stem_max]
  ares map_res <src.json> <dst.json> <t_max> [stem_max]
";

fn run(args: &[String]) -> Result<String, Box<dyn Error>> {
    if args.len() < 2 || args[1] == "-h" || args[1] == "--help" {
        return Ok(USAGE.to_string());
    }

    match args[1].as_str() {
        "res" => run_res(&args[2..]),
        "prod" | "prod_mod" | "map_res" => Err(Box::new(UsageError {
            message: format!(
                "`{}` requires the relational persistence layer and a multiplicative-class \
                 presentation generator, both external collaborators outside this engine's scope",
                args[1]
            ),
        })),
        other => Err(Box::new(UsageError {
            message: format!("unknown subcommand `{other}`\n{USAGE}"),
        })),
    }
}

fn run_res(args: &[String]) -> Result<String, Box<dyn Error>> {
    if args.is_empty() {
        return Err(Box::new(UsageError {
            message: format!("`res` requires a complex name\n{USAGE}"),
        }));
    }
    let verbose = args.iter().any(|a| a == "-v");
    let positional: Vec<String> = args.iter().filter(|a| a.as_str() != "-v").cloned().collect();
    let complex = &positional[0];
    let config = Config::from_args(&positional[1..])?;

    let contents = std::fs::read_to_string(complex)?;
    let presentation = Presentation::from_json(&contents)?;

    let sink = InMemorySink::new();
    let resolver = Resolver::new(presentation, config, sink)?;
    resolver.resolve(|s, t| {
        if verbose {
            eprintln!("completed slice (s={s}, t={t})");
        }
    })?;

    Ok(graded_dimension_string(&resolver.level_generator_counts()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_flag_prints_usage() {
        let args = vec!["ares".to_string(), "-h".to_string()];
        let out = run(&args).unwrap();
        assert!(out.contains("Usage"));
    }

    #[test]
    fn unknown_subcommand_is_an_error() {
        let args = vec!["ares".to_string(), "bogus".to_string()];
        assert!(run(&args).is_err());
    }
}
