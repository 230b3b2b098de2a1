//! Command-line surface of the `pi` binary.

use std::ffi::OsString;
use std::str::FromStr;

use clap::error::ErrorKind;
use clap::Parser;
use log::debug;

use crate::config::{Config, DEFAULT_TOTAL_SAMPLES, DEFAULT_WORKERS};
use crate::error::PiError;

pub const PROGRAM: &str = "pi";

/// Estimate π by Monte Carlo sampling across worker threads.
#[derive(Parser, Debug)]
#[command(name = PROGRAM, version, args_override_self = true)]
pub struct Args {
    /// Side length of the square in pixels
    #[arg(short = 's', value_name = "side_length", allow_hyphen_values = true)]
    pub side_length: Option<String>,

    /// Number of worker threads
    #[arg(short = 't', value_name = "num_threads", allow_hyphen_values = true)]
    pub threads: Option<String>,

    /// Suppress per-thread output
    #[arg(short = 'q')]
    pub quiet: bool,

    /// Total number of samples
    #[arg(short = 'n', long = "samples", value_name = "count", allow_hyphen_values = true)]
    pub samples: Option<String>,

    /// Master seed; a random one is used when omitted
    #[arg(long, value_name = "u64", allow_hyphen_values = true)]
    pub seed: Option<String>,

    /// Operands that are not flags; ignored
    #[arg(hide = true)]
    pub operands: Vec<String>,
}

impl Args {
    /// Turn the raw arguments into a validated [`Config`].
    pub fn into_config(self) -> Result<Config, PiError> {
        if !self.operands.is_empty() {
            debug!("ignoring operands {:?}", self.operands);
        }

        let side_length: u32 = parse_numeric(self.side_length.as_deref())?.unwrap_or(0);
        let workers: usize = parse_numeric(self.threads.as_deref())?.unwrap_or(DEFAULT_WORKERS);
        let total_samples: u64 =
            parse_numeric(self.samples.as_deref())?.unwrap_or(DEFAULT_TOTAL_SAMPLES);
        let seed: u64 = parse_numeric(self.seed.as_deref())?.unwrap_or_else(rand::random);

        let config = Config::new(side_length)
            .with_workers(workers)
            .with_total_samples(total_samples)
            .with_seed(seed)
            .with_verbose(!self.quiet);
        config.validate()?;
        Ok(config)
    }
}

/// What the binary should do after reading its arguments.
#[derive(Debug)]
pub enum Invocation {
    Run(Config),
    Exit { output: String, code: u8 },
}

/// Interpret a full argv, program name included.
pub fn parse_args<I, T>(argv: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
    if argv.len() < 2 {
        return usage_exit();
    }

    let args = match Args::try_parse_from(argv) {
        Ok(args) => args,
        Err(err) => {
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Invocation::Exit {
                    output: err.render().to_string(),
                    code: 0,
                },
                _ => {
                    debug!("rejected arguments: {err}");
                    usage_exit()
                }
            };
        }
    };

    match args.into_config() {
        Ok(config) => Invocation::Run(config),
        Err(err) => Invocation::Exit {
            output: format!("{err}\n"),
            code: 1,
        },
    }
}

pub fn usage() -> String {
    format!(
        "{PROGRAM}: Usage: ./{PROGRAM} [-q] -t num_threads -s side_length [-n samples] [--seed seed]\n\
         -q\tsuppress verbosity.\n\
         -t\tnum_threads   num_threads that will be executed.\n\
         -s\tside_length   side_length of the square in pixels.\n\
         -n\tsamples       total number of samples (default {DEFAULT_TOTAL_SAMPLES}).\n\
         --seed\tseed        master seed for reproducible runs.\n"
    )
}

fn usage_exit() -> Invocation {
    Invocation::Exit {
        output: usage(),
        code: 1,
    }
}

/// Parse an optional value made only of ASCII digits. Anything else,
/// including a leading sign, is an `Illegal argument`.
fn parse_numeric<T: FromStr>(value: Option<&str>) -> Result<Option<T>, PiError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let illegal = || PiError::IllegalArgument(value.to_owned());

    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(illegal());
    }
    value.parse().map(Some).map_err(|_| illegal())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exit_of(argv: &[&str]) -> (String, u8) {
        match parse_args(argv.iter().copied()) {
            Invocation::Exit { output, code } => (output, code),
            Invocation::Run(config) => panic!("expected exit, got {config:?}"),
        }
    }

    fn config_of(argv: &[&str]) -> Config {
        match parse_args(argv.iter().copied()) {
            Invocation::Run(config) => config,
            Invocation::Exit { output, code } => panic!("exit {code}: {output}"),
        }
    }

    #[test]
    fn no_arguments_prints_usage() {
        let (output, code) = exit_of(&["pi"]);
        assert_eq!(code, 1);
        assert!(output.contains("Usage"));
    }

    #[test]
    fn unknown_flag_prints_usage() {
        let (output, code) = exit_of(&["pi", "-x"]);
        assert_eq!(code, 1);
        assert_eq!(output, usage());
    }

    #[test]
    fn non_numeric_side_is_illegal() {
        let (output, code) = exit_of(&["pi", "-s", "abc"]);
        assert_eq!(code, 1);
        assert_eq!(output, "Illegal argument \"abc\"!\n");
    }

    #[test]
    fn negative_threads_are_illegal() {
        let (output, code) = exit_of(&["pi", "-s", "10", "-t", "-4"]);
        assert_eq!(code, 1);
        assert_eq!(output, "Illegal argument \"-4\"!\n");
    }

    #[test]
    fn missing_side_is_rejected() {
        let (output, code) = exit_of(&["pi", "-t", "4"]);
        assert_eq!(code, 1);
        assert_eq!(output, format!("{}\n", PiError::InvalidSideLength));
    }

    #[test]
    fn zero_threads_are_rejected() {
        let (_, code) = exit_of(&["pi", "-s", "10", "-t", "0"]);
        assert_eq!(code, 1);
    }

    #[test]
    fn help_exits_cleanly() {
        let (output, code) = exit_of(&["pi", "--help"]);
        assert_eq!(code, 0);
        assert!(output.contains("-s"));
    }

    #[test]
    fn defaults_apply() {
        let config = config_of(&["pi", "-s", "1000"]);
        assert_eq!(config.side_length, 1000);
        assert_eq!(config.workers, DEFAULT_WORKERS);
        assert_eq!(config.total_samples, DEFAULT_TOTAL_SAMPLES);
        assert!(config.verbose);
    }

    #[test]
    fn every_flag_is_read() {
        let config = config_of(&[
            "pi", "-q", "-t", "8", "-s", "640", "-n", "5000", "--seed", "42",
        ]);
        assert_eq!(
            config,
            Config::new(640)
                .with_workers(8)
                .with_total_samples(5000)
                .with_seed(42)
                .with_verbose(false)
        );
    }

    #[test]
    fn repeated_flags_keep_the_last_value() {
        let config = config_of(&["pi", "-s", "10", "-s", "20"]);
        assert_eq!(config.side_length, 20);

        let config = config_of(&["pi", "-t", "2", "-n", "100", "-t", "3", "-s", "5"]);
        assert_eq!(config.workers, 3);
    }

    #[test]
    fn repeated_quiet_flag_runs() {
        let config = config_of(&["pi", "-q", "-q", "-s", "20"]);
        assert_eq!(config.side_length, 20);
        assert!(!config.verbose);
    }

    #[test]
    fn stray_operands_are_ignored() {
        let config = config_of(&["pi", "-s", "10", "extra"]);
        assert_eq!(config.side_length, 10);

        let config = config_of(&["pi", "extra", "-t", "2", "-s", "30"]);
        assert_eq!(config.side_length, 30);
        assert_eq!(config.workers, 2);
    }

    #[test]
    fn operands_alone_still_need_a_side_length() {
        let (output, code) = exit_of(&["pi", "extra"]);
        assert_eq!(code, 1);
        assert_eq!(output, format!("{}\n", PiError::InvalidSideLength));
    }

    #[test]
    fn numeric_parser_rejects_mixed_input() {
        assert!(parse_numeric::<u32>(Some("12a")).is_err());
        assert!(parse_numeric::<u32>(Some("")).is_err());
        assert!(parse_numeric::<u32>(Some("+5")).is_err());
        assert!(parse_numeric::<u32>(Some("99999999999")).is_err());
        assert_eq!(parse_numeric::<u32>(Some("007")).unwrap(), Some(7));
        assert_eq!(parse_numeric::<u32>(None).unwrap(), None);
    }
}
