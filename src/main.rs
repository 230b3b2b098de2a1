use std::env;
use std::process::ExitCode;
use std::time::Instant;

use env_logger::Env;
use log::info;

use montecarlo_pi::cli::{self, Invocation};
use montecarlo_pi::monte_carlo::millis;
use montecarlo_pi::Sampler;

fn main() -> ExitCode {
    let start = Instant::now();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let config = match cli::parse_args(env::args_os()) {
        Invocation::Run(config) => config,
        Invocation::Exit { output, code } => {
            print!("{output}");
            return ExitCode::from(code);
        }
    };

    let status = match Sampler::new(config).and_then(|sampler| sampler.run()) {
        Ok(estimate) => {
            info!(
                "{} of {} samples inside after {:.3}ms of sampling",
                estimate.inside,
                estimate.total_samples,
                millis(estimate.elapsed)
            );
            println!();
            println!("********************");
            println!("*** PI: {:.6} ***", estimate.pi);
            println!("********************");
            println!();
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    };

    println!(
        "Total execution time for current run was (millis): {:.6}",
        millis(start.elapsed())
    );
    status
}
