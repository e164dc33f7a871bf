mod args;
mod ctl;
mod error;
mod opts;

use std::process::ExitCode;

use error::{Error, Result};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,

        Err(Error::Usage(err)) => {
            // help and version go to stdout with success status
            let _ = err.print();
            if err.use_stderr() {
                ExitCode::from(error::EX_USAGE)
            } else {
                ExitCode::SUCCESS
            }
        }

        Err(err) => {
            eprintln!("gpioctl: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}

fn run() -> Result<()> {
    use args::Args;
    use opts::Options;

    let args: Args = clap::Parser::try_parse()?;

    #[cfg(feature = "complete")]
    if let Some(shell) = args.complete {
        let mut cmd = <Args as clap::CommandFactory>::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(());
    }

    let opts = Options::try_from(args)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if opts.verbose { "debug" } else { "warn" }),
    )
    .init();

    log::debug!("{:?}", opts);

    let mut handle = ctl::open(&opts.device)?;

    handle.set_consumer(env!("CARGO_PKG_NAME"));

    let stdout = std::io::stdout();

    ctl::dispatch(&handle, opts.mode, opts.verbose, &mut stdout.lock())
}
