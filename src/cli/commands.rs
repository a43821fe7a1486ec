//! Command dispatch for the cursortree binary

use std::io::{self, Read};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::{parse_script, Session, Step};
use crate::cli::args::{Cli, Commands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::Settings;
use crate::exitcode;

/// Script behind `cursortree demo`.
pub const DEMO_SCRIPT: &str = "\
# A(B(D), C), cursor left on B
new A
add-left B
add-right C
left
add-left D
print
";

/// Run the parsed command line and map the result to a process exit code.
///
/// Errors are printed to stderr before their code is returned.
pub fn run(cli: &Cli) -> i32 {
    match execute_command(cli) {
        Ok(()) => exitcode::OK,
        Err(e) => {
            output::error(&e);
            e.exit_code()
        }
    }
}

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Run { script, strict }) => {
            _run(&load_settings(cli)?, script.as_deref(), *strict)
        }
        Some(Commands::Demo) => _demo(&load_settings(cli)?),
        Some(Commands::Config) => _config(&load_settings(cli)?),
        Some(Commands::Completion { shell }) => {
            _completion(*shell);
            Ok(())
        }
        None => Err(CliError::InvalidArgs(
            "no command given, see --help".to_string(),
        )),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(style) = cli.style {
        settings.style = style.into();
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

fn read_script(path: Option<&Path>) -> CliResult<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .map_err(|e| CliError::io(format!("read script {}", path.display()), e)),
        _ => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .map_err(|e| CliError::io("read script from stdin", e))?;
            Ok(source)
        }
    }
}

/// Execute a script, printing renders as they happen and rejected edits as
/// warnings.
#[instrument(skip(settings))]
fn _run(settings: &Settings, script: Option<&Path>, strict: bool) -> CliResult<()> {
    let source = read_script(script)?;
    let commands = parse_script(&source)?;
    let mut session = Session::from_settings(settings).with_strict(settings.strict || strict);

    for (line, command) in &commands {
        match session.execute(*line, command)? {
            Step::Applied => {}
            Step::Rendered(text) => output::info(&text),
            Step::Rejected(op) => {
                output::warning(&format!("line {}: '{}' ignored: {}", line, command, op))
            }
        }
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _demo(settings: &Settings) -> CliResult<()> {
    output::header(DEMO_SCRIPT.lines().next().unwrap_or_default().trim_start_matches("# "));
    let summary = Session::from_settings(settings).run(DEMO_SCRIPT)?;
    for text in &summary.outputs {
        output::info(text);
    }
    Ok(())
}

fn _config(settings: &Settings) -> CliResult<()> {
    output::info(&settings.to_toml()?);
    Ok(())
}

fn _completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    eprintln!("Generating completion file for {shell:?}...");
    generate(shell, &mut cmd, name, &mut io::stdout());
}
