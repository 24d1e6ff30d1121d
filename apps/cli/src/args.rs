use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminAction {
    List,
    Get(String),
    Set(String, u64),
    Reset(String),
    ResetTimer(String),
    Clear,
    Spike,
    Export,
    Import(PathBuf),
    RemoteSummary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Serve,
    Admin(AdminAction),
    Display { project_id: String, record: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub command: Command,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub seed: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            command: Command::Serve,
            port: None,
            config: None,
            data_dir: None,
            seed: false,
        }
    }
}

pub fn parse_args() -> Result<CliArgs, String> {
    parse_from(env::args().skip(1))
}

pub fn parse_from(args: impl IntoIterator<Item = String>) -> Result<CliArgs, String> {
    let mut args = args.into_iter();
    let mut parsed = CliArgs::default();
    let mut positional = Vec::new();
    let mut record = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--port" => {
                let value = next_value(&mut args, "--port")?;
                let port = value
                    .parse::<u16>()
                    .map_err(|_| format!("invalid port value: {value}"))?;
                parsed.port = Some(port);
            }
            "--config" => {
                parsed.config = Some(PathBuf::from(next_value(&mut args, "--config")?));
            }
            "--data-dir" => {
                parsed.data_dir = Some(PathBuf::from(next_value(&mut args, "--data-dir")?));
            }
            "--seed" => {
                parsed.seed = true;
            }
            "--record" => {
                record = true;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            value if value.starts_with("--") => {
                return Err(format!("unknown argument: {arg}"));
            }
            other => positional.push(other.to_string()),
        }
    }

    parsed.command = parse_command(&positional, record)?;
    Ok(parsed)
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next()
        .ok_or_else(|| format!("missing value for {flag}"))
}

fn parse_command(positional: &[String], record: bool) -> Result<Command, String> {
    let words: Vec<&str> = positional.iter().map(String::as_str).collect();
    let command = match words.as_slice() {
        [] | ["serve"] => Command::Serve,
        ["display", project_id] => Command::Display {
            project_id: project_id.to_string(),
            record,
        },
        ["admin", rest @ ..] => Command::Admin(parse_admin(rest)?),
        _ => return Err(format!("unknown command: {}", words.join(" "))),
    };
    if record && !matches!(command, Command::Display { .. }) {
        return Err("--record only applies to display".to_string());
    }
    Ok(command)
}

fn parse_admin(words: &[&str]) -> Result<AdminAction, String> {
    let action = match words {
        ["list"] => AdminAction::List,
        ["get", id] => AdminAction::Get(id.to_string()),
        ["set", id, count] => {
            let count = count
                .parse::<u64>()
                .map_err(|_| format!("invalid count value: {count}"))?;
            AdminAction::Set(id.to_string(), count)
        }
        ["reset", id] => AdminAction::Reset(id.to_string()),
        ["reset-timer", id] => AdminAction::ResetTimer(id.to_string()),
        ["clear"] => AdminAction::Clear,
        ["spike"] => AdminAction::Spike,
        ["export"] => AdminAction::Export,
        ["import", path] => AdminAction::Import(PathBuf::from(path)),
        ["remote-summary"] => AdminAction::RemoteSummary,
        _ => return Err(format!("unknown admin command: {}", words.join(" "))),
    };
    Ok(action)
}

pub fn print_help() {
    println!(
        "Portfolio Analytics\n\n\
Usage:\n  portfolio-analytics [serve] [--port <port>] [--seed]\n  portfolio-analytics display <project> [--record]\n  portfolio-analytics admin <command>\n\n\
Admin commands:\n  list | get <project> | set <project> <count> | reset <project>\n  reset-timer <project> | clear | spike | export | import <file> | remote-summary\n\n\
Options:\n  --port <port>      Override the configured port for this run only\n  --config <file>    Use this config file instead of the default location\n  --data-dir <dir>   Override the data directory\n  --seed             Insert the demo counters on startup\n  --record           Record a page view when displaying a count\n  -h, --help         Show this help message\n"
    );
}
