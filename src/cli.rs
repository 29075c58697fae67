use anyhow::{bail, Result};
use std::fmt::Write;
use std::path::PathBuf;

use crate::providers::dry_run::{PlannedWrite, WriteKind};
use crate::recur::TickOutcome;
use crate::sync::RunSummary;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub dry_run: bool,
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(RunOptions),
    Help,
}

/// Parse the arguments after the program name.
///
/// Supported forms:
///   trello-recur
///   trello-recur --dry-run
///   trello-recur -c ~/other.conf
pub fn parse_args(args: &[String]) -> Result<Command> {
    let mut options = RunOptions::default();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-n" | "--dry-run" => options.dry_run = true,
            "-c" | "--config" => {
                i += 1;
                if i < args.len() {
                    options.config_path = Some(PathBuf::from(&args[i]));
                } else {
                    bail!("Missing value for -c/--config flag");
                }
            }
            other => bail!("Unknown argument: {other}\n\nRun `trello-recur --help` for usage."),
        }
        i += 1;
    }

    Ok(Command::Run(options))
}

pub fn print_help() {
    println!("trello-recur — send finished recurring Trello cards back with a new due date\n");
    println!("USAGE:");
    println!("  trello-recur [options]");
    println!();
    println!("OPTIONS:");
    println!("  -n, --dry-run        Show what would change without writing to Trello");
    println!("  -c, --config <path>  Settings file (default ~/.trello.conf)");
    println!("  -h, --help           Show this help");
    println!();
    println!("LABELS:");
    println!("  rrdN  every N days    rrmN  every N months    rryN  every N years");
}

pub fn render_summary(summary: &RunSummary, dry_run: bool) -> String {
    let mut out = String::new();
    let verb = if dry_run { "Would move" } else { "Moved" };
    let _ = writeln!(
        out,
        "{}: {verb} {} recurring card(s), left {} alone",
        summary.board,
        summary.processed.len(),
        summary.untouched
    );
    for card in &summary.processed {
        match &card.outcome {
            TickOutcome::Updated { due, .. } => {
                let _ = writeln!(out, "  {} -> due {due}", card.name);
            }
            TickOutcome::Skipped(reason) => {
                let _ = writeln!(out, "  {} (due date unchanged: {reason})", card.name);
            }
        }
    }
    out
}

pub fn render_planned(planned: &[PlannedWrite]) -> String {
    let mut out = String::new();
    for write in planned {
        let method = match write.kind {
            WriteKind::Create => "POST",
            WriteKind::Update => "PUT",
        };
        let fields: Vec<String> = write.form.iter().map(|(k, v)| format!("{k}={v}")).collect();
        let _ = writeln!(out, "  {method} {} {}", write.resource, fields.join("&"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::RawResponse;
    use crate::recur::SkipReason;
    use crate::sync::ProcessedCard;

    fn args(strs: &[&str]) -> Vec<String> {
        strs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_args_runs() {
        assert_eq!(parse_args(&args(&[])).unwrap(), Command::Run(RunOptions::default()));
    }

    #[test]
    fn dry_run_flags() {
        for flag in ["-n", "--dry-run"] {
            let Command::Run(opts) = parse_args(&args(&[flag])).unwrap() else {
                panic!("expected run");
            };
            assert!(opts.dry_run);
        }
    }

    #[test]
    fn config_path_flag() {
        let cmd = parse_args(&args(&["--config", "/tmp/t.conf", "-n"])).unwrap();
        assert_eq!(
            cmd,
            Command::Run(RunOptions {
                dry_run: true,
                config_path: Some(PathBuf::from("/tmp/t.conf")),
            })
        );
    }

    #[test]
    fn help_wins() {
        assert_eq!(parse_args(&args(&["-n", "--help"])).unwrap(), Command::Help);
    }

    #[test]
    fn missing_config_value_fails() {
        let err = parse_args(&args(&["-c"])).unwrap_err();
        assert!(err.to_string().contains("Missing value"));
    }

    #[test]
    fn unknown_flag_fails() {
        let err = parse_args(&args(&["--forever"])).unwrap_err();
        assert!(err.to_string().contains("--forever"));
    }

    #[test]
    fn summary_lists_each_card() {
        let ok = RawResponse {
            status: 200,
            body: String::new(),
        };
        let summary = RunSummary {
            board: "Home".into(),
            processed: vec![
                ProcessedCard {
                    id: "1".into(),
                    name: "Pay rent".into(),
                    outcome: TickOutcome::Updated {
                        due: "2024-02-29T00:00:00.000Z".into(),
                        response: ok.clone(),
                    },
                    moved: ok.clone(),
                },
                ProcessedCard {
                    id: "2".into(),
                    name: "Oil change".into(),
                    outcome: TickOutcome::Skipped(SkipReason::NoDueDate),
                    moved: ok,
                },
            ],
            untouched: 3,
        };
        let text = render_summary(&summary, false);
        assert!(text.starts_with("Home: Moved 2 recurring card(s), left 3 alone"));
        assert!(text.contains("Pay rent -> due 2024-02-29T00:00:00.000Z"));
        assert!(text.contains("Oil change (due date unchanged: has no due date and cannot recur)"));
        assert!(render_summary(&summary, true).contains("Would move"));
    }

    #[test]
    fn planned_writes_render_as_requests() {
        let planned = vec![PlannedWrite {
            kind: WriteKind::Update,
            resource: "cards/c1/idList".into(),
            form: vec![("value".into(), "l1".into())],
        }];
        assert_eq!(render_planned(&planned), "  PUT cards/c1/idList value=l1\n");
    }
}
