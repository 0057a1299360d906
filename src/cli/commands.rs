//! Command table and handlers for the dashboard shell.

use strsim::levenshtein;

use crate::{
    core::session::{LoadOutcome, Session},
    domain::{SemesterId, SemesterUpdate, TransactionId},
    errors::{DashboardError, Result},
};

use super::output::Output;

/// Whether the shell keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "list",
        usage: "list",
        summary: "Show cached semesters",
    },
    CommandSpec {
        name: "reload",
        usage: "reload",
        summary: "Fetch semesters from the backend again",
    },
    CommandSpec {
        name: "select",
        usage: "select <semester-id>",
        summary: "Select a semester and load its transactions",
    },
    CommandSpec {
        name: "create",
        usage: "create <name>",
        summary: "Create a semester and select it",
    },
    CommandSpec {
        name: "delete",
        usage: "delete",
        summary: "Delete the selected semester",
    },
    CommandSpec {
        name: "summary",
        usage: "summary <name|starting|current|house|insurance> <value>",
        summary: "Edit the selected semester's summary",
    },
    CommandSpec {
        name: "stats",
        usage: "stats",
        summary: "Show statistics for the selected semester",
    },
    CommandSpec {
        name: "transactions",
        usage: "transactions",
        summary: "List transactions of the selected semester",
    },
    CommandSpec {
        name: "search",
        usage: "search <query>",
        summary: "Filter transactions of the selected semester",
    },
    CommandSpec {
        name: "categories",
        usage: "categories",
        summary: "List categories",
    },
    CommandSpec {
        name: "category",
        usage: "category <add|remove> <name>",
        summary: "Manage categories",
    },
    CommandSpec {
        name: "recategorize",
        usage: "recategorize <transaction-id> <category>",
        summary: "Move a transaction to another category",
    },
    CommandSpec {
        name: "help",
        usage: "help",
        summary: "Show this help",
    },
    CommandSpec {
        name: "exit",
        usage: "exit",
        summary: "Leave the shell",
    },
];

pub fn command_names() -> Vec<&'static str> {
    COMMANDS.iter().map(|spec| spec.name).collect()
}

/// Closest known command to `input`, if it is a plausible typo.
pub fn suggest(input: &str) -> Option<&'static str> {
    COMMANDS
        .iter()
        .map(|spec| (levenshtein(spec.name, input), spec.name))
        .min_by_key(|(distance, _)| *distance)
        .filter(|(distance, _)| *distance <= 3)
        .map(|(_, name)| name)
}

/// Asks the user before destructive actions.
pub trait Confirmer {
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

pub fn dispatch(
    session: &mut Session,
    output: &Output,
    confirmer: &mut dyn Confirmer,
    command: &str,
    args: &[&str],
) -> Result<LoopControl> {
    match command {
        "list" | "ls" => {
            output.semesters(session.semesters(), session.selected_semester());
        }
        "reload" => {
            let state = session.load()?;
            output.success(format!("Semesters reloaded ({state:?})."));
        }
        "select" => {
            let id = SemesterId::new(required(args, 0, "select <semester-id>")?);
            if session.select(&id)? == LoadOutcome::Applied {
                output.success(format!(
                    "Selected `{id}` with {} transaction(s).",
                    session.transactions().len()
                ));
            }
        }
        "create" => {
            let name = args.join(" ");
            let id = session.create(&name)?;
            output.success(format!("Created semester `{id}`."));
        }
        "delete" => delete_selected(session, output, confirmer)?,
        "summary" => update_summary(session, output, args)?,
        "stats" => match (session.selected_semester(), session.statistics()) {
            (Some(semester), Some(stats)) => output.statistics(semester, &stats),
            _ => output.warning("No semester selected."),
        },
        "transactions" => output.transactions(session.transactions()),
        "search" => output.transactions(session.search(&args.join(" "))),
        "categories" => output.categories(session.categories().iter()),
        "category" => manage_category(session, output, args)?,
        "recategorize" => {
            let txn = TransactionId::new(required(
                args,
                0,
                "recategorize <transaction-id> <category>",
            )?);
            let category = args[1..].join(" ");
            session.set_transaction_category(&txn, &category)?;
            output.success(format!("Moved `{txn}` to {category}."));
        }
        "help" => {
            output.section("Commands");
            for spec in COMMANDS {
                println!("  {:<58} {}", spec.usage, spec.summary);
            }
        }
        "exit" | "quit" => return Ok(LoopControl::Exit),
        unknown => {
            output.warning(format!(
                "Unknown command `{unknown}`. Type `help` to see available commands."
            ));
            if let Some(best) = suggest(unknown) {
                output.info(format!("Suggestion: `{best}`?"));
            }
        }
    }
    Ok(LoopControl::Continue)
}

fn required<'a>(args: &[&'a str], index: usize, usage: &str) -> Result<&'a str> {
    args.get(index)
        .copied()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| DashboardError::Validation(format!("usage: {usage}")))
}

fn delete_selected(
    session: &mut Session,
    output: &Output,
    confirmer: &mut dyn Confirmer,
) -> Result<()> {
    let Some(semester) = session.selected_semester() else {
        output.warning("No semester selected.");
        return Ok(());
    };
    let prompt = format!(
        "Are you sure you want to delete the semester \"{}\"? This action cannot be undone.",
        semester.name
    );
    if !confirmer.confirm(&prompt)? {
        output.info("Delete cancelled.");
        return Ok(());
    }

    let outcome = session.delete_selected()?;
    output.success(format!("Deleted semester `{}`.", outcome.deleted));
    match (&outcome.selected, &outcome.reload_error) {
        (Some(next), None) => output.info(format!("Now viewing `{next}`.")),
        (Some(next), Some(err)) => output.warning(format!(
            "Now viewing `{next}`, but its transactions could not be loaded: {err}"
        )),
        (None, _) => output.info("No Semesters Available"),
    }
    Ok(())
}

fn update_summary(session: &mut Session, output: &Output, args: &[&str]) -> Result<()> {
    const USAGE: &str = "summary <name|starting|current|house|insurance> <value>";
    let field = required(args, 0, USAGE)?;
    let raw = args.get(1..).map(|rest| rest.join(" ")).unwrap_or_default();
    let id = session
        .selected_id()
        .cloned()
        .ok_or_else(|| DashboardError::NotFound("no semester is selected".into()))?;

    let mut changes = SemesterUpdate::default();
    match field {
        "name" => changes.name = Some(raw),
        "starting" => changes.starting_capital = Some(parse_amount(&raw)?),
        "current" => changes.current_capital = Some(parse_amount(&raw)?),
        "insurance" => changes.insurance_cost = Some(parse_amount(&raw)?),
        "house" => {
            let size = raw.trim().parse::<u32>().map_err(|_| {
                DashboardError::Validation(format!("`{raw}` is not a house size"))
            })?;
            changes.active_house_size = Some(size);
        }
        other => {
            return Err(DashboardError::Validation(format!(
                "unknown summary field `{other}`; usage: {USAGE}"
            )))
        }
    }

    let semester = session.update_summary(&id, changes)?;
    output.success(format!("Updated summary of {}.", semester.name));
    Ok(())
}

fn parse_amount(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| DashboardError::Validation(format!("`{raw}` is not an amount")))
}

fn manage_category(session: &mut Session, output: &Output, args: &[&str]) -> Result<()> {
    const USAGE: &str = "category <add|remove> <name>";
    let action = required(args, 0, USAGE)?;
    let name = args.get(1..).map(|rest| rest.join(" ")).unwrap_or_default();
    match action {
        "add" => {
            if session.add_category(&name) {
                output.success(format!("Added category {name}."));
            } else {
                output.info(format!("Category `{name}` already exists or is blank."));
            }
        }
        "remove" | "rm" => {
            if session.remove_category(&name) {
                output.success(format!("Removed category {name}."));
            } else {
                output.info(format!("Category `{name}` cannot be removed."));
            }
        }
        other => {
            return Err(DashboardError::Validation(format!(
                "unknown category action `{other}`; usage: {USAGE}"
            )))
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_close_commands_only() {
        assert_eq!(suggest("stast"), Some("stats"));
        assert_eq!(suggest("selcet"), Some("select"));
        assert_eq!(suggest("xyzzyplugh"), None);
    }

    #[test]
    fn amounts_must_be_finite_numbers() {
        assert_eq!(parse_amount(" 12.5 ").unwrap(), 12.5);
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("inf").is_err());
    }

    #[test]
    fn required_rejects_missing_arguments() {
        let err = required(&[], 0, "select <semester-id>").unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: usage: select <semester-id>");
        assert_eq!(required(&["s1"], 0, "").unwrap(), "s1");
    }

    #[test]
    fn command_names_are_unique() {
        let mut names = command_names();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
