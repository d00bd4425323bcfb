use std::str::FromStr;

use crate::{
    api::CompareBackend,
    core::{controller::ComparatorController, form::FormState, notify::Notifier},
    error::{AppError, Result},
    models::comparison::SimilarityFunction,
    utils::render_results,
};

/// Help text for the interactive form
pub const HELP: &str = "\
Commands:
  target <text>        set the target text
  set <n> <text>       set compare field n (1-based)
  add [text]           append a compare field, optionally filled
  remove <n>           remove compare field n
  function <name>      cosine | euclidean
  submit               send the comparison
  show                 print the form and last results
  help                 print this help
  quit                 leave";

/// One user action on the comparator form.
///
/// Field numbers are 1-based as shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum FormCommand {
    /// Replace the target text
    Target(String),
    /// Replace compare field `n`
    Set(usize, String),
    /// Append a compare field
    Add(Option<String>),
    /// Remove compare field `n`
    Remove(usize),
    /// Select a scoring method
    Function(SimilarityFunction),
    /// Send the comparison
    Submit,
    /// Print the form
    Show,
    /// Print usage
    Help,
    /// End the session
    Quit,
}

/// What the front-end should do after a command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Print the text and keep reading commands
    Continue(String),
    /// Stop the session
    Quit,
}

fn field_number(raw: &str) -> Result<usize> {
    raw.parse::<usize>()
        .ok()
        .filter(|n| *n >= 1)
        .ok_or_else(|| AppError::Validation(format!("'{}' is not a field number", raw)))
}

fn to_index(n: usize) -> Result<usize> {
    n.checked_sub(1)
        .ok_or_else(|| AppError::Validation("field numbers start at 1".to_string()))
}

impl FromStr for FormCommand {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim_start()),
            None => (line, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "target" | "t" => Ok(Self::Target(rest.to_string())),
            "set" | "s" => {
                let (n, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Ok(Self::Set(field_number(n)?, text.trim_start().to_string()))
            }
            "add" | "a" => Ok(Self::Add(Some(rest.to_string()).filter(|t| !t.is_empty()))),
            "remove" | "rm" => Ok(Self::Remove(field_number(rest)?)),
            "function" | "fn" => Ok(Self::Function(rest.parse()?)),
            "submit" | "go" => Ok(Self::Submit),
            "show" | "ls" => Ok(Self::Show),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            "" => Err(AppError::Validation("empty command".to_string())),
            other => Err(AppError::Validation(format!(
                "unknown command '{}', type 'help'",
                other
            ))),
        }
    }
}

/// Render the editable part of the form
pub fn render_form(state: &FormState) -> String {
    let mut out = format!(
        "Target text: {}\nFunction:    {} ({})\nTexts to compare:\n",
        if state.target_text.is_empty() {
            "<empty>"
        } else {
            state.target_text.as_str()
        },
        state.function,
        state.function.label()
    );
    for (i, text) in state.compare_texts.as_slice().iter().enumerate() {
        out.push_str(&format!("  [{}] {}\n", i + 1, text));
    }
    out
}

/// Line to print before `command` is awaited, when it will reach the service
pub fn progress_notice(state: &FormState, command: &FormCommand) -> Option<&'static str> {
    match command {
        FormCommand::Submit if !state.is_submitting() && state.validate().is_ok() => {
            Some("sending…")
        }
        _ => None,
    }
}

/// Apply `command` to `controller`.
///
/// Edit errors are returned to the caller; submission failures have already
/// been notified by the controller when they come back here.
pub async fn apply<B, N>(
    controller: &mut ComparatorController<B, N>,
    command: FormCommand,
) -> Result<Reply>
where
    B: CompareBackend,
    N: Notifier,
{
    let reply = match command {
        FormCommand::Target(text) => {
            controller.update_target(text);
            Reply::Continue(String::new())
        }
        FormCommand::Set(n, text) => {
            controller.update_compare_at(to_index(n)?, text)?;
            Reply::Continue(String::new())
        }
        FormCommand::Add(text) => {
            controller.add_compare_field();
            let index = controller.compare_texts().len() - 1;
            if let Some(text) = text {
                controller.update_compare_at(index, text)?;
            }
            Reply::Continue(format!("added field [{}]", index + 1))
        }
        FormCommand::Remove(n) => {
            controller.remove_compare_field(to_index(n)?)?;
            Reply::Continue(render_form(controller.state()))
        }
        FormCommand::Function(function) => {
            controller.set_function(function);
            Reply::Continue(format!("function: {}", function.label()))
        }
        FormCommand::Submit => {
            let results = controller.submit().await?;
            if results.is_empty() {
                Reply::Continue("no results".to_string())
            } else {
                Reply::Continue(render_results(results))
            }
        }
        FormCommand::Show => {
            let mut out = render_form(controller.state());
            out.push_str(&render_results(controller.results()));
            Reply::Continue(out)
        }
        FormCommand::Help => Reply::Continue(HELP.to_string()),
        FormCommand::Quit => Reply::Quit,
    };
    Ok(reply)
}
