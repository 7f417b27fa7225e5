//! Terminal rendering of the list view and stdin-backed dialogs.

use std::{
    io::{self, BufRead, Write},
    sync::{Mutex, PoisonError},
};

use async_trait::async_trait;
use client_core::hire_date;
use shared::domain::{Employee, EmployeeDraft};
use tracing::error;

use crate::controller::dialogs::{DialogOutcome, EmployeeDialogs};

pub struct Prompter {
    input: Box<dyn BufRead + Send>,
    output: Box<dyn Write + Send>,
}

impl Prompter {
    pub fn new(input: Box<dyn BufRead + Send>, output: Box<dyn Write + Send>) -> Self {
        Self { input, output }
    }

    pub fn stdio() -> Self {
        Self::new(Box::new(io::BufReader::new(io::stdin())), Box::new(io::stderr()))
    }

    /// Reads one answer. An empty answer keeps `current`; `None` means end of input.
    pub fn ask(&mut self, label: &str, current: Option<&str>) -> io::Result<Option<String>> {
        match current.filter(|c| !c.is_empty()) {
            Some(current) => write!(self.output, "{label} [{current}]: ")?,
            None => write!(self.output, "{label}: ")?,
        }
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let answer = line.trim_end_matches(&['\r', '\n'][..]);
        if answer.is_empty() {
            Ok(Some(current.unwrap_or_default().to_string()))
        } else {
            Ok(Some(answer.to_string()))
        }
    }

    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.ask(&format!("{question} [y/N]"), None)?;
        Ok(matches!(
            answer.as_deref().map(str::trim).map(str::to_ascii_lowercase).as_deref(),
            Some("y" | "yes")
        ))
    }

    pub fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }
}

fn form_fields(draft: &mut EmployeeDraft) -> [(&'static str, &mut String); 7] {
    [
        ("First name", &mut draft.first_name),
        ("Last name", &mut draft.last_name),
        ("Email", &mut draft.email),
        ("Phone", &mut draft.phone),
        ("Position", &mut draft.position),
        ("Department", &mut draft.department),
        ("Hire date (YYYY-MM-DD)", &mut draft.hire_date),
    ]
}

fn form_problems(draft: &EmployeeDraft) -> Vec<String> {
    let mut problems: Vec<String> = match draft.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => errors.iter().map(ToString::to_string).collect(),
    };
    if !draft.hire_date.trim().is_empty() {
        if let Err(err) = hire_date::to_iso_instant(&draft.hire_date) {
            problems.push(err.to_string());
        }
    }
    problems
}

/// Field-by-field employee form and y/N confirmations on the terminal.
pub struct TerminalDialogs {
    prompter: Mutex<Prompter>,
    assume_yes: bool,
}

impl TerminalDialogs {
    pub fn new(prompter: Prompter, assume_yes: bool) -> Self {
        Self {
            prompter: Mutex::new(prompter),
            assume_yes,
        }
    }

    fn fill_form(&self, title: &str, initial: EmployeeDraft) -> io::Result<DialogOutcome<EmployeeDraft>> {
        let mut prompter = self.prompter.lock().unwrap_or_else(PoisonError::into_inner);
        let mut draft = initial;
        prompter.say(title)?;

        loop {
            for (label, value) in form_fields(&mut draft) {
                match prompter.ask(label, Some(value.as_str()))? {
                    Some(answer) => *value = answer,
                    None => return Ok(DialogOutcome::Cancelled),
                }
            }

            let problems = form_problems(&draft);
            if problems.is_empty() {
                break;
            }
            for problem in &problems {
                prompter.say(&format!("  - {problem}"))?;
            }
            if !prompter.confirm("Fix the form?")? {
                return Ok(DialogOutcome::Cancelled);
            }
        }

        if self.assume_yes || prompter.confirm("Save employee?")? {
            Ok(DialogOutcome::Confirmed(draft))
        } else {
            Ok(DialogOutcome::Cancelled)
        }
    }

    fn confirm_sync(&self, question: &str) -> io::Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        self.prompter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .confirm(question)
    }
}

fn cancel_on_io_error<T>(result: io::Result<DialogOutcome<T>>) -> DialogOutcome<T> {
    result.unwrap_or_else(|err| {
        error!("dialog input failed: {err}");
        DialogOutcome::Cancelled
    })
}

#[async_trait]
impl EmployeeDialogs for TerminalDialogs {
    async fn open_create(&self) -> DialogOutcome<EmployeeDraft> {
        cancel_on_io_error(self.fill_form("New employee", EmployeeDraft::default()))
    }

    async fn open_edit(&self, initial: EmployeeDraft) -> DialogOutcome<EmployeeDraft> {
        cancel_on_io_error(self.fill_form("Edit employee (Enter keeps the current value)", initial))
    }

    async fn confirm_delete(&self, employee: &Employee) -> DialogOutcome<()> {
        let question = format!(
            "Are you sure you want to delete {} ({})?",
            employee.full_name(),
            employee.id
        );
        cancel_on_io_error(self.confirm_sync(&question).map(|confirmed| {
            if confirmed {
                DialogOutcome::Confirmed(())
            } else {
                DialogOutcome::Cancelled
            }
        }))
    }
}

fn display_hire_date(raw: &str) -> String {
    hire_date::to_calendar_date(raw).unwrap_or_else(|_| raw.to_string())
}

const COLUMNS: [&str; 8] = [
    "ID",
    "First name",
    "Last name",
    "Email",
    "Phone",
    "Position",
    "Department",
    "Hire date",
];

fn row(employee: &Employee) -> [String; 8] {
    [
        employee.id.to_string(),
        employee.first_name.clone(),
        employee.last_name.clone(),
        employee.email.clone(),
        employee.phone.clone(),
        employee.position.clone(),
        employee.department.clone(),
        display_hire_date(&employee.hire_date),
    ]
}

pub fn render_table(employees: &[Employee]) -> String {
    if employees.is_empty() {
        return "No employees match.\n".to_string();
    }

    let rows: Vec<[String; 8]> = employees.iter().map(row).collect();
    let mut widths = COLUMNS.map(|c| c.chars().count());
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: &[&str]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = format_line(&COLUMNS);
    for cells in &rows {
        let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
        out.push_str(&format_line(&cells));
    }
    out
}

pub fn render_employee(employee: &Employee) -> String {
    COLUMNS
        .iter()
        .zip(row(employee))
        .map(|(label, value)| format!("{label:>10}: {value}\n"))
        .collect()
}

#[cfg(test)]
#[path = "tests/terminal_tests.rs"]
mod tests;
