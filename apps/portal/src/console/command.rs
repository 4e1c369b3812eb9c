//! Console command grammar.

use crate::errors::{PortalError, PortalResult};
use crate::forms::FormFields;

pub const HELP: &str = "\
Commands:
  admin                         enter the placement officer dashboard
  student <id>                  log in as a student
  logout
  tab <name>                    switch tab (student: jobs, applications;
                                admin: students, companies, jobs, offers, applications, stats)
  apply <job_id>                apply for a job
  add-student k=v ...           roll_no name email department cgpa graduation_year
  update-student <id> k=v ...   any subset of the student fields
  delete-student <id>
  add-company k=v ...           company_name location package_lpa
  delete-company <id>
  add-job k=v ...               company_id role_name min_cgpa eligible_branches
  delete-job <id>
  offer k=v ...                 student_id job_id offer_status
  placements                    student-wise placement status
  refresh                       reload the current view
  help | quit
Quote values containing spaces: name=\"Asha Rao\"";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Admin,
    Student(String),
    Logout,
    Tab(String),
    Apply(i64),
    AddStudent(FormFields),
    UpdateStudent(i64, FormFields),
    DeleteStudent(i64),
    AddCompany(FormFields),
    DeleteCompany(i64),
    AddJob(FormFields),
    DeleteJob(i64),
    Offer(FormFields),
    Placements,
    Refresh,
    Help,
    Quit,
}

impl Command {
    /// Entity name for the confirmation prompt of destructive commands.
    pub fn confirmation_subject(&self) -> Option<&'static str> {
        match self {
            Command::DeleteStudent(_) => Some("student"),
            Command::DeleteCompany(_) => Some("company"),
            Command::DeleteJob(_) => Some("job"),
            _ => None,
        }
    }
}

/// Splits on whitespace, keeping double-quoted runs together and dropping the quotes.
pub fn tokenize(line: &str) -> PortalResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut started = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                started = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if started {
                    tokens.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            c => {
                current.push(c);
                started = true;
            }
        }
    }
    if in_quotes {
        return Err(PortalError::InvalidInput("Unterminated quote".to_string()));
    }
    if started {
        tokens.push(current);
    }
    Ok(tokens)
}

fn id_arg(command: &str, args: &[String]) -> PortalResult<i64> {
    let raw = args
        .first()
        .ok_or_else(|| PortalError::InvalidInput(format!("Usage: {command} <id>")))?;
    raw.parse()
        .map_err(|_| PortalError::InvalidInput(format!("{command}: \"{raw}\" is not a valid id")))
}

/// Parses one console line. Blank lines yield `None`.
pub fn parse(line: &str) -> PortalResult<Option<Command>> {
    let tokens = tokenize(line)?;
    let Some((head, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match head.to_lowercase().as_str() {
        "admin" => Command::Admin,
        "student" | "login" => Command::Student(args.first().cloned().unwrap_or_default()),
        "logout" => Command::Logout,
        "tab" => Command::Tab(
            args.first()
                .cloned()
                .ok_or_else(|| PortalError::InvalidInput("Usage: tab <name>".to_string()))?,
        ),
        "apply" => Command::Apply(id_arg("apply", args)?),
        "add-student" => Command::AddStudent(FormFields::parse(args)?),
        "update-student" => Command::UpdateStudent(
            id_arg("update-student", args)?,
            FormFields::parse(&args[1..])?,
        ),
        "delete-student" => Command::DeleteStudent(id_arg("delete-student", args)?),
        "add-company" => Command::AddCompany(FormFields::parse(args)?),
        "delete-company" => Command::DeleteCompany(id_arg("delete-company", args)?),
        "add-job" => Command::AddJob(FormFields::parse(args)?),
        "delete-job" => Command::DeleteJob(id_arg("delete-job", args)?),
        "offer" => Command::Offer(FormFields::parse(args)?),
        "placements" => Command::Placements,
        "refresh" => Command::Refresh,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => {
            return Err(PortalError::InvalidInput(format!(
                "Unknown command \"{other}\" (type `help`)"
            )))
        }
    };
    Ok(Some(command))
}
