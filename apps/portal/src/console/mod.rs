//! Interactive console: reads commands from stdin, drives the session and
//! re-renders whenever a command finishes or a background load lands.

pub mod command;

use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use crate::render::render;
use crate::session::{Loaded, Portal};
use command::{Command, HELP};

/// Role to enter before the first prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Startup {
    Login,
    Student(i64),
    Admin,
}

enum Input {
    Line(Option<String>),
    Loaded(Loaded),
}

/// Runs one command against the session.
pub async fn execute(portal: &mut Portal, command: Command, confirmed: bool) {
    match command {
        Command::Admin => portal.login_admin(),
        Command::Student(id) => portal.login_student(&id).await,
        Command::Logout => portal.logout(),
        Command::Tab(name) => portal.select_tab(&name),
        Command::Apply(job_id) => portal.apply(job_id).await,
        Command::AddStudent(form) => portal.create_student(&form).await,
        Command::UpdateStudent(id, form) => portal.update_student(id, &form).await,
        Command::DeleteStudent(id) => portal.delete_student(id, confirmed).await,
        Command::AddCompany(form) => portal.create_company(&form).await,
        Command::DeleteCompany(id) => portal.delete_company(id, confirmed).await,
        Command::AddJob(form) => portal.create_job(&form).await,
        Command::DeleteJob(id) => portal.delete_job(id, confirmed).await,
        Command::Offer(form) => portal.create_offer(&form).await,
        Command::Placements => portal.load_student_placements().await,
        Command::Refresh => portal.refresh(),
        // handled by the loop
        Command::Help | Command::Quit => {}
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn show(portal: &Portal) {
    println!("\n{}", render(portal));
    print!("> ");
    std::io::stdout().flush().ok();
}

async fn confirm(lines: &mut Lines<BufReader<Stdin>>, subject: &str) -> Result<bool> {
    print!("Delete this {subject}? [y/N] ");
    std::io::stdout().flush().ok();
    Ok(lines.next_line().await?.as_deref().is_some_and(is_yes))
}

pub async fn run(
    mut portal: Portal,
    mut events: UnboundedReceiver<Loaded>,
    startup: Startup,
) -> Result<()> {
    match startup {
        Startup::Login => {}
        Startup::Student(id) => portal.login_student(&id.to_string()).await,
        Startup::Admin => portal.login_admin(),
    }
    portal.settle(&mut events).await;
    show(&portal);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let input = tokio::select! {
            line = lines.next_line() => Input::Line(line?),
            Some(loaded) = events.recv() => Input::Loaded(loaded),
        };

        match input {
            Input::Line(None) => break,
            Input::Line(Some(line)) => match command::parse(&line) {
                Ok(None) => {}
                Ok(Some(Command::Quit)) => break,
                Ok(Some(Command::Help)) => println!("{HELP}"),
                Ok(Some(cmd)) => {
                    let confirmed = match cmd.confirmation_subject() {
                        Some(subject) => confirm(&mut lines, subject).await?,
                        None => true,
                    };
                    execute(&mut portal, cmd, confirmed).await;
                }
                Err(e) => portal.report(&e),
            },
            Input::Loaded(loaded) => {
                debug!(kind = ?loaded.kind(), pending = portal.pending(), "Background load finished");
                portal.handle(loaded);
            }
        }
        show(&portal);
    }

    println!();
    Ok(())
}
