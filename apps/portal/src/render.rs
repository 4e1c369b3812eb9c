//! Text rendering of the login screen and both dashboards.

use crate::models::{format_date, format_lpa, Application};
use crate::session::{AdminTab, AdminView, Portal, Role, StudentTab, StudentView};

const TITLE: &str = "Smart College Placement System";

pub fn render(portal: &Portal) -> String {
    let lines = match portal.role() {
        Role::Unauthenticated => render_login(portal.message(), portal.is_loading()),
        Role::Student(view) => render_student(view, portal.student_tab(), portal.message(), portal.is_loading()),
        Role::Admin(view) => render_admin(view, portal.message()),
    };
    lines.join("\n")
}

pub fn render_login(message: Option<&str>, loading: bool) -> Vec<String> {
    let mut lines = vec![
        TITLE.to_string(),
        "Select User Type".to_string(),
        String::new(),
        "  admin           Login as Placement Officer (Admin)".to_string(),
        format!(
            "  student <id>    {}",
            if loading { "Loading..." } else { "Login as Student" }
        ),
    ];
    if let Some(message) = message {
        lines.push(String::new());
        lines.push(format!("! {message}"));
    }
    lines
}

fn tab_bar<'a>(tabs: impl Iterator<Item = (&'a str, bool)>) -> String {
    tabs.map(|(label, active)| {
        if active {
            format!("[{label}]")
        } else {
            format!(" {label} ")
        }
    })
    .collect::<Vec<_>>()
    .join(" ")
}

fn push_message(lines: &mut Vec<String>, message: Option<&str>) {
    if let Some(message) = message {
        lines.push(format!("> {message}"));
    }
}

fn status_badge(app: &Application) -> String {
    format!("{} [{}]", app.status, app.status.css_class())
}

pub fn render_student(
    view: &StudentView,
    tab: StudentTab,
    message: Option<&str>,
    loading: bool,
) -> Vec<String> {
    let student = &view.student;
    let mut lines = vec![
        TITLE.to_string(),
        format!(
            "{} | CGPA: {} | {}    (logout)",
            student.name, student.cgpa, student.department
        ),
        tab_bar(StudentTab::ALL.iter().map(|t| (t.label(), *t == tab))),
    ];
    push_message(&mut lines, message);
    lines.push(String::new());

    match tab {
        StudentTab::Jobs => {
            lines.push("Available Jobs".to_string());
            if view.jobs.is_empty() {
                lines.push("No jobs available".to_string());
            }
            for job in &view.jobs {
                let control = view.apply_control(job, loading);
                lines.push(format!("#{} {}", job.job_id, job.role_name));
                lines.push(format!("    Company:  {}", job.company_name));
                lines.push(format!("    Location: {}", job.location));
                lines.push(format!("    Package:  {}", format_lpa(job.package_lpa)));
                lines.push(format!("    Min CGPA: {}", job.min_cgpa));
                lines.push(format!("    Eligible: {}", job.eligible_branches));
                lines.push(if control.enabled {
                    format!("    [{}]  apply {}", control.label, job.job_id)
                } else {
                    format!("    ({})", control.label)
                });
            }
        }
        StudentTab::Applications => {
            lines.push("My Applications".to_string());
            if view.applications.is_empty() {
                lines.push("No applications yet".to_string());
            }
            for app in &view.applications {
                lines.push(app.role_name.clone());
                lines.push(format!("    Company: {}", app.company_name));
                lines.push(format!("    Package: {}", format_lpa(app.package_lpa)));
                lines.push(format!("    Applied: {}", format_date(&app.applied_date)));
                lines.push(format!("    Status:  {}", status_badge(app)));
            }
        }
    }
    lines
}

/// Left-aligned table with columns sized to their widest cell.
fn table(headers: &[&str], rows: Vec<Vec<String>>) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let format_row = |cells: Vec<String>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_row(headers.iter().map(|h| h.to_string()).collect())];
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    lines.extend(rows.into_iter().map(format_row));
    lines
}

pub fn render_admin(view: &AdminView, message: Option<&str>) -> Vec<String> {
    let mut lines = vec![
        "Placement Officer Dashboard    (logout)".to_string(),
        tab_bar(AdminTab::ALL.iter().map(|t| (t.label(), *t == view.tab))),
    ];
    push_message(&mut lines, message);
    lines.push(String::new());

    match view.tab {
        AdminTab::Students => {
            lines.push("Add Student: add-student roll_no= name= email= department= cgpa= graduation_year=".to_string());
            lines.push(String::new());
            lines.push("All Students".to_string());
            lines.extend(table(
                &["ID", "Roll No", "Name", "Email", "Dept", "CGPA", "Year"],
                view.students
                    .iter()
                    .map(|s| {
                        vec![
                            s.student_id.to_string(),
                            s.roll_no.clone(),
                            s.name.clone(),
                            s.email.clone(),
                            s.department.clone(),
                            s.cgpa.to_string(),
                            s.graduation_year.map(|y| y.to_string()).unwrap_or_default(),
                        ]
                    })
                    .collect(),
            ));
        }
        AdminTab::Companies => {
            lines.push("Add Company: add-company company_name= location= package_lpa=".to_string());
            lines.push(String::new());
            lines.push("All Companies".to_string());
            for c in &view.companies {
                lines.push(format!("#{} {}", c.company_id, c.company_name));
                lines.push(format!("    Location: {}", c.location));
                lines.push(format!("    Package:  {}", format_lpa(c.package_lpa)));
            }
        }
        AdminTab::Jobs => {
            lines.push("Add Job Role: add-job company_id= role_name= min_cgpa= eligible_branches=".to_string());
            lines.push(String::new());
            lines.push("Companies".to_string());
            for c in &view.companies {
                lines.push(format!("  {:>4}  {}", c.company_id, c.company_name));
            }
        }
        AdminTab::Offers => {
            lines.push("Create Offer: offer student_id= job_id= offer_status=ACCEPTED|PENDING|REJECTED".to_string());
            lines.push("Creating an offer auto-updates the application status.".to_string());
        }
        AdminTab::Applications => {
            lines.push("All Applications".to_string());
            lines.extend(table(
                &["Student", "Company", "Role", "Applied Date", "Status"],
                view.applications
                    .iter()
                    .map(|a| {
                        vec![
                            a.student_name.clone().unwrap_or_default(),
                            a.company_name.clone(),
                            a.role_name.clone(),
                            format_date(&a.applied_date),
                            status_badge(a),
                        ]
                    })
                    .collect(),
            ));
        }
        AdminTab::Stats => {
            lines.push("Company-wise Placement Statistics".to_string());
            lines.extend(table(
                &["Company", "Total Offers"],
                view.stats
                    .iter()
                    .map(|s| vec![s.company_name.clone(), s.total_offers.to_string()])
                    .collect(),
            ));
            lines.push(String::new());
            match &view.placements {
                None => lines.push("Student-wise placement status: run `placements`".to_string()),
                Some(rows) => {
                    lines.push("Student-wise Placement Status".to_string());
                    let mut columns: Vec<&str> = Vec::new();
                    for row in rows {
                        for key in row.fields.keys() {
                            if !columns.contains(&key.as_str()) {
                                columns.push(key);
                            }
                        }
                    }
                    lines.extend(table(
                        &columns,
                        rows.iter()
                            .map(|row| columns.iter().map(|c| row.cell(c)).collect())
                            .collect(),
                    ));
                }
            }
        }
    }
    lines
}
