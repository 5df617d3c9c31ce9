use std::fmt::Write as _;

use employee_client::EmployeeStats;
use shared::domain::{Employee, Gender};

const DOB_FORMAT: &str = "%d %b %Y";

pub fn employee_card(employee: &Employee) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Employee Details");
    let _ = writeln!(out, "================");
    let photo = if employee.has_profile_image() {
        "attached"
    } else {
        "none"
    };
    let rows = [
        ("Employee ID", format!("#{}", employee.id)),
        ("Full Name", employee.full_name.clone()),
        ("Gender", employee.gender.to_string()),
        (
            "Date of Birth",
            employee.date_of_birth.format(DOB_FORMAT).to_string(),
        ),
        ("State", employee.state.clone()),
        ("Status", employee.status_label().to_string()),
        ("Photo", photo.to_string()),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "{:<15}{value}", format!("{label}:"));
    }
    out
}

pub fn employee_list(employees: &[&Employee]) -> String {
    let headers = ["ID", "Full Name", "Gender", "DOB", "State", "Status"];
    let rows: Vec<[String; 6]> = employees
        .iter()
        .map(|e| {
            [
                format!("#{}", e.id),
                e.full_name.clone(),
                e.gender.to_string(),
                e.date_of_birth.format(DOB_FORMAT).to_string(),
                e.state.clone(),
                e.status_label().to_string(),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "Employee List");
    let _ = writeln!(out, "Total: {} employees", employees.len());
    write_row(&mut out, &headers.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for row in &rows {
        write_row(&mut out, row, &widths);
    }
    out
}

pub fn summary_lines(employees: &[&Employee], total: usize) -> String {
    let mut out = String::new();
    for e in employees {
        let _ = writeln!(
            out,
            "#{:<5} {} ({}, {}) - {}",
            e.id, e.full_name, e.gender, e.state, e.status_label()
        );
    }
    let _ = writeln!(out, "Showing {} of {total} employees", employees.len());
    out
}

fn write_row(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}

pub fn dashboard(stats: &EmployeeStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total Employees:    {}", stats.total);
    let _ = writeln!(
        out,
        "Active Employees:   {} ({:.0}%)",
        stats.active,
        stats.active_percentage()
    );
    let _ = writeln!(
        out,
        "Inactive Employees: {} ({:.0}%)",
        stats.inactive,
        stats.inactive_percentage()
    );
    let _ = writeln!(out, "States Covered:     {}", stats.states_covered);
    let _ = writeln!(out);
    let _ = writeln!(out, "Gender Distribution");
    for gender in Gender::ALL {
        let _ = writeln!(
            out,
            "  {:<8}{:>4}  {:>5.1}%",
            gender.as_str(),
            stats.gender_count(gender),
            stats.gender_percentage(gender)
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Top States");
    if stats.top_states.is_empty() {
        let _ = writeln!(out, "  No data available");
    }
    for (rank, entry) in stats.top_states.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {} - {} ({:.0}%)",
            rank + 1,
            entry.state,
            entry.count,
            stats.state_percentage(entry)
        );
    }
    out
}

pub fn stats_json(stats: &EmployeeStats) -> serde_json::Result<String> {
    serde_json::to_string_pretty(stats)
}

/// Message shown instead of a table when nothing is visible, if any.
pub fn empty_state(total: usize, visible: usize) -> Option<&'static str> {
    match (total, visible) {
        (0, _) => Some("No employees yet. Get started by adding your first employee."),
        (_, 0) => Some("No results found. Try adjusting your search or filter criteria."),
        _ => None,
    }
}
