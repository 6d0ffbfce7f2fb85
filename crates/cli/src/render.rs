//! Plain-text tables for the admin screens.

use ayura_core::models::{Category, LabTest, Order, Patient, Report, Testimonial};
use ayura_core::Summary;
use chrono::{DateTime, FixedOffset, Utc};

const EMPTY_CELL: &str = "-";

fn cell(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(EMPTY_CELL)
        .to_string()
}

fn date_cell(instant: Option<DateTime<Utc>>, offset: FixedOffset) -> String {
    instant
        .map(|at| at.with_timezone(&offset).format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| EMPTY_CELL.to_string())
}

fn money(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| EMPTY_CELL.to_string())
}

/// Lay out `rows` under `headers` with each column padded to its widest cell.
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, value) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(value.chars().count());
            }
        }
    }

    let line = |cells: &[&str]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(value, width)| format!("{value:<w$}", w = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(line(headers));
    out.push(line(&rule.iter().map(String::as_str).collect::<Vec<_>>()));
    for row in rows {
        out.push(line(&row.iter().map(String::as_str).collect::<Vec<_>>()));
    }
    out.join("\n")
}

fn print_table(headers: &[&str], rows: &[Vec<String>], noun: &str) {
    if rows.is_empty() {
        println!("No {noun} found.");
    } else {
        println!("{}", format_table(headers, rows));
    }
}

pub fn print_orders(rows: &[&Order], offset: FixedOffset) {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|o| {
            vec![
                o.id.clone(),
                cell(o.patient.name.as_deref()),
                cell(Some(o.test_names().as_str())),
                money(o.effective_amount()),
                cell(o.status.as_ref().map(|s| s.as_str())),
                cell(o.priority.as_ref().map(|p| p.as_str())),
                date_cell(o.created(), offset),
            ]
        })
        .collect();
    print_table(
        &["ID", "PATIENT", "TESTS", "AMOUNT", "STATUS", "PRIORITY", "CREATED"],
        &rows,
        "orders",
    );
}

pub fn print_reports(rows: &[&Report], offset: FixedOffset) {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.id.clone(),
                cell(r.patient_name.as_deref()),
                cell(r.test_type.as_deref()),
                cell(r.lab_name.as_deref()),
                cell(r.status.as_ref().map(|s| s.as_str())),
                cell(r.priority.as_ref().map(|p| p.as_str())),
                date_cell(r.effective_date(), offset),
                if r.has_upload() { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    print_table(
        &["ID", "PATIENT", "TEST", "LAB", "STATUS", "PRIORITY", "DATE", "FILE"],
        &rows,
        "reports",
    );
}

pub fn print_patients(rows: &[&Patient], offset: FixedOffset) {
    use ayura_core::Record;

    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|p| {
            vec![
                p.id.clone(),
                cell(p.name.as_deref()),
                cell(p.email.as_deref()),
                cell(p.phone.as_deref()),
                p.age.map(|a| a.to_string()).unwrap_or_else(|| EMPTY_CELL.to_string()),
                cell(p.gender.as_deref()),
                date_cell(p.timestamp(), offset),
            ]
        })
        .collect();
    print_table(
        &["ID", "NAME", "EMAIL", "PHONE", "AGE", "GENDER", "REGISTERED"],
        &rows,
        "patients",
    );
}

pub fn print_lab_tests(tests: &[LabTest]) {
    let rows: Vec<Vec<String>> = tests
        .iter()
        .map(|t| {
            vec![
                t.id.clone(),
                t.name.clone(),
                cell(t.category.as_deref()),
                money(t.price),
                money(t.selling_price()),
                cell(t.sample_type.as_deref()),
                if t.is_active { "active" } else { "inactive" }.to_string(),
            ]
        })
        .collect();
    print_table(
        &["ID", "NAME", "CATEGORY", "PRICE", "SELLING", "SAMPLE", "STATE"],
        &rows,
        "lab tests",
    );
}

pub fn print_categories(categories: &[Category]) {
    let rows: Vec<Vec<String>> = categories
        .iter()
        .map(|c| vec![c.id.clone(), c.name.clone(), cell(c.description.as_deref())])
        .collect();
    print_table(&["ID", "NAME", "DESCRIPTION"], &rows, "categories");
}

pub fn print_testimonials(testimonials: &[&Testimonial], offset: FixedOffset) {
    let rows: Vec<Vec<String>> = testimonials
        .iter()
        .map(|t| {
            vec![
                t.id.clone(),
                cell(t.name.as_deref()),
                t.stars(),
                if t.approved { "approved" } else { "pending" }.to_string(),
                date_cell(t.created(), offset),
                cell(t.message.as_deref()),
            ]
        })
        .collect();
    print_table(
        &["ID", "NAME", "RATING", "STATE", "DATE", "MESSAGE"],
        &rows,
        "testimonials",
    );
}

/// Summary block printed under a list, or on its own by `stats`.
///
/// # Arguments
///
/// * `summary` - Aggregates over the whole fetched list.
/// * `shown` - Number of rows left after filtering.
/// * `unique_label` - What the distinct group key counts, e.g. "patients".
/// * `with_files` - Whether the record kind carries an uploaded document.
pub fn format_summary(
    summary: &Summary,
    shown: Option<usize>,
    unique_label: &str,
    with_files: bool,
) -> String {
    let mut lines = Vec::new();
    match shown {
        Some(shown) => lines.push(format!("Showing {shown} of {}", summary.total)),
        None => lines.push(format!("Total: {}", summary.total)),
    }
    lines.push(format!("This month: {}", summary.this_month));
    lines.push(format!("Unique {unique_label}: {}", summary.unique));
    if with_files {
        lines.push(format!(
            "With file: {} (missing {})",
            summary.with_attachment,
            summary.without_attachment()
        ));
    }
    if summary.amount_total > 0.0 {
        lines.push(format!("Amount: {:.2}", summary.amount_total));
    }
    if !summary.by_status.is_empty() {
        let breakdown: Vec<String> = summary
            .by_status
            .iter()
            .map(|(status, count)| format!("{status}={count}"))
            .collect();
        lines.push(format!("By status: {}", breakdown.join(", ")));
    }
    lines.join("\n")
}
