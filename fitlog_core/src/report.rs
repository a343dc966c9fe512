//! Fixed-page report layout engine.
//!
//! Lays out a title, an optional two-line user-info block, and one
//! table covering every ledger entry. Pagination is a single look-ahead
//! decision: the table's estimated height is checked once against the
//! space left on the start page, and on overflow the whole table moves
//! to a continuation page. The table is never split row-by-row, so a
//! very large ledger can run past the bottom of the continuation page;
//! that is accepted behavior.

use crate::pdf::{self, Page};
use crate::{UserProfile, WorkoutLedger};

pub const TITLE: &str = "ACEest Fitness Workout Report";

// Page geometry, in points from the bottom-left origin.
pub const MARGIN_X: f64 = 54.0;
pub const TITLE_Y: f64 = 760.0;
pub const CONTINUED_TITLE_Y: f64 = 760.0;
pub const LINE_HEIGHT: f64 = 16.0;
pub const SECTION_GAP: f64 = 24.0;
pub const ROW_HEIGHT: f64 = 18.0;
pub const BOTTOM_MARGIN: f64 = 50.0;

const TITLE_SIZE: f64 = 16.0;
const CONTINUED_TITLE_SIZE: f64 = 14.0;
const USER_LINE_SIZE: f64 = 11.0;
const HEADER_SIZE: f64 = 11.0;
const ROW_SIZE: f64 = 10.0;

/// Column left edges for {category, exercise, duration, calories, date}.
const COL_X: [f64; 5] = [54.0, 140.0, 330.0, 410.0, 490.0];

const TABLE_HEADER: [&str; 5] = ["Category", "Exercise", "Duration (min)", "Calories", "Date"];

/// Render the full report as a PDF byte stream.
///
/// The user-info block is omitted when no profile exists; requiring a
/// profile for a personalized report is the caller's precondition.
pub fn render_report(ledger: &WorkoutLedger, user: Option<&UserProfile>) -> Vec<u8> {
    pdf::write_pdf(&layout_pages(ledger, user))
}

/// Compute the page layout without serializing it.
pub fn layout_pages(ledger: &WorkoutLedger, user: Option<&UserProfile>) -> Vec<Page> {
    let mut pages = Vec::new();
    let mut page = Page::new();
    page.text(MARGIN_X, TITLE_Y, TITLE_SIZE, TITLE);

    let lines = user_lines(user);
    for (i, line) in lines.iter().enumerate() {
        let y = TITLE_Y - LINE_HEIGHT * (i as f64 + 1.0);
        page.text(MARGIN_X, y, USER_LINE_SIZE, line.clone());
    }
    let mut y_cursor = TITLE_Y - LINE_HEIGHT * lines.len() as f64 - SECTION_GAP;

    let rows = table_rows(ledger);
    let table_height = ROW_HEIGHT * (rows.len() as f64 + 1.0);

    // Single look-ahead fit check. The table is placed as one atomic
    // block: either here, or wholesale on a continuation page.
    if y_cursor - BOTTOM_MARGIN < table_height {
        pages.push(page);
        page = Page::new();
        page.text(
            MARGIN_X,
            CONTINUED_TITLE_Y,
            CONTINUED_TITLE_SIZE,
            format!("{} (continued)", TITLE),
        );
        y_cursor = CONTINUED_TITLE_Y - LINE_HEIGHT - SECTION_GAP;
    }

    emit_row(&mut page, y_cursor, HEADER_SIZE, &TABLE_HEADER);
    for row in &rows {
        y_cursor -= ROW_HEIGHT;
        emit_row(&mut page, y_cursor, ROW_SIZE, row);
    }

    pages.push(page);
    pages
}

fn user_lines(user: Option<&UserProfile>) -> Vec<String> {
    match user {
        None => Vec::new(),
        Some(profile) => vec![
            format!("Name: {}   Regn ID: {}", profile.name, profile.regn_id),
            format!(
                "Age {} | {} | {} cm | {} kg | BMI {} | BMR {}",
                profile.age,
                profile.gender,
                profile.height_cm,
                profile.weight_kg,
                profile.bmi,
                profile.bmr
            ),
        ],
    }
}

/// Rows in ledger iteration order: default category order, dynamic
/// categories in creation order, chronological within each bucket.
fn table_rows(ledger: &WorkoutLedger) -> Vec<[String; 5]> {
    let mut rows = Vec::with_capacity(ledger.entry_count());
    for (category, entries) in ledger.iter() {
        for entry in entries {
            rows.push([
                category.to_string(),
                entry.exercise.clone(),
                entry.duration_minutes.to_string(),
                format!("{:.1}", entry.calories),
                entry.date.to_string(),
            ]);
        }
    }
    rows
}

fn emit_row<S: AsRef<str>>(page: &mut Page, y: f64, size: f64, cells: &[S; 5]) {
    for (x, cell) in COL_X.iter().zip(cells.iter()) {
        page.text(*x, y, size, cell.as_ref().to_string());
    }
}
