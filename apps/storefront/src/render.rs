//! Plain-text rendering of the storefront page sections.

use std::fmt::Write as _;

use client_core::FetchState;
use shared::domain::MenuItem;

pub const BRAND: &str = "Aurora Cafe";

pub fn header() -> String {
    format!(
        "{BRAND}  |  Menu  |  Reservasi\n\nKopi istimewa, suasana nyaman.\nTempat yang tenang untuk menikmati kopi terbaik dan pastry segar setiap hari.\n"
    )
}

pub fn footer(year: i32) -> String {
    format!("(c) {year} {BRAND}  |  Menu  |  Reservasi\n")
}

/// Category chips with the selected one bracketed.
pub fn category_bar(categories: &[String], selected: &str) -> String {
    categories
        .iter()
        .map(|category| {
            if category == selected {
                format!("[{category}]")
            } else {
                category.clone()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn menu_section(
    state: &FetchState<MenuItem>,
    categories: &[String],
    selected: &str,
    visible: &[MenuItem],
) -> String {
    let mut out = String::from("== Menu ==\n");
    if let Some(notice) = state.notice() {
        let _ = writeln!(out, "! {notice}");
    }
    let _ = writeln!(out, "{}\n", category_bar(categories, selected));

    if state.is_loading() {
        out.push_str("Memuat menu...\n");
        return out;
    }
    if visible.is_empty() {
        out.push_str("Tidak ada item di kategori ini.\n");
        return out;
    }

    for item in visible {
        let _ = write!(out, "- {}  {}", item.name, item.display_price());
        if item.is_featured {
            out.push_str("  (Unggulan)");
        }
        out.push('\n');
        if !item.description.is_empty() {
            let _ = writeln!(out, "  {}", item.description);
        }
    }
    out
}
