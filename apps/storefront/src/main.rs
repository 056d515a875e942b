use std::{process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, HttpRemoteApi, MenuListController, RemoteApi, ReservationFormController,
    SubmissionState,
};
use shared::domain::{DraftField, ALL_CATEGORIES, DEFAULT_GUESTS, GUESTS_MAX, GUESTS_MIN};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "storefront", about = "Aurora Cafe storefront in the terminal")]
struct Cli {
    /// Overrides BACKEND_URL and storefront.toml.
    #[arg(long)]
    backend_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the menu, optionally narrowed to one category.
    Menu {
        #[arg(long, default_value = ALL_CATEGORIES)]
        category: String,
    },
    /// Book a table.
    Reserve {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(
            long,
            default_value_t = DEFAULT_GUESTS,
            value_parser = clap::value_parser!(u32).range(i64::from(GUESTS_MIN)..=i64::from(GUESTS_MAX))
        )]
        guests: u32,
        /// YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        /// HH:MM
        #[arg(long, value_parser = parse_time)]
        time: NaiveTime,
        #[arg(long, default_value = "")]
        notes: String,
    },
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|err| format!("expected HH:MM: {err}"))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(backend_url) = cli.backend_url {
        settings.backend_url = backend_url;
    }
    let api: Arc<dyn RemoteApi> = Arc::new(
        HttpRemoteApi::from_settings(&settings).context("failed to configure backend client")?,
    );
    info!(backend_url = %settings.backend_url, schema = %settings.reservation_schema, "storefront starting");

    let page = CancellationToken::new();
    tokio::spawn({
        let page = page.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                page.cancel();
            }
        }
    });

    match cli.command {
        Command::Menu { category } => show_menu(api, &page, category).await,
        Command::Reserve {
            name,
            phone,
            email,
            guests,
            date,
            time,
            notes,
        } => {
            let form = ReservationFormController::with_lifecycle(api, page.child_token());
            form.set_field(DraftField::FullName, &name);
            form.set_field(DraftField::Phone, &phone);
            form.set_field(DraftField::Email, email.as_deref().unwrap_or_default());
            form.set_field(DraftField::Guests, &guests.to_string());
            form.set_field(DraftField::Date, &date.format("%Y-%m-%d").to_string());
            form.set_field(DraftField::Time, &time.format("%H:%M").to_string());
            form.set_field(DraftField::Notes, &notes);
            submit_reservation(&form, &page).await
        }
    }
}

async fn show_menu(
    api: Arc<dyn RemoteApi>,
    page: &CancellationToken,
    category: String,
) -> Result<ExitCode> {
    let menu = MenuListController::with_lifecycle(api, page.child_token());
    menu.select_category(category).await;
    let state = menu.load().await;
    if page.is_cancelled() {
        return Ok(ExitCode::from(130));
    }

    let categories = menu.categories().await;
    let selected = menu.selected_category().await;
    let visible = menu.visible_items().await;

    print!("{}", render::header());
    println!();
    print!(
        "{}",
        render::menu_section(&state, &categories, &selected, &visible)
    );
    println!();
    print!("{}", render::footer(Local::now().year()));
    Ok(ExitCode::SUCCESS)
}

async fn submit_reservation(
    form: &ReservationFormController,
    page: &CancellationToken,
) -> Result<ExitCode> {
    let missing = form.missing_fields();
    if !missing.is_empty() {
        let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
        eprintln!("Lengkapi kolom wajib: {}", names.join(", "));
        return Ok(ExitCode::from(2));
    }

    println!("== Reservasi Meja ==");
    let state = form.submit().await;
    if page.is_cancelled() {
        return Ok(ExitCode::from(130));
    }

    if let Some(message) = state.message() {
        println!("{message}");
    }
    Ok(match state {
        SubmissionState::Succeeded => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}
