use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    view::{render_bills_view, render_new_bill_view},
    BillGateway, BillsListController, ChannelNavigator, FileStorage, HttpBillGateway,
    InMemoryBillGateway, LocalSessionStore, MountedView, NewBillForm, PreviewPort, ReceiptFile,
    Route, Router, Services, SessionStore,
};
use shared::domain::{ExpenseType, Role, Session};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, StoreKind};

#[derive(Parser, Debug)]
#[command(name = "billed", about = "Employee expense bills")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store the session record a login would produce.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "Employee")]
        role: String,
    },
    Logout,
    /// Show the bill list, most recent first.
    Bills,
    /// Open the receipt of one bill.
    Preview { bill_id: String },
    /// Create a bill with a receipt image.
    NewBill {
        #[arg(long = "type")]
        expense_type: ExpenseType,
        #[arg(long)]
        name: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        vat: f64,
        #[arg(long)]
        pct: Option<u8>,
        #[arg(long)]
        commentary: Option<String>,
        #[arg(long)]
        file: PathBuf,
    },
}

struct PrintPreview;

impl PreviewPort for PrintPreview {
    fn show(&self, asset_url: &str) {
        println!("receipt: {asset_url}");
    }
}

fn parse_role(raw: &str) -> Role {
    match raw {
        "Employee" | "employee" => Role::Employee,
        "Admin" | "admin" => Role::Admin,
        _ => Role::Unknown,
    }
}

async fn open_bill_list(router: &Router) -> Result<Arc<BillsListController>> {
    match router.navigate(Route::Bills.token()).view {
        MountedView::Bills(list) => {
            list.load().await;
            Ok(list)
        }
        _ => bail!("not signed in as an employee; run `billed login --email <email>` first"),
    }
}

async fn follow_navigation(router: &Router, rx: &mut UnboundedReceiver<Route>) -> Result<()> {
    while let Ok(route) = rx.try_recv() {
        if route == Route::Bills {
            let list = open_bill_list(router).await?;
            println!("{}", render_bills_view(&list.view().await));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let cli = Cli::parse();
    let settings = load_settings()?;
    tracing::debug!(?settings, "loaded settings");

    let storage = FileStorage::open(&settings.session_dir).with_context(|| {
        format!(
            "failed to open session directory '{}'",
            settings.session_dir.display()
        )
    })?;
    let sessions = Arc::new(LocalSessionStore::new(storage));
    let gateway: Arc<dyn BillGateway> = match settings.store {
        StoreKind::Http => Arc::new(
            HttpBillGateway::new(&settings.api_url)
                .with_context(|| format!("invalid api url '{}'", settings.api_url))?,
        ),
        StoreKind::Memory => Arc::new(InMemoryBillGateway::seeded()),
    };
    let (navigator, mut navigation_rx) = ChannelNavigator::channel();
    let router = Router::new(Services {
        gateway,
        sessions: sessions.clone(),
        navigation: Arc::new(navigator),
        preview: Arc::new(PrintPreview),
    });

    match cli.command {
        Command::Login { email, role } => {
            sessions.set(&Session {
                role: parse_role(&role),
                email: Some(email.clone()),
            })?;
            println!("signed in as {email}");
        }
        Command::Logout => {
            sessions.clear()?;
            println!("signed out");
        }
        Command::Bills => {
            let list = open_bill_list(&router).await?;
            println!("{}", render_bills_view(&list.view().await));
        }
        Command::Preview { bill_id } => {
            let list = open_bill_list(&router).await?;
            let view = list.view().await;
            if let Some(error) = view.error {
                bail!(error);
            }
            let bill = view
                .rows
                .iter()
                .find(|bill| bill.id.0 == bill_id)
                .with_context(|| format!("no bill with id '{bill_id}'"))?;
            list.handle_click_preview(bill);
        }
        Command::NewBill {
            expense_type,
            name,
            date,
            amount,
            vat,
            pct,
            commentary,
            file,
        } => {
            let MountedView::NewBill(form) = router.navigate(Route::NewBill.token()).view else {
                bail!("not signed in as an employee; run `billed login --email <email>` first");
            };
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read receipt '{}'", file.display()))?;
            let file_name = file
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default()
                .to_string();
            form.handle_change_file(ReceiptFile::new(file_name, None, bytes))
                .await;
            form.handle_submit(NewBillForm {
                expense_type,
                name,
                date,
                amount,
                vat,
                pct,
                commentary,
            })
            .await;
            println!("{}", render_new_bill_view(&form.view().await));
            follow_navigation(&router, &mut navigation_rx).await?;
        }
    }

    Ok(())
}
