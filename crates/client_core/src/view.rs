//! Plain-text rendering of controller views for terminal front ends.

use std::fmt::Write as _;

use shared::domain::Bill;

use crate::{
    bills::BillsView,
    new_bill::{NewBillState, NewBillView},
};

pub const LOADING_LABEL: &str = "Loading...";

fn bill_row(bill: &Bill) -> String {
    let mut row = format!(
        "{}  {:<24}  {:>10.2} €  {:<10}  {}",
        bill.date,
        bill.name,
        bill.amount,
        bill.status.label(),
        bill.expense_type
    );
    if bill.file_url.is_some() {
        row.push_str("  [preview]");
    }
    row
}

/// Exactly one of: the loading label, the error block, or the rows.
pub fn render_bills_view(view: &BillsView) -> String {
    if view.loading {
        return LOADING_LABEL.to_string();
    }
    if let Some(error) = &view.error {
        return format!("Erreur\n{error}");
    }
    if view.rows.is_empty() {
        return "Aucune note de frais".to_string();
    }
    view.rows.iter().map(bill_row).collect::<Vec<_>>().join("\n")
}

pub fn render_new_bill_view(view: &NewBillView) -> String {
    let mut out = match &view.state {
        NewBillState::Draft => "Brouillon".to_string(),
        NewBillState::Uploading => "Envoi du justificatif...".to_string(),
        NewBillState::Ready => "Prêt à envoyer".to_string(),
        NewBillState::Submitting => "Envoi de la note de frais...".to_string(),
        NewBillState::Created => "Note de frais créée".to_string(),
        NewBillState::Failed(err) => format!("Erreur\n{err}"),
    };
    if let Some(file) = &view.accepted_file {
        let _ = write!(out, "\njustificatif: {} ({})", file.name, file.mime_type);
    }
    if let Some(err) = &view.validation_error {
        let _ = write!(out, "\n{err}");
    }
    out
}

#[cfg(test)]
mod tests {
    use shared::domain::{BillId, BillStatus, ExpenseType};

    use super::*;
    use crate::{
        error::{ClientError, ValidationError},
        new_bill::AcceptedFile,
    };

    fn bill(date: &str, file_url: Option<&str>) -> Bill {
        Bill {
            id: BillId(date.into()),
            expense_type: ExpenseType::Transport,
            name: "train".into(),
            date: date.into(),
            amount: 42.5,
            vat: 7.0,
            pct: 20,
            commentary: None,
            file_url: file_url.map(str::to_string),
            file_name: None,
            status: BillStatus::Accepted,
            email: "a@a".into(),
        }
    }

    #[test]
    fn loading_shows_only_the_label() {
        let view = BillsView {
            loading: true,
            ..BillsView::default()
        };
        assert_eq!(render_bills_view(&view), "Loading...");
    }

    #[test]
    fn error_text_is_rendered_verbatim() {
        for message in ["Erreur 404", "Erreur 500"] {
            let view = BillsView {
                error: Some(message.to_string()),
                ..BillsView::default()
            };
            assert!(render_bills_view(&view).contains(message));
        }
    }

    #[test]
    fn rows_start_with_iso_date_and_offer_preview_when_possible() {
        let view = BillsView {
            rows: vec![
                bill("2021-09-17", Some("memory://receipts/a.png")),
                bill("2020-01-02", None),
            ],
            ..BillsView::default()
        };
        let rendered = render_bills_view(&view);
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("2021-09-17"));
        assert!(lines[0].contains("Accepté"));
        assert!(lines[0].ends_with("[preview]"));
        assert!(lines[1].starts_with("2020-01-02"));
        assert!(!lines[1].contains("[preview]"));
    }

    #[test]
    fn new_bill_view_lists_file_and_inline_error() {
        let view = NewBillView {
            state: NewBillState::Ready,
            validation_error: Some(ValidationError::new("date", "expected a YYYY-MM-DD date")),
            accepted_file: Some(AcceptedFile {
                name: "hello.png".into(),
                mime_type: "image/png".into(),
                size_bytes: 5,
            }),
            uploaded: None,
        };
        let rendered = render_new_bill_view(&view);
        assert!(rendered.contains("hello.png"));
        assert!(rendered.contains("date: expected a YYYY-MM-DD date"));

        let failed = NewBillView {
            state: NewBillState::Failed(ClientError::Network {
                code: Some(500),
                message: "Erreur 500".into(),
            }),
            ..NewBillView::default()
        };
        assert!(render_new_bill_view(&failed).contains("Erreur 500"));
    }
}
