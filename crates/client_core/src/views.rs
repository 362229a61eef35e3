//! View rendering collaborator and the default markup views.

use shared::domain::Role;

use crate::{bills::BillRow, routes::RoutePath};

pub const BILLS_PAGE_TITLE: &str = "Mes notes de frais";
pub const LOADING_TEXT: &str = "Loading...";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewProps {
    pub rows: Vec<BillRow>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ViewProps {
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn with_rows(rows: Vec<BillRow>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }
}

/// Pure markup producers, one per path. `role` is `None` for anonymous views.
pub trait ViewRegistry: Send + Sync {
    fn render(&self, path: RoutePath, role: Option<Role>, props: &ViewProps) -> String;
    fn error_view(&self, message: &str) -> String;
}

/// Minimal HTML views with the test ids the pages are queried by.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkupViews;

impl ViewRegistry for MarkupViews {
    fn render(&self, path: RoutePath, _role: Option<Role>, props: &ViewProps) -> String {
        match path {
            RoutePath::Login => login_page(),
            RoutePath::Bills => {
                if props.loading {
                    format!(r#"<div id="loading" data-testid="loading">{LOADING_TEXT}</div>"#)
                } else if let Some(message) = &props.error {
                    self.error_view(message)
                } else {
                    bills_page(&props.rows)
                }
            }
            RoutePath::NewBill => concat!(
                r#"<div class="content" data-testid="new-bill-page">"#,
                r#"<div class="content-title"> Envoyer une note de frais </div>"#,
                r#"<form data-testid="form-new-bill"></form></div>"#
            )
            .to_string(),
            RoutePath::Dashboard => concat!(
                r#"<div class="dashboard" data-testid="dashboard">"#,
                r#"<div class="content-title"> Validations </div></div>"#
            )
            .to_string(),
        }
    }

    fn error_view(&self, message: &str) -> String {
        format!(
            r#"<div id="error-page" data-testid="error-message">{}</div>"#,
            escape(message)
        )
    }
}

fn login_page() -> String {
    concat!(
        r#"<div class="login-page" data-testid="login-page">"#,
        r#"<h2>Employé</h2><form data-testid="form-employee"></form>"#,
        r#"<h2>Administration</h2><form data-testid="form-admin"></form>"#,
        "</div>"
    )
    .to_string()
}

fn bills_page(rows: &[BillRow]) -> String {
    let body: String = rows.iter().map(bill_row).collect();
    format!(
        concat!(
            r#"<div class="content"><div class="content-header">"#,
            r#"<div class="content-title"> {title} </div>"#,
            r#"<button type="button" data-testid="btn-new-bill">Nouvelle note de frais</button>"#,
            r#"</div><div id="data-table"><table><tbody data-testid="tbody">{body}</tbody></table></div></div>"#
        ),
        title = BILLS_PAGE_TITLE,
        body = body
    )
}

fn bill_row(row: &BillRow) -> String {
    format!(
        concat!(
            "<tr><td>{kind}</td><td>{name}</td>",
            r#"<td data-testid="bill-date">{date}</td><td>{amount} €</td><td>{status}</td>"#,
            r#"<td><div class="icon-actions"><div data-testid="icon-eye" data-bill-url="{url}"></div></div></td></tr>"#
        ),
        kind = escape(&row.kind),
        name = escape(&row.name),
        date = escape(&row.date),
        amount = row.amount,
        status = escape(&row.status),
        url = escape(row.file_url.as_deref().unwrap_or_default()),
    )
}

pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[path = "tests/views_tests.rs"]
mod tests;
