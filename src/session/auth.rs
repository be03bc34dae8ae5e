//! Login state machine and SSO form parsing.

use scraper::{Html, Selector};

use crate::error::{AppError, Result};

/// State of the portal session.
///
/// A fetch that lands on the login page moves the session through
/// `Authenticating`; a rejected credential pair is terminal and every later
/// fetch fails fast without another login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticating,
    Authenticated,
    Rejected,
}

/// Hidden metadata scraped from the SSO login form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginForm {
    /// Form action, relative to the login host
    pub action: String,

    /// Hidden `lt` ticket value
    pub lt: String,

    /// Hidden `_eventId` value
    pub event_id: String,
}

/// Parse the SSO login page into the fields the login POST needs.
///
/// A page without the expected form shape is a structural error: it means
/// the SSO markup changed, not that the user did anything wrong.
pub fn parse_login_form(html: &str) -> Result<LoginForm> {
    let form_sel = selector("form")?;
    let lt_sel = selector(r#"input[type="hidden"][name="lt"]"#)?;
    let event_sel = selector(r#"input[type="hidden"][name="_eventId"]"#)?;

    let document = Html::parse_document(html);
    let form = document
        .select(&form_sel)
        .next()
        .ok_or_else(|| AppError::parse("login page", "no <form> found"))?;

    let action = form
        .value()
        .attr("action")
        .ok_or_else(|| AppError::parse("login page", "form has no action"))?
        .to_string();

    let lt = hidden_value(&form, &lt_sel)
        .ok_or_else(|| AppError::parse("login page", "missing hidden 'lt' input"))?;
    let event_id = hidden_value(&form, &event_sel)
        .ok_or_else(|| AppError::parse("login page", "missing hidden '_eventId' input"))?;

    Ok(LoginForm {
        action,
        lt,
        event_id,
    })
}

fn hidden_value(form: &scraper::ElementRef<'_>, sel: &Selector) -> Option<String> {
    form.select(sel)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(str::to_string)
}

fn selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN_PAGE: &str = r#"
        <html><body>
        <form id="fm1" action="/cas/login?service=portal" method="post">
            <input type="text" name="username" />
            <input type="password" name="password" />
            <input type="hidden" name="lt" value="LT-1234-abcd" />
            <input type="hidden" name="_eventId" value="submit" />
        </form>
        </body></html>
    "#;

    #[test]
    fn test_parse_login_form() {
        let form = parse_login_form(LOGIN_PAGE).unwrap();
        assert_eq!(form.action, "/cas/login?service=portal");
        assert_eq!(form.lt, "LT-1234-abcd");
        assert_eq!(form.event_id, "submit");
    }

    #[test]
    fn test_parse_login_form_missing_form() {
        let err = parse_login_form("<html><body>nothing here</body></html>").unwrap_err();
        assert!(matches!(err, AppError::Parse { .. }));
    }

    #[test]
    fn test_parse_login_form_missing_hidden_input() {
        let html = r#"<form action="/cas/login"><input type="hidden" name="lt" value="x"/></form>"#;
        let err = parse_login_form(html).unwrap_err();
        assert!(matches!(err, AppError::Parse { .. }));
    }
}
