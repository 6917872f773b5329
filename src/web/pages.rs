use axum::response::Html;
use indoc::formatdoc;

use crate::{
    auth::Credentials,
    models::{MatchOutcome, MatchStats, Submission},
    repository::DBConvertible,
};

const STYLE: &str = "body { font-family: sans-serif; max-width: 40rem; margin: 2rem auto; } \
    .error { color: #b00020; } .success { color: #1b5e20; } \
    table { border-collapse: collapse; } td, th { border: 1px solid #ccc; padding: 0.25rem 0.5rem; }";

const SUBMIT_SCRIPT: &str = r#"
document.getElementById('submitBtn').addEventListener('click', async () => {
  const value = (id) => document.getElementById(id).value.trim();
  const payload = { studentNo: value('studentNo'), name: value('name'), crush: value('crush') };
  if (!payload.studentNo || !payload.name || !payload.crush) { alert('Please fill in every field.'); return; }
  const res = await fetch('/submit', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(payload),
  });
  if (res.status === 409) { alert('This student number and name were already submitted.'); return; }
  if (!res.ok) { alert('Server error, please try again.'); return; }
  location.href = '/result-wait';
});
"#;

pub const ENTER_STUDENT_NO: &str = "Please enter your student number.";
const NOT_FOUND: &str = "No submission was found for this student number.";
const NOT_PUBLIC_YET: &str =
    "The results have not been made public yet. Please wait until the admin reveals them.";
const ACCESS_DENIED: &str = "Access denied";

pub enum GeneralAdminView {
    Login,
    Denied,
    Toggled {
        public: bool,
    },
    Overview {
        participant_count: i64,
        public: bool,
    },
}

pub enum DataAdminView<'a> {
    Login,
    Denied,
    Entries {
        entries: &'a [Submission],
        stats: MatchStats,
        credentials: &'a Credentials,
    },
}

/// Escapes text for use in HTML element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(formatdoc! {
        r#"
            <!DOCTYPE html>
            <html>
            <head>
            <meta charset="utf-8">
            <meta name="viewport" content="width=device-width, initial-scale=1">
            <title>{title}</title>
            <style>{style}</style>
            </head>
            <body>
            {body}
            </body>
            </html>
        "#,
        title = escape(title),
        style = STYLE,
        body = body,
    })
}

fn message(class: &str, text: Option<&str>) -> String {
    text.map(|text| format!(r#"<p class="{class}">{}</p>"#, escape(text)))
        .unwrap_or_default()
}

pub fn index() -> Html<String> {
    layout(
        "Crush match",
        &formatdoc! {
            r#"
                <h1>Who do you like?</h1>
                <form id="form" onsubmit="return false">
                <p><label>Student number <input id="studentNo" autocomplete="off"></label></p>
                <p><label>Your name <input id="name" autocomplete="off"></label></p>
                <p><label>Your crush <input id="crush" autocomplete="off"></label></p>
                <p><button type="button" id="submitBtn">Submit</button></p>
                </form>
                <p><a href="/check">Check my result</a></p>
                <script>{script}</script>
            "#,
            script = SUBMIT_SCRIPT,
        },
    )
}

pub fn result_wait() -> Html<String> {
    layout(
        "Submitted",
        &formatdoc! {
            r#"
                <h1>Submitted!</h1>
                <p>Results will be revealed by the admin. Come back and check later.</p>
                <p><a href="/check">Check my result</a></p>
            "#
        },
    )
}

pub fn check_form(error: Option<&str>) -> Html<String> {
    layout(
        "Check result",
        &formatdoc! {
            r#"
                <h1>Check your result</h1>
                {error}
                <form method="post" action="/check">
                <p><label>Student number <input name="studentNo" autocomplete="off"></label></p>
                <p><button type="submit">Check</button></p>
                </form>
            "#,
            error = message("error", error),
        },
    )
}

pub fn check_outcome(outcome: &MatchOutcome) -> Html<String> {
    match outcome {
        MatchOutcome::NotFound => check_form(Some(NOT_FOUND)),
        MatchOutcome::NotPublicYet => check_form(Some(NOT_PUBLIC_YET)),
        MatchOutcome::Found {
            matched,
            my_name,
            crush_name,
        } => {
            let verdict = if *matched {
                format!("It's a match! {} likes you too.", escape(crush_name))
            } else {
                format!("No match this time. {} did not pick you.", escape(crush_name))
            };

            layout(
                "Result",
                &formatdoc! {
                    r#"
                        <h1>{my_name}, here is your result</h1>
                        <p class="{class}">{verdict}</p>
                        <p><a href="/">Back</a></p>
                    "#,
                    my_name = escape(my_name),
                    class = if *matched { "success" } else { "error" },
                    verdict = verdict,
                },
            )
        }
    }
}

pub fn general_admin(view: &GeneralAdminView) -> Html<String> {
    let status = match view {
        GeneralAdminView::Login => String::new(),
        GeneralAdminView::Denied => message("error", Some(ACCESS_DENIED)),
        GeneralAdminView::Toggled { public } => {
            message("success", Some(&format!("Visibility changed: public = {public}")))
        }
        GeneralAdminView::Overview {
            participant_count,
            public,
        } => formatdoc! {
            r#"
                <p>Participants: {participant_count}</p>
                <p>Results public: {public}</p>
            "#
        },
    };

    layout(
        "Admin",
        &formatdoc! {
            r#"
                <h1>Admin</h1>
                {status}
                <form method="post" action="/admin">
                <p><label>Code <input name="code" type="password"></label></p>
                <p><label>Name <input name="name"></label></p>
                <p>
                <button type="submit" name="action" value="show">Show status</button>
                <button type="submit" name="action" value="toggle">Toggle visibility</button>
                <button type="submit" name="action" value="publish">Publish results</button>
                <button type="submit" name="action" value="hide">Hide results</button>
                </p>
                </form>
            "#
        },
    )
}

fn credential_fields(credentials: &Credentials, hidden: bool) -> String {
    let kind = if hidden { "hidden" } else { "password" };
    formatdoc! {
        r#"
            <input type="{kind}" name="code" value="{code}">
            <input type="{kind}" name="name" value="{name}">
            <input type="{kind}" name="crush" value="{crush}">
        "#,
        code = escape(&credentials.code),
        name = escape(&credentials.name),
        crush = escape(&credentials.crush),
    }
}

pub fn data_admin(view: &DataAdminView<'_>) -> Html<String> {
    let content = match view {
        DataAdminView::Login | DataAdminView::Denied => {
            let error = match view {
                DataAdminView::Denied => message("error", Some(ACCESS_DENIED)),
                _ => String::new(),
            };

            formatdoc! {
                r#"
                    {error}
                    <form method="post" action="/admin2">
                    {fields}
                    <p><button type="submit">Open</button></p>
                    </form>
                "#,
                fields = credential_fields(&Credentials::default(), false),
            }
        }
        DataAdminView::Entries {
            entries,
            stats,
            credentials,
        } => {
            let rows = entries
                .iter()
                .map(|entry| {
                    let created_at = entry
                        .submitted_at
                        .to_db()
                        .unwrap_or_else(|_| "?".to_string());
                    format!(
                        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                        entry.id.0,
                        escape(&entry.student_id),
                        escape(&entry.name),
                        escape(&entry.crush),
                        created_at,
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");

            formatdoc! {
                r#"
                    <p>Participants: {participants}</p>
                    <p>Mutual pairs: {matches}</p>
                    <form method="post" action="/admin2/export">
                    {fields}
                    <button type="submit">Export CSV</button>
                    </form>
                    <table>
                    <tr><th>id</th><th>Student number</th><th>Name</th><th>Crush</th><th>Submitted at</th></tr>
                    {rows}
                    </table>
                "#,
                participants = stats.participant_count,
                matches = stats.match_count,
                fields = credential_fields(credentials, true),
            }
        }
    };

    layout("Data admin", &format!("<h1>Data admin</h1>\n{content}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn found_outcome_escapes_names() {
        let Html(page) = check_outcome(&MatchOutcome::Found {
            matched: true,
            my_name: "<b>A</b>".into(),
            crush_name: "B".into(),
        });

        assert!(page.contains("&lt;b&gt;A&lt;/b&gt;, here is your result"));
        assert!(page.contains("It's a match! B likes you too."));
        assert!(!page.contains("<b>A</b>"));
    }

    #[test]
    fn hidden_outcomes_render_the_form_with_a_message() {
        let Html(page) = check_outcome(&MatchOutcome::NotPublicYet);
        assert!(page.contains("have not been made public yet"));
        assert!(page.contains(r#"action="/check""#));

        let Html(page) = check_outcome(&MatchOutcome::NotFound);
        assert!(page.contains("No submission was found"));
    }

    #[test]
    fn export_form_carries_credentials() {
        let credentials = Credentials {
            code: "c\"ode".into(),
            name: "n".into(),
            crush: "x".into(),
        };
        let Html(page) = data_admin(&DataAdminView::Entries {
            entries: &[],
            stats: MatchStats::default(),
            credentials: &credentials,
        });

        assert!(page.contains(r#"<input type="hidden" name="code" value="c&quot;ode">"#));
        assert!(page.contains("Mutual pairs: 0"));
    }
}
