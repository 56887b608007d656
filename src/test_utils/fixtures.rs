//! Canned portal responses used across the test suite.

/// Anonymous landing page embedding the login form with the given
/// anti-forgery token.
pub fn landing_page_html(token: &str) -> String {
    format!(
        r#"<html><body>
            <h1>Welcome to the customer portal</h1>
            <form action="/eServices/Online/Login" method="post">
                <input name="__RequestVerificationToken" type="hidden" value="{}" />
                <input name="UserName" type="text" />
                <input name="Password" type="password" />
            </form>
        </body></html>"#,
        token
    )
}

/// Landing page variant whose markup no longer carries the token input.
pub fn landing_page_without_token() -> String {
    r#"<html><body>
        <h1>Welcome to the customer portal</h1>
        <p>We are renewing our online services.</p>
    </body></html>"#
        .to_string()
}

/// Home page as served to an authenticated session (no login form).
pub fn authenticated_home_html() -> String {
    r#"<html><body>
        <h1>My consumption</h1>
        <a href="/Reporting/CustomerConsumption">Reports</a>
    </body></html>"#
        .to_string()
}

/// Consumption report export: banner row, header row with the (possibly
/// multi-line, therefore quoted) address cell, then one row per hour.
pub fn report_payload(location_header: &str, rows: &[(&str, &str)]) -> String {
    let mut payload = format!(
        "Consumption report\ntime,\"{}\"\n",
        location_header.replace('"', "\"\"")
    );
    for (time, consumption) in rows {
        payload.push_str(&format!("{},{}\n", time, consumption));
    }
    payload
}
