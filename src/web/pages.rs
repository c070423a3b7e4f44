//! Inline HTML pages.
//!
//! The page surface is deliberately tiny, so pages are built with
//! `format!` instead of a template engine. Every user-supplied value
//! goes through [`escape`] before it lands in markup.

use crate::auth::Identity;
use crate::store::{Role, UserRecord};

/// Escape a string for safe use in HTML text and attribute values.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Shared page shell: header with navigation, then the page body.
fn layout(title: &str, nav: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head><meta charset=\"utf-8\"><title>{title} - Wicket</title></head>\n\
         <body>\n\
         <nav>{nav}</nav>\n\
         <main>\n{body}\n</main>\n\
         </body>\n\
         </html>\n",
        title = escape(title),
        nav = nav,
        body = body,
    )
}

fn nav_signed_out() -> String {
    "<a href=\"/\">Home</a> | <a href=\"/login\">Sign in</a>".to_string()
}

fn nav_signed_in(identity: &Identity) -> String {
    let mut nav = String::from(
        "<a href=\"/\">Home</a> | <a href=\"/dashboard\">Dashboard</a> | \
         <a href=\"/profile\">Profile</a> | <a href=\"/reports\">Reports</a>",
    );
    if identity.role == Role::Admin {
        nav.push_str(" | <a href=\"/admin\">Admin</a>");
    }
    nav.push_str(&format!(
        " | <a href=\"/logout\">Sign out ({})</a>",
        escape(&identity.username)
    ));
    nav
}

fn nav_for(identity: Option<&Identity>) -> String {
    match identity {
        Some(identity) => nav_signed_in(identity),
        None => nav_signed_out(),
    }
}

/// Public landing page.
pub fn home_page(identity: Option<&Identity>) -> String {
    let body = match identity {
        Some(identity) => format!(
            "<h1>Welcome back, {}</h1>\n\
             <p>Head to your <a href=\"/dashboard\">dashboard</a>.</p>",
            escape(&identity.display_name)
        ),
        None => "<h1>Welcome</h1>\n\
                 <p><a href=\"/login\">Sign in</a> to access your dashboard.</p>"
            .to_string(),
    };
    layout("Home", &nav_for(identity), &body)
}

/// Login form. `error` renders the generic failure line; `next` is
/// echoed back as a hidden field so the post-login redirect survives
/// the round trip.
pub fn login_page(error: bool, next: Option<&str>) -> String {
    let mut body = String::from("<h1>Sign in</h1>\n");
    if error {
        body.push_str("<p class=\"error\">Invalid username or password</p>\n");
    }
    body.push_str("<form method=\"post\" action=\"/login\">\n");
    if let Some(next) = next {
        body.push_str(&format!(
            "<input type=\"hidden\" name=\"next\" value=\"{}\">\n",
            escape(next)
        ));
    }
    body.push_str(
        "<label>Username <input type=\"text\" name=\"username\" autofocus></label>\n\
         <label>Password <input type=\"password\" name=\"password\"></label>\n\
         <button type=\"submit\">Sign in</button>\n\
         </form>",
    );
    layout("Sign in", &nav_signed_out(), &body)
}

/// Authenticated landing page.
pub fn dashboard_page(identity: &Identity) -> String {
    let body = format!(
        "<h1>Dashboard</h1>\n\
         <p>Signed in as <strong>{}</strong> ({}).</p>",
        escape(&identity.display_name),
        identity.role.display_name()
    );
    layout("Dashboard", &nav_signed_in(identity), &body)
}

/// Identity details for the signed-in user.
pub fn profile_page(identity: &Identity) -> String {
    let body = format!(
        "<h1>Profile</h1>\n\
         <dl>\n\
         <dt>Username</dt><dd>{}</dd>\n\
         <dt>Display name</dt><dd>{}</dd>\n\
         <dt>Role</dt><dd>{}</dd>\n\
         </dl>",
        escape(&identity.username),
        escape(&identity.display_name),
        identity.role.display_name()
    );
    layout("Profile", &nav_signed_in(identity), &body)
}

/// Authenticated-only reports page.
pub fn reports_page(identity: &Identity) -> String {
    let body = format!(
        "<h1>Reports</h1>\n\
         <p>Reports for {}.</p>\n\
         <ul>\n\
         <li>No reports yet.</li>\n\
         </ul>",
        escape(&identity.display_name)
    );
    layout("Reports", &nav_signed_in(identity), &body)
}

/// Admin panel: table of provisioned users.
pub fn admin_page(identity: &Identity, users: &[UserRecord]) -> String {
    let mut rows = String::new();
    for user in users {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&user.username),
            escape(&user.display_name),
            user.role.display_name(),
            escape(user.email.as_deref().unwrap_or("-")),
        ));
    }
    let body = format!(
        "<h1>Administration</h1>\n\
         <p>{} provisioned user(s).</p>\n\
         <table>\n\
         <tr><th>Username</th><th>Display name</th><th>Role</th><th>Email</th></tr>\n\
         {}</table>",
        users.len(),
        rows
    );
    layout("Administration", &nav_signed_in(identity), &body)
}

/// Terminal access-denied page for a role mismatch.
pub fn forbidden_page(required: Role) -> String {
    let body = format!(
        "<h1>Access denied</h1>\n\
         <p>This page requires the {} role.</p>\n\
         <p><a href=\"/dashboard\">Back to your dashboard</a></p>",
        required.display_name()
    );
    layout("Access denied", "<a href=\"/\">Home</a>", &body)
}

/// Generic failure page; detail stays in the server log.
pub fn error_page() -> String {
    layout(
        "Error",
        "<a href=\"/\">Home</a>",
        "<h1>Something went wrong</h1>\n<p>Please try again later.</p>",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> Identity {
        Identity {
            username: "usuario".to_string(),
            display_name: "Usuario Demo".to_string(),
            role,
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"
        );
        assert_eq!(escape("a & \"b\""), "a &amp; &quot;b&quot;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_home_page_signed_out_links_login() {
        let page = home_page(None);
        assert!(page.contains("href=\"/login\""));
        assert!(!page.contains("/logout"));
    }

    #[test]
    fn test_home_page_signed_in_links_logout() {
        let page = home_page(Some(&identity(Role::User)));
        assert!(page.contains("/logout"));
        assert!(page.contains("Usuario Demo"));
    }

    #[test]
    fn test_admin_link_only_for_admins() {
        assert!(!dashboard_page(&identity(Role::User)).contains("href=\"/admin\""));
        assert!(dashboard_page(&identity(Role::Admin)).contains("href=\"/admin\""));
    }

    #[test]
    fn test_login_page_error_line() {
        assert!(!login_page(false, None).contains("Invalid username or password"));
        assert!(login_page(true, None).contains("Invalid username or password"));
    }

    #[test]
    fn test_login_page_next_field() {
        let page = login_page(false, Some("/reports"));
        assert!(page.contains("name=\"next\" value=\"/reports\""));
        assert!(!login_page(false, None).contains("name=\"next\""));
    }

    #[test]
    fn test_login_page_escapes_next() {
        let page = login_page(false, Some("/x\"><script>"));
        assert!(!page.contains("<script>"));
        assert!(page.contains("&quot;&gt;&lt;script&gt;"));
    }

    #[test]
    fn test_admin_page_lists_users() {
        let users = vec![
            UserRecord::new("admin", "Administrator", "$argon2id$...").with_role(Role::Admin),
            UserRecord::new("usuario", "Usuario Demo", "$argon2id$..."),
        ];
        let page = admin_page(&identity(Role::Admin), &users);
        assert!(page.contains("2 provisioned user(s)"));
        assert!(page.contains("<td>admin</td>"));
        assert!(page.contains("<td>usuario</td>"));
        // The stored hash never reaches the page.
        assert!(!page.contains("argon2id"));
    }

    #[test]
    fn test_forbidden_page_names_role() {
        let page = forbidden_page(Role::Admin);
        assert!(page.contains("Administrator"));
        assert!(page.contains("Access denied"));
    }
}
