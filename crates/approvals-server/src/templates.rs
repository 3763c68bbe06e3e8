//! HTML templates for the approvals page.
//!
//! Server-rendered pages: the grouped approvals form and a generic error page.

use std::collections::BTreeMap;

use approvals_core::{GroupedView, GrantStatus, SelectionKey};

/// Form field carrying the selection keys of checked grants.
pub const SELECTION_FIELD: &str = "checkedScopes";

/// Shared CSS styles for all pages.
const SHARED_STYLES: &str = r#"
:root {
    --brand-primary: #3b3fe3;
    --brand-primary-light: #5e85ff;
    --brand-fire: #ff4d3d;
    --surface-1: #0d0e1a;
    --surface-2: #141629;
    --text-primary: #f8f9fe;
    --text-secondary: #adb5bd;
    --text-dimmed: #6c757d;
    --border-subtle: rgba(255, 255, 255, 0.08);
    --radius-md: 6px;
    --radius-xl: 12px;
}

* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: "Inter", -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
    background: radial-gradient(circle at top left, #1c1f40, #0d0e1a);
    min-height: 100vh;
    display: flex;
    justify-content: center;
    color: var(--text-primary);
    line-height: 1.5;
}

.container {
    width: 100%;
    max-width: 560px;
    padding: 2rem 1rem;
}

.card {
    background: rgba(20, 22, 41, 0.8);
    border: 1px solid var(--border-subtle);
    border-radius: var(--radius-xl);
    padding: 1.5rem;
}

.card-title {
    font-size: 1.25rem;
    font-weight: 600;
    margin-bottom: 1rem;
}

.client {
    margin-bottom: 1.25rem;
}

.client-name {
    font-weight: 600;
    margin-bottom: 0.5rem;
}

.scope-item {
    display: flex;
    align-items: center;
    gap: 0.75rem;
    padding: 0.5rem 0.75rem;
    background: var(--surface-2);
    border-radius: var(--radius-md);
    margin-bottom: 0.375rem;
    font-size: 0.875rem;
}

.scope-item input {
    accent-color: var(--brand-primary);
}

.scope-status {
    margin-left: auto;
    font-size: 0.75rem;
    color: var(--text-dimmed);
}

.empty {
    color: var(--text-secondary);
    font-size: 0.875rem;
    margin-bottom: 1rem;
}

.btn {
    width: 100%;
    padding: 0.625rem 1rem;
    border: none;
    border-radius: var(--radius-md);
    background: var(--brand-primary);
    color: white;
    font-size: 0.875rem;
    font-weight: 500;
    cursor: pointer;
}

.btn:hover {
    background: var(--brand-primary-light);
}

.links {
    list-style: none;
    display: flex;
    gap: 1rem;
    margin-top: 1rem;
    font-size: 0.875rem;
}

.links a {
    color: var(--text-secondary);
}

.error-title {
    font-size: 1.125rem;
    font-weight: 600;
    color: var(--brand-fire);
    margin-bottom: 0.5rem;
}

.error-code {
    font-family: monospace;
    font-size: 0.75rem;
    color: var(--text-dimmed);
    margin-top: 0.75rem;
}
"#;

/// Wraps page content in the shared HTML document.
fn html_page(title: &str, content: &str) -> String {
    let mut html = String::with_capacity(SHARED_STYLES.len() + content.len() + 512);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>");
    html.push_str(&html_escape(title));
    html.push_str("</title>\n<style>");
    html.push_str(SHARED_STYLES);
    html.push_str("</style>\n</head>\n<body>\n<div class=\"container\">\n");
    html.push_str(content);
    html.push_str("\n</div>\n</body>\n</html>\n");
    html
}

/// Renders the approvals form.
///
/// One section per client in view order; each grant is a checkbox whose value
/// is its selection key, checked when the grant is currently approved.
/// Submitting the form posts every checked key back to `/approvals`.
pub fn render_approvals_page(view: &GroupedView, links: &BTreeMap<String, String>) -> String {
    let mut content = String::with_capacity(2048 + view.grant_count() * 256);

    content.push_str("<div class=\"card\">\n");
    content.push_str("<div class=\"card-title\">Account Access</div>\n\n");
    content.push_str("<form method=\"POST\" action=\"/approvals\">\n");

    if view.is_empty() {
        content.push_str(
            "<p class=\"empty\">You have not granted any application access to your account.</p>\n",
        );
    }

    for (client_id, grants) in view {
        content.push_str("<div class=\"client\">\n<div class=\"client-name\">");
        content.push_str(&html_escape(client_id));
        content.push_str("</div>\n");
        for grant in grants {
            let checked = if grant.status == GrantStatus::Approved {
                " checked"
            } else {
                ""
            };
            content.push_str("<label class=\"scope-item\">\n<input type=\"checkbox\" name=\"");
            content.push_str(SELECTION_FIELD);
            content.push_str("\" value=\"");
            content.push_str(&html_escape(&SelectionKey::for_grant(grant).encode()));
            content.push('"');
            content.push_str(checked);
            content.push_str(">\n<span class=\"scope-name\">");
            content.push_str(&html_escape(&grant.scope));
            content.push_str("</span>\n<span class=\"scope-status\">");
            content.push_str(grant.status.as_str());
            content.push_str("</span>\n</label>\n");
        }
        content.push_str("</div>\n");
    }

    if !view.is_empty() {
        content.push_str("<button type=\"submit\" class=\"btn\">Update</button>\n");
    }
    content.push_str("</form>\n");

    if !links.is_empty() {
        content.push_str("<ul class=\"links\">\n");
        for (name, href) in links {
            content.push_str("<li><a href=\"");
            content.push_str(&html_escape(href));
            content.push_str("\">");
            content.push_str(&html_escape(name));
            content.push_str("</a></li>\n");
        }
        content.push_str("</ul>\n");
    }
    content.push_str("</div>");

    html_page("Account Access", &content)
}

/// Renders an error page.
///
/// # Arguments
///
/// * `error_code` - Short machine-readable code (e.g., "store_unavailable")
/// * `error_description` - Human-readable description
pub fn render_error_page(error_code: &str, error_description: &str) -> String {
    let mut content = String::with_capacity(512);

    content.push_str("<div class=\"card\" style=\"text-align: center;\">\n");
    content.push_str("<div class=\"error-title\">Something went wrong</div>\n");
    content.push_str("<div class=\"error-description\">");
    content.push_str(&html_escape(error_description));
    content.push_str("</div>\n");
    content.push_str("<div class=\"error-code\">");
    content.push_str(&html_escape(error_code));
    content.push_str("</div>\n</div>");

    html_page("Error", &content)
}

/// Simple HTML escaping to prevent XSS.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approvals_core::{Grant, group_by_client};

    #[test]
    fn test_render_grouped_checkboxes() {
        let view = group_by_client(vec![
            Grant::new("app1", "read", GrantStatus::Approved),
            Grant::new("app2", "openid", GrantStatus::Pending),
            Grant::new("app1", "write", GrantStatus::Denied),
        ]);
        let html = render_approvals_page(&view, &BTreeMap::new());

        assert_eq!(html.matches("type=\"checkbox\"").count(), 3);
        assert!(html.contains("value=\"app1-read\" checked>"));
        assert!(html.contains("value=\"app1-write\">"));
        assert!(html.contains("value=\"app2-openid\">"));
        assert!(html.find("app1-write").unwrap() < html.find("app2-openid").unwrap());
        assert!(html.contains("name=\"checkedScopes\""));
    }

    #[test]
    fn test_render_empty_view() {
        let html = render_approvals_page(&GroupedView::default(), &BTreeMap::new());
        assert!(html.contains("not granted any application"));
        assert!(!html.contains("type=\"submit\""));
    }

    #[test]
    fn test_render_links() {
        let mut links = BTreeMap::new();
        links.insert("home".to_string(), "/".to_string());
        links.insert("passwd".to_string(), "/change_password?x=1&y=2".to_string());
        let html = render_approvals_page(&GroupedView::default(), &links);
        assert!(html.contains("<a href=\"/\">home</a>"));
        assert!(html.contains("/change_password?x=1&amp;y=2"));
    }

    #[test]
    fn test_render_escapes_store_values() {
        let view = group_by_client(vec![Grant::new(
            "<script>alert(1)</script>",
            "a\"b",
            GrantStatus::Pending,
        )]);
        let html = render_approvals_page(&view, &BTreeMap::new());
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a&quot;b"));
    }

    #[test]
    fn test_render_error_page() {
        let html = render_error_page("store_unavailable", "Try again later");
        assert!(html.contains("store_unavailable"));
        assert!(html.contains("Try again later"));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a&b"), "a&amp;b");
        assert_eq!(html_escape("\"quoted\""), "&quot;quoted&quot;");
    }
}
