//! HTML pages rendered by the boundary.

/// Page shown for expired, revoked or disabled share links.
pub fn gone_page(reason: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Dashboard not available</title></head>
<body>
<h1>This dashboard is no longer available</h1>
<p>{}</p>
<p>Please contact the person who shared this link with you.</p>
</body>
</html>
"#,
        escape_html(reason)
    )
}

/// Page shown when the request carries no usable token.
pub fn unauthenticated_page() -> String {
    r#"<!DOCTYPE html>
<html>
<head><title>Not authorized</title></head>
<body>
<h1>You are not authorized to view this page</h1>
<p>The link you followed is invalid.</p>
</body>
</html>
"#
    .to_string()
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gone_page_escapes_reason() {
        let page = gone_page("<link expired>");
        assert!(page.contains("This dashboard is no longer available"));
        assert!(page.contains("&lt;link expired&gt;"));
    }
}
