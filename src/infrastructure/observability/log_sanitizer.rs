use reqwest::Url;

const MAX_VISIBLE_LENGTH: usize = 100;
const REDACTED: &str = "[REDACTED]";

/// Renders a URL for logs: query string, fragment and credentials are
/// dropped, and long values are truncated. Anything that does not parse
/// as an absolute URL is replaced by a placeholder.
pub fn sanitize_url(url: &str) -> String {
    let trimmed = url.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let Some(rendered) = render(trimmed) else {
        return String::from("[INVALID URL]");
    };

    let total = rendered.chars().count();
    if total > MAX_VISIBLE_LENGTH {
        let visible: String = rendered.chars().take(MAX_VISIBLE_LENGTH).collect();
        format!("{}... ({} chars total)", visible, total)
    } else {
        rendered
    }
}

fn render(raw: &str) -> Option<String> {
    let mut url = Url::parse(raw).ok()?;
    url.set_query(None);
    url.set_fragment(None);

    let had_credentials = !url.username().is_empty() || url.password().is_some();
    if !had_credentials {
        return Some(url.into());
    }

    url.set_password(None).ok()?;
    url.set_username("").ok()?;

    let prefix = format!("{}://", url.scheme());
    let rest = url.as_str().strip_prefix(&prefix)?;
    Some(format!("{}{}@{}", prefix, REDACTED, rest))
}
