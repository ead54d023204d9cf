/// Current UTC time as Unix millis
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate an opaque job identifier.
pub fn new_job_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Lowercase, dash-separated slug for a job title.
///
/// Runs of non-alphanumeric characters collapse into a single dash;
/// leading and trailing dashes are dropped.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for ch in title.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
