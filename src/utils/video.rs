use regex::Regex;

/// Pulls the provider video id out of a pasted URL. Accepts watch,
/// embed and short-link forms; anything else is rejected so a broken
/// link never reaches the backend.
pub fn extract_video_id(url: &str) -> Option<String> {
    let pattern = Regex::new(r"(?:youtube\.com/(?:watch\?v=|embed/)|youtu\.be/)([^&?/]+)")
        .expect("video id pattern is valid");
    pattern
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn embed_url(video_id: &str) -> String {
    format!("https://www.youtube.com/embed/{}", video_id)
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}
