/// Longest content excerpt forwarded to the webhook.
pub const EXCERPT_CHARS: usize = 1600;

/// Outbound webhook payload for new threads and posts.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
}

impl Notification {
    pub fn new(author: &str, title: Option<&str>, content: &str) -> Self {
        Self {
            author: author.to_string(),
            title: title.map(String::from),
            content: content.chars().take(EXCERPT_CHARS).collect(),
        }
    }
}

/// Fire-and-forget webhook dispatcher. Disabled when `WEBHOOK_URL` is
/// unset; delivery failures are logged and never reach the caller.
#[derive(Debug, Clone)]
pub struct Notifier {
    url: Option<String>,
    client: reqwest::Client,
}

impl Notifier {
    pub fn from_env() -> Self {
        let url = std::env::var("WEBHOOK_URL").ok();
        match url {
            Some(_) => log::info!("webhook notifications enabled"),
            None => log::info!("WEBHOOK_URL unset, webhook notifications disabled"),
        }
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }

    /// Dispatches on a spawned task so the HTTP response never waits on
    /// the webhook endpoint.
    pub fn notify(&self, notification: Notification) {
        let Some(url) = self.url.clone() else {
            return;
        };
        let client = self.client.clone();
        tokio::spawn(async move {
            if let Err(e) = client.post(&url).json(&notification).send().await {
                log::warn!("webhook delivery failed: {}", e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_is_truncated_on_character_boundaries() {
        let long = "é".repeat(EXCERPT_CHARS + 100);
        let n = Notification::new("a", None, &long);
        assert_eq!(n.content.chars().count(), EXCERPT_CHARS);
    }

    #[test]
    fn short_content_passes_through() {
        let n = Notification::new("a", Some("t"), "hello");
        assert_eq!(n.content, "hello");
    }

    #[test]
    fn title_stays_off_the_wire_when_absent() {
        let json = serde_json::to_value(Notification::new("a", None, "x")).unwrap();
        assert!(json.get("title").is_none());
        assert_eq!(json["author"], "a");
    }
}
