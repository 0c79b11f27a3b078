/// Canned reply for plain chat messages that mention the trigger word.
#[derive(Debug, Clone)]
pub struct TriggerResponder {
    trigger: String,
    reply: String,
}

impl TriggerResponder {
    pub fn new(trigger: &str, reply: &str) -> Self {
        Self {
            trigger: trigger.to_lowercase(),
            reply: reply.to_string(),
        }
    }

    /// The reply for `text`, if it mentions the trigger anywhere (case-insensitive).
    pub fn reply_for(&self, text: &str) -> Option<&str> {
        if self.trigger.is_empty() {
            return None;
        }
        text.to_lowercase()
            .contains(&self.trigger)
            .then_some(self.reply.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_on_trigger() {
        let responder = TriggerResponder::new("bud", "huh");
        assert_eq!(responder.reply_for("hey BUD what's up"), Some("huh"));
        assert_eq!(responder.reply_for("buddy"), Some("huh"));
        assert_eq!(responder.reply_for("hello there"), None);
    }

    #[test]
    fn test_empty_trigger_never_replies() {
        let responder = TriggerResponder::new("", "huh");
        assert_eq!(responder.reply_for("anything"), None);
    }
}
