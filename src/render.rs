//! Transcript rendering for the presentation layer

use serde::Serialize;

use crate::conversation::{Conversation, Role};

/// One rendered message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayUnit {
    /// Position in the transcript
    pub index: usize,
    pub role: Role,
    pub content: String,
    /// `data:` URL of attached audio, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_src: Option<String>,
    /// Start playback as soon as the unit is shown
    pub autoplay: bool,
}

/// Render every turn, in transcript order
///
/// Assistant turns that carry audio are flagged for auto-playback.
#[must_use]
pub fn render(conversation: &Conversation) -> Vec<DisplayUnit> {
    conversation
        .iter()
        .enumerate()
        .map(|(index, turn)| {
            let audio_src = turn.audio().map(crate::conversation::AudioClip::data_url);
            DisplayUnit {
                index,
                role: turn.role(),
                content: turn.content().to_string(),
                autoplay: turn.role() == Role::Assistant && audio_src.is_some(),
                audio_src,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioFormat;
    use crate::conversation::{AudioClip, Turn};

    #[test]
    fn test_render_empty() {
        assert!(render(&Conversation::new()).is_empty());
    }

    #[test]
    fn test_render_preserves_order_and_flags_audio() {
        let mut conversation = Conversation::new();
        conversation.push(Turn::user("Hello"));
        conversation.push(Turn::assistant("Hi there"));
        conversation.push(Turn::user("spoken"));
        conversation.push(Turn::assistant_with_audio(
            "reply",
            AudioClip::new(AudioFormat::Mp3, b"mp3".to_vec()),
        ));

        let units = render(&conversation);
        let indexes: Vec<usize> = units.iter().map(|u| u.index).collect();
        assert_eq!(indexes, [0, 1, 2, 3]);
        assert_eq!(units[0].content, "Hello");
        assert_eq!(units[3].content, "reply");

        let autoplay: Vec<bool> = units.iter().map(|u| u.autoplay).collect();
        assert_eq!(autoplay, [false, false, false, true]);
        assert_eq!(units[3].audio_src.as_deref(), Some("data:audio/mpeg;base64,bXAz"));
        assert!(units[1].audio_src.is_none());
    }

    #[test]
    fn test_display_unit_json_shape() {
        let mut conversation = Conversation::new();
        conversation.push(Turn::user("Hello"));
        let json = serde_json::to_value(&render(&conversation)[0]).unwrap();

        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "Hello");
        assert_eq!(json["autoplay"], false);
        assert!(json.get("audio_src").is_none());
    }
}
