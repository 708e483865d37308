use std::sync::Arc;

use tracing::{error, info};

use crate::agents::chat::prompt::{
    CONNECTION_FALLBACK, EMPTY_REPLY_FALLBACK, SYSTEM_INSTRUCTION, WELCOME_MESSAGE,
};
use crate::llm::{GenerateRequest, GenerativeClient, Turn};
use crate::types::message::{ChatMessage, Role, Transcript};

/// 网站聊天助手：把对话记录转发给生成式服务，并把回复追加到记录中
///
/// There is no retry and no cancellation. Service failures become a fixed
/// assistant message instead of an error.
pub struct ChatAssistant {
    client: Arc<dyn GenerativeClient>,
    system_instruction: String,
    search_grounding: bool,
}

impl ChatAssistant {
    pub fn new(client: Arc<dyn GenerativeClient>) -> Self {
        Self {
            client,
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            search_grounding: true,
        }
    }

    pub fn with_search_grounding(mut self, enabled: bool) -> Self {
        self.search_grounding = enabled;
        self
    }

    pub fn start_transcript(&self) -> Transcript {
        Transcript::with_greeting(WELCOME_MESSAGE)
    }

    /// The prior transcript followed by the new user turn.
    pub fn build_request(&self, history: &Transcript, user_text: &str) -> GenerateRequest {
        let mut contents: Vec<Turn> = history
            .iter()
            .map(|msg| Turn { role: msg.role, text: msg.text.clone() })
            .collect();
        contents.push(Turn { role: Role::User, text: user_text.to_string() });

        GenerateRequest {
            contents,
            system_instruction: self.system_instruction.clone(),
            search_grounding: self.search_grounding,
        }
    }

    /// Sends `input` and appends both the user message and the reply.
    ///
    /// Blank input is ignored and leaves the transcript untouched.
    pub async fn submit<'t>(
        &self,
        transcript: &'t mut Transcript,
        input: &str,
    ) -> Option<&'t ChatMessage> {
        let user_text = input.trim();
        if user_text.is_empty() {
            return None;
        }

        let request = self.build_request(transcript, user_text);
        transcript.push(ChatMessage::user(user_text));

        let reply = match self.client.generate(request).await {
            Ok(response) => {
                info!(sources = response.sources.len(), "assistant replied");
                let text = response
                    .text
                    .unwrap_or_else(|| EMPTY_REPLY_FALLBACK.to_string());
                ChatMessage::assistant(text).with_sources(response.sources)
            }
            Err(e) => {
                error!("Chat error: {:#}", e);
                ChatMessage::assistant(CONNECTION_FALLBACK)
            }
        };

        Some(transcript.push(reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::GenerateResponse;
    use crate::types::message::GroundingSource;
    use async_trait::async_trait;
    use std::sync::Mutex;

    enum Reply {
        Text(Option<&'static str>, Vec<GroundingSource>),
        Fail,
    }

    struct FakeClient {
        reply: Reply,
        requests: Mutex<Vec<GenerateRequest>>,
    }

    impl FakeClient {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self { reply, requests: Mutex::new(Vec::new()) })
        }
    }

    #[async_trait]
    impl GenerativeClient for FakeClient {
        async fn generate(&self, request: GenerateRequest) -> anyhow::Result<GenerateResponse> {
            self.requests.lock().unwrap().push(request);
            match &self.reply {
                Reply::Text(text, sources) => Ok(GenerateResponse {
                    text: text.map(str::to_string),
                    sources: sources.clone(),
                }),
                Reply::Fail => Err(anyhow::anyhow!("connection reset by peer")),
            }
        }
    }

    #[tokio::test]
    async fn sends_history_and_appends_reply() {
        let client = FakeClient::new(Reply::Text(Some("We build AI funnels."), vec![]));
        let assistant = ChatAssistant::new(client.clone());
        let mut transcript = assistant.start_transcript();

        let reply = assistant.submit(&mut transcript, "  What do you do?  ").await.unwrap();
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.text, "We build AI funnels.");
        assert!(reply.sources.is_none());

        let requests = client.requests.lock().unwrap();
        let request = &requests[0];
        assert_eq!(
            request.contents,
            vec![
                Turn { role: Role::Assistant, text: WELCOME_MESSAGE.into() },
                Turn { role: Role::User, text: "What do you do?".into() },
            ]
        );
        assert_eq!(request.system_instruction, SYSTEM_INSTRUCTION);
        assert!(request.search_grounding);

        let texts: Vec<&str> = transcript.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec![WELCOME_MESSAGE, "What do you do?", "We build AI funnels."]);
    }

    #[tokio::test]
    async fn second_turn_includes_first_exchange() {
        let client = FakeClient::new(Reply::Text(Some("ok"), vec![]));
        let assistant = ChatAssistant::new(client.clone()).with_search_grounding(false);
        let mut transcript = assistant.start_transcript();

        assistant.submit(&mut transcript, "first").await;
        assistant.submit(&mut transcript, "second").await;

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests[1].contents.len(), 4);
        assert_eq!(requests[1].contents[3].text, "second");
        assert!(!requests[1].search_grounding);
        assert_eq!(transcript.len(), 5);
    }

    #[tokio::test]
    async fn missing_text_uses_apology() {
        let assistant = ChatAssistant::new(FakeClient::new(Reply::Text(None, vec![])));
        let mut transcript = Transcript::new();

        let reply = assistant.submit(&mut transcript, "hello").await.unwrap();
        assert_eq!(reply.text, EMPTY_REPLY_FALLBACK);
    }

    #[tokio::test]
    async fn sources_are_attached() {
        let sources = vec![GroundingSource {
            title: "Gartner AI report".into(),
            uri: "https://example.com/report".into(),
        }];
        let assistant = ChatAssistant::new(FakeClient::new(Reply::Text(Some("See report"), sources.clone())));
        let mut transcript = Transcript::new();

        let reply = assistant.submit(&mut transcript, "trends?").await.unwrap();
        assert_eq!(reply.sources.as_ref(), Some(&sources));
    }

    #[tokio::test]
    async fn failure_keeps_user_message_and_appends_fallback() {
        let assistant = ChatAssistant::new(FakeClient::new(Reply::Fail));
        let mut transcript = assistant.start_transcript();

        let reply = assistant.submit(&mut transcript, "are you there?").await.unwrap();
        assert_eq!(reply.text, CONNECTION_FALLBACK);

        assert_eq!(transcript.len(), 3);
        let roles: Vec<Role> = transcript.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::Assistant, Role::User, Role::Assistant]);
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let client = FakeClient::new(Reply::Text(Some("unused"), vec![]));
        let assistant = ChatAssistant::new(client.clone());
        let mut transcript = assistant.start_transcript();

        assert!(assistant.submit(&mut transcript, "   \n").await.is_none());
        assert_eq!(transcript.len(), 1);
        assert!(client.requests.lock().unwrap().is_empty());
    }
}
