//! The `/jiraa` slash command
//!
//! [`CommandRouter::execute`] turns one invocation into exactly one
//! [`CommandOutcome`] and exactly one chat delivery:
//!
//! * no argument or `help` → help text as a notification
//! * anything else is an issue key → lookup, then either a room message with
//!   the issue card or an error notification

pub mod messages;

use std::sync::Arc;

use jiraa_core::models::{
    CommandContext, CommandMetadata, CommandOutcome, Delivery, FailureReason, IssueKey,
    Notification, RoomMessage,
};
use jiraa_tracker::{LookupError, TrackerClient};

use crate::chat::{self, ChatEmitter};
use crate::credentials::{ConfigError, CredentialResolver};
use crate::presenter;
use crate::settings::SettingsReader;

const HELP_ARGUMENT: &str = "help";

/// What the arguments ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    NoArgs,
    Help,
    Lookup(IssueKey),
}

impl Invocation {
    /// Only the first argument is considered.
    pub fn parse(arguments: &[String]) -> Self {
        match arguments.first().map(String::as_str) {
            None => Invocation::NoArgs,
            Some(HELP_ARGUMENT) => Invocation::Help,
            Some(argument) => match IssueKey::new(argument) {
                Ok(key) => Invocation::Lookup(key),
                Err(_) => Invocation::NoArgs,
            },
        }
    }
}

pub struct CommandRouter {
    metadata: CommandMetadata,
    resolver: CredentialResolver,
    tracker: TrackerClient,
}

impl CommandRouter {
    pub fn new(settings: Arc<dyn SettingsReader>, tracker: TrackerClient) -> Self {
        Self {
            metadata: CommandMetadata::default(),
            resolver: CredentialResolver::new(settings),
            tracker,
        }
    }

    pub fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    pub async fn execute(
        &self,
        context: &CommandContext,
        chat: &dyn ChatEmitter,
    ) -> CommandOutcome {
        let invocation = Invocation::parse(&context.arguments);
        tracing::info!(
            "/{} from {} in {}: {:?}",
            self.metadata.command,
            context.sender,
            context.room_id,
            invocation
        );

        let outcome = match &invocation {
            Invocation::NoArgs | Invocation::Help => CommandOutcome::Help,
            Invocation::Lookup(key) => self.lookup(key).await,
        };

        let delivery = render(&outcome, context);
        if let Err(e) = chat::deliver(chat, delivery).await {
            tracing::error!("Failed to deliver /{} response: {}", self.metadata.command, e);
        }

        outcome
    }

    async fn lookup(&self, key: &IssueKey) -> CommandOutcome {
        let credentials = match self.resolver.resolve().await {
            Ok(credentials) => credentials,
            Err(ConfigError::MissingSettings(missing)) => {
                tracing::warn!("Lookup of {} skipped: missing settings {:?}", key, missing);
                return CommandOutcome::LookupError(FailureReason::Configuration { missing });
            }
        };

        match self.tracker.fetch_issue(&credentials, key).await {
            Ok(payload) => {
                CommandOutcome::LookupSuccess(presenter::present(&credentials, &payload))
            }
            Err(LookupError::NotFound(key)) => CommandOutcome::LookupNotFound(key),
            Err(LookupError::Unexpected(cause)) => {
                tracing::warn!("Lookup of {} failed: {}", key, cause);
                CommandOutcome::LookupError(FailureReason::Unexpected {
                    key: key.clone(),
                    cause: cause.to_string(),
                })
            }
        }
    }
}

/// The single chat response for an outcome.
pub fn render(outcome: &CommandOutcome, context: &CommandContext) -> Delivery {
    let notify = |text: String| {
        Delivery::Notification(Notification::markdown(
            context.sender.as_str(),
            context.room_id.as_str(),
            text,
        ))
    };

    match outcome {
        CommandOutcome::Help => notify(messages::help_text()),
        CommandOutcome::LookupSuccess(summary) => Delivery::RoomMessage(
            RoomMessage::new(context.room_id.as_str())
                .with_attachment(presenter::attachment(summary)),
        ),
        CommandOutcome::LookupNotFound(key) => notify(messages::not_found(key.as_str())),
        CommandOutcome::LookupError(FailureReason::Configuration { missing }) => {
            notify(messages::not_configured(missing))
        }
        CommandOutcome::LookupError(FailureReason::Unexpected { key, .. }) => {
            notify(messages::lookup_failed(key.as_str()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatError, Transcript};
    use httpmock::prelude::*;
    use jiraa_core::models::{AppSetting, FailureReason, SettingValues};
    use serde_json::json;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn context(arguments: &[&str]) -> CommandContext {
        CommandContext::new("alice", "GENERAL", args(arguments))
    }

    fn router_for(base_url: &str) -> CommandRouter {
        let settings = SettingValues::new()
            .with(AppSetting::JiraAltUrl, base_url)
            .with(AppSetting::JiraAltToken, "tok");
        CommandRouter::new(Arc::new(settings), TrackerClient::new())
    }

    fn issue_body(key: &str, summary: &str, assignee: serde_json::Value) -> serde_json::Value {
        json!({
            "key": key,
            "fields": {
                "summary": summary,
                "status": {"name": "Open", "statusCategory": {"colorName": "blue-gray"}},
                "priority": {"name": "Medium"},
                "issuetype": {"name": "Task"},
                "assignee": assignee,
                "project": {"avatarUrls": {"48x48": "https://example.com/avatar48.png"}}
            }
        })
    }

    fn only_notification(deliveries: &[Delivery]) -> &Notification {
        assert_eq!(deliveries.len(), 1, "expected exactly one delivery");
        match &deliveries[0] {
            Delivery::Notification(notification) => notification,
            other => panic!("expected a notification, got {:?}", other),
        }
    }

    #[test]
    fn test_invocation_parse() {
        assert_eq!(Invocation::parse(&[]), Invocation::NoArgs);
        assert_eq!(Invocation::parse(&args(&["help"])), Invocation::Help);
        assert_eq!(Invocation::parse(&args(&["  "])), Invocation::NoArgs);
        assert_eq!(
            Invocation::parse(&args(&["PROJ-1", "extra"])),
            Invocation::Lookup(IssueKey::new("PROJ-1").unwrap())
        );
        // Only the literal lowercase word is the help sub-command.
        assert_eq!(
            Invocation::parse(&args(&["HELP"])),
            Invocation::Lookup(IssueKey::new("HELP").unwrap())
        );
    }

    #[tokio::test]
    async fn test_no_args_sends_help_notification() {
        let router = router_for("http://127.0.0.1:1");
        let transcript = Transcript::new();

        let outcome = router.execute(&context(&[]), &transcript).await;

        assert_eq!(outcome, CommandOutcome::Help);
        let deliveries = transcript.deliveries().await;
        let notification = only_notification(&deliveries);
        assert_eq!(notification.recipient, "alice");
        assert!(notification.text().contains("`/jiraa ISSUE-ID` to display an issue"));
        assert!(notification.text().contains("`/jiraa [help]` to get help"));
    }

    #[tokio::test]
    async fn test_help_never_touches_settings_or_tracker() {
        let router = CommandRouter::new(Arc::new(SettingValues::new()), TrackerClient::new());
        let transcript = Transcript::new();

        let outcome = router.execute(&context(&["help"]), &transcript).await;

        assert_eq!(outcome, CommandOutcome::Help);
        only_notification(&transcript.deliveries().await);
    }

    #[tokio::test]
    async fn test_lookup_success_posts_room_message() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/api/3/issue/PROJ-1")
                    .header("Authorization", "Basic dG9r");
                then.status(200)
                    .json_body(issue_body("PROJ-1", "Fix bug", json!(null)));
            })
            .await;

        let router = router_for(&server.base_url());
        let transcript = Transcript::new();

        let outcome = router.execute(&context(&["PROJ-1"]), &transcript).await;
        mock.assert_async().await;

        let summary = match outcome {
            CommandOutcome::LookupSuccess(summary) => summary,
            other => panic!("expected success, got {:?}", other),
        };
        assert_eq!(summary.assignee_name, "Unassigned");

        let deliveries = transcript.deliveries().await;
        assert_eq!(deliveries.len(), 1);
        let message = match &deliveries[0] {
            Delivery::RoomMessage(message) => message,
            other => panic!("expected a room message, got {:?}", other),
        };
        assert_eq!(message.room_id, "GENERAL");
        let attachment = &message.attachments[0];
        assert_eq!(attachment.author.name, "PROJ-1: Fix bug");
        assert_eq!(
            attachment.title.link,
            format!("{}/browse/PROJ-1", server.base_url())
        );
        let assignee = attachment
            .fields
            .iter()
            .find(|f| f.title == "Assignee")
            .unwrap();
        assert_eq!(assignee.value, "`Unassigned`");
    }

    #[tokio::test]
    async fn test_lookup_twice_yields_identical_summaries() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/api/3/issue/PROJ-9");
                then.status(200).json_body(issue_body(
                    "PROJ-9",
                    "Same",
                    json!({"displayName": "Ada"}),
                ));
            })
            .await;

        let router = router_for(&server.base_url());
        let transcript = Transcript::new();

        let first = router.execute(&context(&["PROJ-9"]), &transcript).await;
        let second = router.execute(&context(&["PROJ-9"]), &transcript).await;

        assert!(first.is_success());
        assert_eq!(first, second);
        assert_eq!(transcript.deliveries().await.len(), 2);
    }

    #[tokio::test]
    async fn test_lookup_not_found_notifies() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/rest/api/3/issue/MISSING-1");
                then.status(404);
            })
            .await;

        let router = router_for(&server.base_url());
        let transcript = Transcript::new();

        let outcome = router.execute(&context(&["MISSING-1"]), &transcript).await;

        assert_eq!(
            outcome,
            CommandOutcome::LookupNotFound(IssueKey::new("MISSING-1").unwrap())
        );
        let deliveries = transcript.deliveries().await;
        assert_eq!(
            only_notification(&deliveries).text(),
            "Issue `MISSING-1` not found."
        );
    }

    #[tokio::test]
    async fn test_lookup_unexpected_status_notifies_once() {
        for status in [401u16, 500] {
            let server = MockServer::start_async().await;
            server
                .mock_async(|when, then| {
                    when.method(GET).path("/rest/api/3/issue/PROJ-2");
                    then.status(status);
                })
                .await;

            let router = router_for(&server.base_url());
            let transcript = Transcript::new();

            let outcome = router.execute(&context(&["PROJ-2"]), &transcript).await;

            match outcome {
                CommandOutcome::LookupError(FailureReason::Unexpected { key, cause }) => {
                    assert_eq!(key.as_str(), "PROJ-2");
                    assert!(cause.contains(&status.to_string()));
                }
                other => panic!("expected unexpected failure, got {:?}", other),
            }
            let deliveries = transcript.deliveries().await;
            assert!(only_notification(&deliveries).text().contains("`PROJ-2`"));
        }
    }

    #[tokio::test]
    async fn test_lookup_transport_failure_notifies_once() {
        let router = router_for("http://127.0.0.1:1");
        let transcript = Transcript::new();

        let outcome = router.execute(&context(&["PROJ-3"]), &transcript).await;

        assert!(matches!(
            outcome,
            CommandOutcome::LookupError(FailureReason::Unexpected { .. })
        ));
        only_notification(&transcript.deliveries().await);
    }

    #[tokio::test]
    async fn test_missing_settings_notify_configuration_error() {
        let settings = SettingValues::new().with(AppSetting::JiraAltToken, "tok");
        let router = CommandRouter::new(Arc::new(settings), TrackerClient::new());
        let transcript = Transcript::new();

        let outcome = router.execute(&context(&["PROJ-1"]), &transcript).await;

        assert_eq!(
            outcome,
            CommandOutcome::LookupError(FailureReason::Configuration {
                missing: vec![AppSetting::JiraAltUrl]
            })
        );
        let deliveries = transcript.deliveries().await;
        let text = only_notification(&deliveries).text();
        assert!(text.contains("not configured"));
        assert!(text.contains("`jiraalt_url`"));
    }

    /// Emitter whose backend refuses everything.
    struct RejectingChat;

    #[async_trait::async_trait]
    impl ChatEmitter for RejectingChat {
        async fn send_room_message(&self, _message: RoomMessage) -> crate::chat::Result<()> {
            Err(ChatError::Rejected("room is archived".to_string()))
        }

        async fn notify_user(&self, _notification: Notification) -> crate::chat::Result<()> {
            Err(ChatError::Rejected("user left".to_string()))
        }
    }

    #[tokio::test]
    async fn test_rejected_delivery_still_returns_outcome() {
        let router = router_for("http://127.0.0.1:1");

        let outcome = router.execute(&context(&["help"]), &RejectingChat).await;

        assert_eq!(outcome, CommandOutcome::Help);
    }
}
