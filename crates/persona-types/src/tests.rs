#[cfg(test)]
mod tests {
    use crate::config::*;
    use crate::error::*;
    use crate::event::*;
    use crate::message::*;
    use crate::session::*;
    use crate::user::*;

    fn ana() -> User {
        User {
            id: "u1".to_string(),
            name: "Ana".to_string(),
            email: "a@b.com".to_string(),
            profile_pic: None,
            details: ProfileDetails::default(),
        }
    }

    // ─── User Tests ──────────────────────────────────────────

    #[test]
    fn test_user_deserializes_backend_shape() {
        let json = r#"{"_id":"u1","name":"Ana","email":"a@b.com","profilePic":"pic.png","occupation":"Engineer"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.name, "Ana");
        assert_eq!(user.profile_pic.as_deref(), Some("pic.png"));
        assert_eq!(user.details.occupation.as_deref(), Some("Engineer"));
        assert!(user.details.phone.is_none());
    }

    #[test]
    fn test_user_serializes_with_backend_field_names() {
        let json = serde_json::to_string(&ana()).unwrap();
        assert!(json.contains(r#""_id":"u1""#));
        assert!(!json.contains("profilePic"));
        assert!(!json.contains("occupation"));
    }

    #[test]
    fn test_user_merged_applies_present_fields_only() {
        let update = ProfileUpdate {
            name: Some("Ana Maria".to_string()),
            location: Some("Lisbon".to_string()),
            ..ProfileUpdate::default()
        };
        let merged = ana().merged(&update);
        assert_eq!(merged.name, "Ana Maria");
        assert_eq!(merged.email, "a@b.com");
        assert_eq!(merged.details.location.as_deref(), Some("Lisbon"));
        assert!(merged.details.occupation.is_none());
    }

    #[test]
    fn test_profile_update_is_empty() {
        assert!(ProfileUpdate::default().is_empty());
        let update = ProfileUpdate {
            phone: Some("123".to_string()),
            ..ProfileUpdate::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_profile_update_camel_case() {
        let update = ProfileUpdate {
            birth_date: Some("1990-01-01".to_string()),
            ..ProfileUpdate::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"birthDate":"1990-01-01"}"#);
    }

    #[test]
    fn test_auth_response_into_session() {
        let json = r#"{"token":"t1","_id":"u1","name":"Ana","email":"a@b.com"}"#;
        let response: AuthResponse = serde_json::from_str(json).unwrap();
        let (token, user) = response.into_session();
        assert_eq!(token.as_str(), "t1");
        assert_eq!(user, ana());
    }

    #[test]
    fn test_contact_form_serialization() {
        let form = ContactForm {
            first_name: "Ana".to_string(),
            last_name: "Silva".to_string(),
            email: "a@b.com".to_string(),
            subject: "Hi".to_string(),
            message: "Hello".to_string(),
        };
        let json = serde_json::to_string(&form).unwrap();
        assert!(json.contains("firstName"));
        assert!(json.contains("lastName"));
    }

    // ─── Session Tests ───────────────────────────────────────

    #[test]
    fn test_session_state_default_is_unknown() {
        assert_eq!(SessionState::default(), SessionState::Unknown);
    }

    #[test]
    fn test_session_state_user() {
        assert!(SessionState::Anonymous.user().is_none());
        assert!(!SessionState::Loading.is_authenticated());
        let state = SessionState::Authenticated(ana());
        assert!(state.is_authenticated());
        assert_eq!(state.user().unwrap().name, "Ana");
        assert_eq!(state.label(), "authenticated");
    }

    #[test]
    fn test_session_state_serialization() {
        let json = serde_json::to_string(&SessionState::Anonymous).unwrap();
        assert_eq!(json, r#"{"status":"anonymous"}"#);

        let json = serde_json::to_string(&SessionState::Authenticated(ana())).unwrap();
        assert!(json.contains(r#""status":"authenticated""#));
        assert!(json.contains(r#""name":"Ana""#));
    }

    #[test]
    fn test_session_token_debug_is_redacted() {
        let token = SessionToken::new("secret-token");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("secret-token"));
        assert_eq!(token.bearer(), "Bearer secret-token");
    }

    #[test]
    fn test_session_token_is_empty() {
        assert!(SessionToken::new("  ").is_empty());
        assert!(!SessionToken::new("t1").is_empty());
    }

    // ─── Message Tests ───────────────────────────────────────

    #[test]
    fn test_message_constructors() {
        let msg = Message::user(MessageId(1), "Hello");
        assert_eq!(msg.sender, Sender::User);
        assert!(msg.is_user());

        let msg = Message::assistant(MessageId(2), "Hi");
        assert_eq!(msg.sender, Sender::Assistant);
        assert_eq!(msg.id, MessageId(2));
    }

    #[test]
    fn test_sender_serialization() {
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), r#""user""#);
        assert_eq!(serde_json::to_string(&Sender::Assistant).unwrap(), r#""assistant""#);
    }

    #[test]
    fn test_conversation_state_default() {
        let state = ConversationState::default();
        assert!(state.messages.is_empty());
        assert!(!state.awaiting_response);
        assert_eq!(state.pending_replies, 0);
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("awaitingResponse"));
    }

    // ─── Event Tests ─────────────────────────────────────────

    #[test]
    fn test_notice_levels() {
        assert!(Notice::error("Login failed", "bad").is_error());
        assert!(!Notice::success("Logged out", "bye").is_error());
        assert_eq!(Notice::info("a", "b").level, NoticeLevel::Info);
    }

    #[test]
    fn test_route_paths_roundtrip() {
        for route in Route::all() {
            assert_eq!(Route::from_path(route.path()), Some(*route));
        }
        assert_eq!(Route::from_path("/chat/"), Some(Route::Chat));
        assert_eq!(Route::from_path(""), Some(Route::Home));
        assert_eq!(Route::from_path("/nowhere"), None);
    }

    #[test]
    fn test_route_requires_auth() {
        assert!(Route::Chat.requires_auth());
        assert!(Route::Profile.requires_auth());
        assert!(!Route::Login.requires_auth());
    }

    #[test]
    fn test_persona_event_serialization() {
        let event = PersonaEvent::Navigated { route: Route::Chat };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"Navigated","route":"chat"}"#);

        let event = PersonaEvent::Notice(Notice::success("Logged out", "bye"));
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"Notice""#));
        assert!(json.contains(r#""level":"success""#));
    }

    // ─── Config Tests ────────────────────────────────────────

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.storage.token_key, "token");
        assert_eq!(config.storage.backend, TokenStoreBackend::Auto);
        assert_eq!(config.chat.reply_delay_ms, 1500);
        assert!(config.chat.greeting.is_none());
        assert!(!config.chat.fallback_reply.is_empty());
    }

    #[test]
    fn test_partial_config_from_json() {
        let config = ClientConfig::from_json(r#"{"api":{"base_url":"https://api.example.com/"}}"#).unwrap();
        assert_eq!(config.api.endpoint(LOGIN_PATH), "https://api.example.com/api/auth/login");
        assert_eq!(config.storage.token_key, "token");
    }

    #[test]
    fn test_invalid_config_json() {
        let err = ClientConfig::from_json("{{").unwrap_err();
        assert!(matches!(err, PersonaError::Serialization(_)));
    }

    #[test]
    fn test_chat_config_with_greeting() {
        let chat = ChatConfig::default().with_greeting(DEFAULT_GREETING);
        assert!(chat.greeting.unwrap().starts_with("Hi there!"));
    }

    // ─── Error Tests ─────────────────────────────────────────

    #[test]
    fn test_login_status_classification() {
        let err = PersonaError::from_status(AuthOperation::Login, 401, Some("Invalid email or password".to_string()));
        assert_eq!(err, PersonaError::Authentication("Invalid email or password".to_string()));

        let err = PersonaError::from_status(AuthOperation::Login, 400, None);
        assert_eq!(err, PersonaError::Authentication("Authentication failed".to_string()));

        let err = PersonaError::from_status(AuthOperation::Login, 503, None);
        assert!(matches!(err, PersonaError::Server { status: 503, .. }));
    }

    #[test]
    fn test_register_status_classification() {
        let err = PersonaError::from_status(AuthOperation::Register, 409, Some("User already exists".to_string()));
        assert_eq!(err, PersonaError::Validation("User already exists".to_string()));

        let err = PersonaError::from_status(AuthOperation::Register, 500, None);
        assert!(matches!(err, PersonaError::Server { status: 500, .. }));
    }

    #[test]
    fn test_profile_status_classification() {
        let err = PersonaError::from_status(AuthOperation::FetchProfile, 401, None);
        assert!(matches!(err, PersonaError::Authentication(_)));

        let err = PersonaError::from_status(AuthOperation::FetchProfile, 404, None);
        assert!(matches!(err, PersonaError::Server { status: 404, .. }));

        let err = PersonaError::from_status(AuthOperation::UpdateProfile, 401, None);
        assert!(matches!(err, PersonaError::Server { status: 401, .. }));
    }

    #[test]
    fn test_error_display() {
        let err = PersonaError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "Network error: connection refused");

        let err = PersonaError::Server { status: 500, message: None };
        assert_eq!(err.to_string(), "Server error: HTTP 500");

        assert_eq!(PersonaError::Cancelled.to_string(), "Cancelled");
    }

    #[test]
    fn test_error_user_message() {
        let err = PersonaError::Authentication("Invalid credentials".to_string());
        assert_eq!(err.user_message(), "Invalid credentials");

        let err = PersonaError::Server { status: 502, message: None };
        assert!(err.user_message().contains("502"));

        let err = PersonaError::Network("dns".to_string());
        assert!(!err.user_message().contains("dns"));

        let err = PersonaError::Storage("SecurityError".to_string());
        assert!(!err.user_message().contains("SecurityError"));
    }

    #[test]
    fn test_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{{invalid}}").unwrap_err();
        let err: PersonaError = serde_err.into();
        assert!(matches!(err, PersonaError::Serialization(_)));
    }
}
