//! Conversation engine: the chat pipeline behind one chat view.
//!
//! `send_message` appends the user message synchronously and spawns the
//! reply on the local executor. Each reply is placed directly after the
//! user message that triggered it, however many other sends started since,
//! so `[A, B]` sent back to back always settles as `[A, reply(A), B, reply(B)]`.
//!
//! Reply tasks hold only a weak reference to the conversation plus the
//! engine's cancel token; after `teardown` (or drop) they exit without
//! touching state.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use futures::task::{LocalSpawn, LocalSpawnExt};
use persona_types::{
    PersonaError,
    config::ChatConfig,
    message::{ConversationState, Message, MessageId},
};

use crate::cancel::CancelToken;
use crate::ports::ResponseGenerator;

/// Conversation plus its id allocator.
struct Ledger {
    state: ConversationState,
    next_id: u64,
}

impl Ledger {
    fn allocate_id(&mut self) -> MessageId {
        self.next_id += 1;
        MessageId(self.next_id)
    }

    fn push_user(&mut self, text: &str) -> MessageId {
        let id = self.allocate_id();
        self.state.messages.push(Message::user(id, text));
        self.state.pending_replies += 1;
        self.state.awaiting_response = true;
        id
    }

    /// Insert a reply right after its trigger and release the pending slot.
    fn settle_reply(&mut self, trigger: MessageId, text: String) -> MessageId {
        let id = self.allocate_id();
        let messages = &mut self.state.messages;
        let at = messages
            .iter()
            .position(|m| m.id == trigger)
            .map(|i| i + 1)
            .unwrap_or(messages.len());
        messages.insert(at, Message::assistant(id, text));
        self.state.pending_replies = self.state.pending_replies.saturating_sub(1);
        self.state.awaiting_response = self.state.pending_replies > 0;
        id
    }
}

pub struct ConversationEngine {
    ledger: Rc<RefCell<Ledger>>,
    generator: Rc<dyn ResponseGenerator>,
    spawner: Rc<dyn LocalSpawn>,
    cancel: CancelToken,
    fallback_reply: String,
}

impl ConversationEngine {
    /// Mount a conversation. Seeds the configured greeting, if any.
    pub fn new(
        config: &ChatConfig,
        generator: Rc<dyn ResponseGenerator>,
        spawner: Rc<dyn LocalSpawn>,
    ) -> Self {
        let mut ledger = Ledger {
            state: ConversationState::default(),
            next_id: 0,
        };
        if let Some(greeting) = config.greeting.as_deref().filter(|g| !g.trim().is_empty()) {
            let id = ledger.allocate_id();
            ledger.state.messages.push(Message::assistant(id, greeting));
        }
        Self {
            ledger: Rc::new(RefCell::new(ledger)),
            generator,
            spawner,
            cancel: CancelToken::new(),
            fallback_reply: config.fallback_reply.clone(),
        }
    }

    /// Append a user message and schedule its reply.
    ///
    /// Blank input is ignored. Returns the id of the new user message.
    pub fn send_message(&self, text: &str) -> Option<MessageId> {
        if text.trim().is_empty() {
            return None;
        }
        if self.cancel.is_cancelled() {
            log::warn!("Message sent to a closed conversation; ignoring");
            return None;
        }

        let (trigger, history) = {
            let mut ledger = self.ledger.borrow_mut();
            let id = ledger.push_user(text);
            (id, ledger.state.messages.clone())
        };

        let task = deliver_reply(
            Rc::downgrade(&self.ledger),
            self.generator.clone(),
            self.cancel.clone(),
            trigger,
            history,
            self.fallback_reply.clone(),
        );
        if let Err(e) = self.spawner.spawn_local(task) {
            log::error!("Could not schedule reply: {:?}", e);
            self.ledger
                .borrow_mut()
                .settle_reply(trigger, self.fallback_reply.clone());
        }
        Some(trigger)
    }

    pub fn snapshot(&self) -> ConversationState {
        self.ledger.borrow().state.clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.ledger.borrow().state.messages.clone()
    }

    pub fn len(&self) -> usize {
        self.ledger.borrow().state.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Typing indicator
    pub fn awaiting_response(&self) -> bool {
        self.ledger.borrow().state.awaiting_response
    }

    pub fn pending_replies(&self) -> usize {
        self.ledger.borrow().state.pending_replies
    }

    /// Close the view. Replies still in flight are discarded.
    pub fn teardown(&self) {
        if !self.cancel.is_cancelled() {
            log::debug!(
                "Conversation closed with {} pending replies",
                self.pending_replies()
            );
        }
        self.cancel.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for ConversationEngine {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn deliver_reply(
    ledger: Weak<RefCell<Ledger>>,
    generator: Rc<dyn ResponseGenerator>,
    cancel: CancelToken,
    trigger: MessageId,
    history: Vec<Message>,
    fallback: String,
) {
    let text = match generator.generate(&history, &cancel).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            log::warn!("Generator returned an empty reply; using fallback");
            fallback
        }
        Err(PersonaError::Cancelled) if cancel.is_cancelled() => {
            log::debug!("Reply to {:?} cancelled", trigger);
            return;
        }
        Err(e) => {
            log::warn!("Reply generation failed: {}; using fallback", e);
            fallback
        }
    };

    if cancel.is_cancelled() {
        log::debug!("Conversation closed; dropping reply to {:?}", trigger);
        return;
    }
    let Some(ledger) = ledger.upgrade() else {
        return;
    };
    ledger.borrow_mut().settle_reply(trigger, text);
}
