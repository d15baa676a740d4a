//! Page runtime - executes effects and feeds outcomes back into the page.
//!
//! This is the I/O boundary: pages stay pure and return effects; the
//! runtime awaits each effect in order, so an outcome is always applied
//! before the next effect starts. Unmounting cancels the runtime's token;
//! effects still queued are skipped and the one in flight is abandoned.

mod handlers;

use std::collections::VecDeque;

use taskflow_core::Session;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::effects::Effect;
use crate::state::Component;

pub use handlers::execute;

pub struct PageRuntime<'s> {
    session: &'s mut Session,
    cancel: CancellationToken,
}

impl<'s> PageRuntime<'s> {
    pub fn new(session: &'s mut Session) -> Self {
        Self {
            session,
            cancel: CancellationToken::new(),
        }
    }

    pub fn session(&mut self) -> &mut Session {
        &mut *self.session
    }

    /// Token cancelled on unmount; clone it to unmount from another task.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Mounts the page and runs its mount effects to completion.
    pub async fn mount<C: Component>(&mut self, page: &mut C) {
        let effects = page.mount();
        self.drive(page, effects).await;
    }

    /// Applies a user action and runs the resulting effects.
    pub async fn dispatch<C: Component>(&mut self, page: &mut C, action: C::Action) {
        let effects = page.update(action);
        self.drive(page, effects).await;
    }

    /// Cancels in-flight work and tells the page to drop late outcomes.
    pub fn unmount<C: Component>(&mut self, page: &mut C) {
        self.cancel.cancel();
        page.unmount();
    }

    async fn drive<C: Component>(&mut self, page: &mut C, effects: Vec<Effect>) {
        let mut queue: VecDeque<Effect> = effects.into();

        while let Some(effect) = queue.pop_front() {
            if self.cancel.is_cancelled() {
                debug!(remaining = queue.len() + 1, "Page unmounted, skipping effects");
                return;
            }

            let task = effect.task();
            let outcome = tokio::select! {
                () = self.cancel.cancelled() => {
                    debug!(?task, "Effect abandoned on unmount");
                    return;
                }
                outcome = execute(effect, &mut *self.session) => outcome,
            };

            queue.extend(page.apply(outcome));
        }
    }
}
