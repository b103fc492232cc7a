//! Single-flight XHR submission controller
//!
//! The controller owns a form's submit event: it cancels native navigation,
//! sends at most one request at a time through the injected [`HttpClient`],
//! and mirrors progress on the form as state classes and on its submit
//! controls as the `disabled` attribute.
//!
//! Requests settle on a task spawned onto the [`LocalSet`] given at
//! construction. Spawning works whether or not the set is running; the
//! request settles once the owner drives the set. A submit arriving after
//! the set was dropped settles straight to `submit-error`.

use super::config::{SubmitConfig, TargetPolicy};
use super::state::{SubmitState, STATE_CLASSES};
use crate::dom::{Event, EventListener, HostElement, ListenerId, SUBMIT_EVENT};
use crate::error::{ConfigurationError, SubmissionError};
use crate::xhr::{FetchInit, HttpClient, JsonResponse};
use reqwest::Url;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tokio::sync::watch;
use tokio::task::LocalSet;

/// Attribute set on submit controls while a request is in flight
pub const DISABLED_ATTR: &str = "disabled";

/// Controller attached to one form
pub struct SubmissionController<E, C>
where
    E: HostElement + 'static,
    C: HttpClient + 'static,
{
    inner: Rc<Inner<E, C>>,
}

struct Inner<E, C> {
    form: E,
    config: SubmitConfig<E>,
    xhr: C,
    tasks: Weak<LocalSet>,
    state: watch::Sender<SubmitState>,
    last_response: RefCell<Option<JsonResponse>>,
    last_error: RefCell<Option<SubmissionError>>,
    listener: Cell<Option<ListenerId>>,
}

/// Registered on the form; does not keep the controller alive
struct SubmitListener<E, C>(Weak<Inner<E, C>>);

impl<E, C> SubmissionController<E, C>
where
    E: HostElement + 'static,
    C: HttpClient + 'static,
{
    /// Validate `form` and take over its submit event. Request completions
    /// are spawned onto `tasks`, which the controller does not keep alive.
    ///
    /// Nothing is registered on the form when validation fails.
    pub fn new(
        form: E,
        xhr: C,
        policy: &TargetPolicy,
        tasks: &Rc<LocalSet>,
    ) -> Result<Self, ConfigurationError> {
        let config = SubmitConfig::from_form(&form, policy)?;
        let (state, _) = watch::channel(SubmitState::Initial);

        let inner = Rc::new(Inner {
            form,
            config,
            xhr,
            tasks: Rc::downgrade(tasks),
            state,
            last_response: RefCell::new(None),
            last_error: RefCell::new(None),
            listener: Cell::new(None),
        });

        let listener: Rc<dyn EventListener> = Rc::new(SubmitListener(Rc::downgrade(&inner)));
        let id = inner.form.add_event_listener(SUBMIT_EVENT, listener);
        inner.listener.set(Some(id));

        tracing::debug!(
            url = %inner.config.target,
            triggers = inner.config.triggers.len(),
            "Form controller attached"
        );

        Ok(Self { inner })
    }

    /// Handle a submit event for the form.
    ///
    /// Does nothing when `event` was already cancelled. Otherwise the native
    /// submission is always cancelled, and a request is started unless one is
    /// already in flight.
    pub fn handle_submit(&self, event: &dyn Event) {
        Inner::handle_submit(&self.inner, event);
    }

    /// Current submission state
    pub fn state(&self) -> SubmitState {
        *self.inner.state.borrow()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<SubmitState> {
        self.inner.state.subscribe()
    }

    /// Validated `action-xhr` URL every request is sent to
    pub fn target(&self) -> &Url {
        &self.inner.config.target
    }

    /// Submit controls found when the controller was created
    pub fn triggers(&self) -> &[E] {
        &self.inner.config.triggers
    }

    /// Form this controller was created for
    pub fn form(&self) -> &E {
        &self.inner.form
    }

    /// Response of the most recent successful submission
    pub fn last_response(&self) -> Option<JsonResponse> {
        self.inner.last_response.borrow().clone()
    }

    /// Failure of the most recent submission, cleared on success
    pub fn last_error(&self) -> Option<SubmissionError> {
        self.inner.last_error.borrow().clone()
    }

    /// Unbind from the form. Submits after this are not intercepted; a
    /// request already in flight still settles.
    pub fn detach(&self) {
        if let Some(id) = self.inner.listener.take() {
            self.inner.form.remove_event_listener(id);
            tracing::debug!(url = %self.inner.config.target, "Form controller detached");
        }
    }
}

impl<E, C> Drop for SubmissionController<E, C>
where
    E: HostElement + 'static,
    C: HttpClient + 'static,
{
    fn drop(&mut self) {
        self.detach();
    }
}

impl<E, C> Inner<E, C>
where
    E: HostElement + 'static,
    C: HttpClient + 'static,
{
    fn handle_submit(this: &Rc<Self>, event: &dyn Event) {
        if event.default_prevented() {
            tracing::debug!("Submit already cancelled upstream, ignoring");
            return;
        }
        event.prevent_default();

        if *this.state.borrow() == SubmitState::Submitting {
            tracing::debug!(url = %this.config.target, "Submission already in flight");
            return;
        }

        let Some(tasks) = this.tasks.upgrade() else {
            tracing::warn!(url = %this.config.target, "Task set dropped, request not sent");
            this.settle(Err(SubmissionError::Unscheduled));
            return;
        };

        this.transition(SubmitState::Submitting);
        for trigger in &this.config.triggers {
            trigger.set_attribute(DISABLED_ATTR, "");
        }

        let request = this
            .xhr
            .fetch_json(&this.config.target, &FetchInit::form_submission());
        let inner = Rc::clone(this);
        tasks.spawn_local(async move {
            let result = request.await;
            inner.settle(result);
        });
    }

    fn settle(&self, result: Result<JsonResponse, SubmissionError>) {
        for trigger in &self.config.triggers {
            trigger.remove_attribute(DISABLED_ATTR);
        }

        match result {
            Ok(response) => {
                tracing::debug!(
                    url = %self.config.target,
                    status = response.status,
                    "Form submitted"
                );
                *self.last_error.borrow_mut() = None;
                *self.last_response.borrow_mut() = Some(response);
                self.transition(SubmitState::SubmitSuccess);
            }
            Err(err) => {
                tracing::warn!(url = %self.config.target, error = %err, "Form submission failed");
                *self.last_error.borrow_mut() = Some(err);
                self.transition(SubmitState::SubmitError);
            }
        }
    }

    /// Move to `next`, leaving only its class among the state classes
    fn transition(&self, next: SubmitState) {
        let keep = next.class();
        for class in STATE_CLASSES {
            if Some(class) != keep {
                self.form.remove_class(class);
            }
        }
        if let Some(class) = keep {
            self.form.add_class(class);
        }

        let previous = self.state.send_replace(next);
        tracing::debug!(from = %previous, to = %next, "Form state changed");
    }
}

impl<E, C> EventListener for SubmitListener<E, C>
where
    E: HostElement + 'static,
    C: HttpClient + 'static,
{
    fn handle_event(&self, event: &dyn Event) {
        if let Some(inner) = self.0.upgrade() {
            Inner::handle_submit(&inner, event);
        }
    }
}
