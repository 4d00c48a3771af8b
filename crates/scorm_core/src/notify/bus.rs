//! Typed publish/subscribe registry.

use log::trace;
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};

/// Event names observable on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    InitialiseData,
    InitialiseApi,
    Initialize,
    Terminate,
    SetValue,
    Commit,
}

impl EventKind {
    /// Stable event name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InitialiseData => "initialise_data",
            Self::InitialiseApi => "initialise_api",
            Self::Initialize => "Initialize",
            Self::Terminate => "Terminate",
            Self::SetValue => "SetValue",
            Self::Commit => "Commit",
        }
    }
}

/// One emitted notification with its fixed argument shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiEvent {
    InitialiseData,
    InitialiseApi,
    /// Raw parameter as passed by content, before validation.
    Initialize { param: String },
    /// Raw parameter as passed by content, before validation.
    Terminate { param: String },
    SetValue {
        key: String,
        value: String,
        changed: bool,
    },
    Commit,
}

impl ApiEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::InitialiseData => EventKind::InitialiseData,
            Self::InitialiseApi => EventKind::InitialiseApi,
            Self::Initialize { .. } => EventKind::Initialize,
            Self::Terminate { .. } => EventKind::Terminate,
            Self::SetValue { .. } => EventKind::SetValue,
            Self::Commit => EventKind::Commit,
        }
    }
}

type Handler = Box<dyn FnMut(&ApiEvent)>;

/// Registry of handlers keyed by event kind.
///
/// There is no removal operation; handlers live as long as the bus.
#[derive(Default)]
pub struct NotificationBus {
    handlers: BTreeMap<EventKind, Vec<Handler>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `handler` for `kind`. Duplicate registrations all fire.
    ///
    /// Only events of `kind` are delivered to `handler`.
    pub fn register(&mut self, kind: EventKind, handler: impl FnMut(&ApiEvent) + 'static) {
        self.handlers.entry(kind).or_default().push(Box::new(handler));
    }

    pub fn on_initialise_data(&mut self, mut handler: impl FnMut() + 'static) {
        self.register(EventKind::InitialiseData, move |_| handler());
    }

    pub fn on_initialise_api(&mut self, mut handler: impl FnMut() + 'static) {
        self.register(EventKind::InitialiseApi, move |_| handler());
    }

    pub fn on_initialize(&mut self, mut handler: impl FnMut(&str) + 'static) {
        self.register(EventKind::Initialize, move |event| {
            if let ApiEvent::Initialize { param } = event {
                handler(param.as_str());
            }
        });
    }

    pub fn on_terminate(&mut self, mut handler: impl FnMut(&str) + 'static) {
        self.register(EventKind::Terminate, move |event| {
            if let ApiEvent::Terminate { param } = event {
                handler(param.as_str());
            }
        });
    }

    /// Receives `(key, value, changed)`.
    pub fn on_set_value(&mut self, mut handler: impl FnMut(&str, &str, bool) + 'static) {
        self.register(EventKind::SetValue, move |event| {
            if let ApiEvent::SetValue {
                key,
                value,
                changed,
            } = event
            {
                handler(key.as_str(), value.as_str(), *changed);
            }
        });
    }

    pub fn on_commit(&mut self, mut handler: impl FnMut() + 'static) {
        self.register(EventKind::Commit, move |_| handler());
    }

    /// Invokes every handler registered for the event's kind, in order.
    ///
    /// No-op when nothing is registered. Handler panics are not caught.
    pub fn emit(&mut self, event: &ApiEvent) {
        let kind = event.kind();
        let Some(handlers) = self.handlers.get_mut(&kind) else {
            return;
        };
        trace!(
            "event=notify module=bus status=start kind={} handlers={}",
            kind.as_str(),
            handlers.len()
        );
        for handler in handlers.iter_mut() {
            handler(event);
        }
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }
}

impl Debug for NotificationBus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let counts: BTreeMap<&str, usize> = self
            .handlers
            .iter()
            .map(|(kind, handlers)| (kind.as_str(), handlers.len()))
            .collect();
        f.debug_struct("NotificationBus")
            .field("handlers", &counts)
            .finish()
    }
}
