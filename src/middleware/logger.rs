//! Logging [Middleware] which reports every action, the state around
//! it, and the events it produced through the [log] facade.

use super::{Middleware, NotifyFn, ReduceFn, ReduceMiddlewareResult};
use crate::{Store, StoreEvent};
use std::{fmt::Debug, hash::Hash};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
}

impl LogLevel {
    fn level(self) -> log::Level {
        match self {
            LogLevel::Trace => log::Level::Trace,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Debug
    }
}

#[derive(Debug, Clone)]
pub struct LoggerMiddleware {
    log_level: LogLevel,
    log_state: bool,
}

impl LoggerMiddleware {
    pub fn new() -> Self {
        LoggerMiddleware {
            log_level: LogLevel::default(),
            log_state: true,
        }
    }

    pub fn log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    /// Whether to log the state before and after every action. On by
    /// default; large states may want only actions and events.
    pub fn log_state(mut self, log_state: bool) -> Self {
        self.log_state = log_state;
        self
    }

    fn enabled(&self) -> bool {
        log::log_enabled!(self.log_level.level())
    }
}

impl<State, Action, Event> Middleware<State, Action, Event> for LoggerMiddleware
where
    State: Debug,
    Action: Debug,
    Event: StoreEvent + Clone + Hash + Eq + Debug,
{
    fn on_reduce(
        &self,
        store: &Store<State, Action, Event>,
        action: Option<&Action>,
        reduce: ReduceFn<State, Action, Event>,
    ) -> ReduceMiddlewareResult<Event> {
        let level = self.log_level.level();
        if !self.enabled() {
            return reduce(store, action);
        }

        match action {
            Some(action) => {
                if self.log_state {
                    log::log!(level, "prev state: {:?}", store.state());
                }
                log::log!(level, "action: {:?}", action);
            }
            None => log::log!(level, "action: None"),
        }

        let result = reduce(store, action);

        if action.is_some() && self.log_state {
            log::log!(level, "next state: {:?}", store.state());
        }

        result
    }

    fn on_notify(
        &self,
        store: &Store<State, Action, Event>,
        events: Vec<Event>,
        notify: NotifyFn<State, Action, Event>,
    ) -> Vec<Event> {
        let level = self.log_level.level();
        for event in &events {
            log::log!(level, "event: {:?}", event);
        }

        notify(store, events)
    }
}

#[cfg(test)]
mod tests {
    use super::{LogLevel, LoggerMiddleware};
    use crate::{configure_store, create_slice, StoreConfig};

    #[test]
    fn logger_passes_actions_through() {
        let router = create_slice("router", vec![("route", "/")]).unwrap();
        let store = configure_store(
            StoreConfig::new()
                .slice(router.slice())
                .middleware(LoggerMiddleware::new().log_level(LogLevel::Trace)),
        );

        store.dispatch(router.action("setRoute").unwrap().create("/profile"));
        assert_eq!(
            router.selector("getRoute").unwrap().select(&store.state()),
            Some(&serde_json::json!("/profile"))
        );
    }

    #[test]
    fn builder_options() {
        let logger = LoggerMiddleware::new()
            .log_level(LogLevel::Warn)
            .log_state(false);
        assert_eq!(logger.log_level, LogLevel::Warn);
        assert!(!logger.log_state);
        assert!(LoggerMiddleware::new().log_state);
    }
}
