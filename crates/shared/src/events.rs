//! Observer plumbing between the viewport and whoever renders or looks up weather.

use std::fmt;

use crate::models::GeoCoordinate;

/// Something the presentation layer or lookup collaborator may react to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportEvent {
    /// A point was designated for a weather lookup.
    CoordinateSelected(GeoCoordinate),
    /// Zoom or pan changed, or the pin moved. `pin` is the re-projected
    /// screen position of the pin, `None` while hidden.
    ViewportChanged {
        scale: f64,
        offset_x: f64,
        offset_y: f64,
        pin: Option<(f64, f64)>,
    },
}

pub type ListenerId = u64;

type Listener<E> = Box<dyn FnMut(&E)>;

/// Single-threaded list of listeners, called in subscription order.
pub struct EventBus<E> {
    next_id: ListenerId,
    listeners: Vec<(ListenerId, Listener<E>)>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&E) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` if no listener had this id.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: &E) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
