//! Synchronous property-change notification.
//!
//! # Design Decisions
//! - Callbacks run on the mutating thread, in mutation order, one call per change
//! - Each notification walks a snapshot of the observer list, so callbacks may
//!   subscribe or unsubscribe (themselves included) while being notified
//! - A callback removed mid-notification is not called for the rest of that round
//! - Single-threaded: `Rc` + `RefCell`, not `Send`

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// An observable field of the staging record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Addresses,
    DnsServers,
    ExcludedApplications,
    IncludedApplications,
    ListenPort,
    Mtu,
    PrivateKey,
    /// Derived from `PrivateKey`; never stored.
    PublicKey,
    Jc,
    Jmin,
    Jmax,
    S1,
    S2,
    H1,
    H2,
    H3,
    H4,
}

impl Property {
    /// Binding name used by editing surfaces.
    pub fn name(&self) -> &'static str {
        match self {
            Property::Addresses => "addresses",
            Property::DnsServers => "dnsServers",
            Property::ExcludedApplications => "excludedApplications",
            Property::IncludedApplications => "includedApplications",
            Property::ListenPort => "listenPort",
            Property::Mtu => "mtu",
            Property::PrivateKey => "privateKey",
            Property::PublicKey => "publicKey",
            Property::Jc => "jc",
            Property::Jmin => "jmin",
            Property::Jmax => "jmax",
            Property::S1 => "s1",
            Property::S2 => "s2",
            Property::H1 => "h1",
            Property::H2 => "h2",
            Property::H3 => "h3",
            Property::H4 => "h4",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handle returned by [`PropertyChangeRegistry::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<S> = Rc<dyn Fn(&S, Property)>;

/// Observer list for a sender of type `S`.
pub struct PropertyChangeRegistry<S> {
    next_id: Cell<u64>,
    callbacks: RefCell<Vec<(SubscriptionId, Callback<S>)>>,
}

impl<S> PropertyChangeRegistry<S> {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            callbacks: RefCell::new(Vec::new()),
        }
    }

    /// Register a callback for every subsequent change.
    pub fn subscribe(&self, callback: impl Fn(&S, Property) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.callbacks.borrow_mut().push((id, Rc::new(callback)));
        id
    }

    /// Remove a callback. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut callbacks = self.callbacks.borrow_mut();
        let before = callbacks.len();
        callbacks.retain(|(existing, _)| *existing != id);
        callbacks.len() != before
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.callbacks.borrow().iter().any(|(existing, _)| *existing == id)
    }

    /// Deliver `property` to every registered callback.
    pub fn notify(&self, sender: &S, property: Property) {
        let snapshot: Vec<(SubscriptionId, Callback<S>)> = self.callbacks.borrow().clone();
        for (id, callback) in snapshot {
            if self.is_subscribed(id) {
                callback(sender, property);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.borrow().is_empty()
    }
}

impl<S> Default for PropertyChangeRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for PropertyChangeRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyChangeRegistry")
            .field("observers", &self.len())
            .finish()
    }
}
