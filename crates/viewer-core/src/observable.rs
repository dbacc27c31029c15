//! Single-value observable cell.
//!
//! A cell owns its value and a list of listeners. `set` and `update` notify
//! every listener synchronously, in the order they subscribed. Listeners run
//! after the internal lock is released, so a listener may read the cell it
//! is subscribed to.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: T,
    listeners: Vec<(u64, Listener<T>)>,
    next_listener_id: u64,
}

pub struct Observable<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T: Default + Clone + Send + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> std::fmt::Debug for Observable<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl<T> Observable<T>
where
    T: Clone + Send + 'static,
{
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                value,
                listeners: Vec::new(),
                next_listener_id: 0,
            })),
        }
    }

    pub fn get(&self) -> T {
        lock(&self.inner).value.clone()
    }

    /// Borrow the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&lock(&self.inner).value)
    }

    pub fn set(&self, value: T) {
        self.update(|current| *current = value);
    }

    /// Mutate the value in place, then notify listeners once.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let (snapshot, listeners) = {
            let mut inner = lock(&self.inner);
            f(&mut inner.value);
            let listeners: Vec<Listener<T>> =
                inner.listeners.iter().map(|(_, listener)| Arc::clone(listener)).collect();
            (inner.value.clone(), listeners)
        };

        for listener in listeners {
            listener(&snapshot);
        }
    }

    /// Register a listener. It is called immediately with the current value and
    /// again after every change until the returned subscription is dropped.
    pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let listener: Listener<T> = Arc::new(listener);

        let (id, current) = {
            let mut inner = lock(&self.inner);
            let id = inner.next_listener_id;
            inner.next_listener_id += 1;
            inner.listeners.push((id, Arc::clone(&listener)));
            (id, inner.value.clone())
        };

        listener(&current);

        let weak: Weak<Mutex<Inner<T>>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                lock(&inner).listeners.retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.inner).listeners.len()
    }
}

fn lock<T>(inner: &Mutex<Inner<T>>) -> MutexGuard<'_, Inner<T>> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle returned by [`Observable::subscribe`]. Dropping it unsubscribes.
///
/// The handle only holds a weak reference to the cell, so it never keeps the
/// cell alive on its own.
#[must_use = "dropping a subscription unsubscribes its listener"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new(unsubscribe: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self { unsubscribe: Some(Box::new(unsubscribe)) }
    }

    pub fn unsubscribe(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("active", &self.unsubscribe.is_some()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder<T: Clone + Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(&T) + Send + Sync) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |value: &T| sink.lock().unwrap().push(value.clone()))
    }

    #[test]
    fn subscribe_delivers_current_value_then_changes() {
        let cell = Observable::new(1_u32);
        let (seen, listener) = recorder::<u32>();

        let _sub = cell.subscribe(listener);
        cell.set(2);
        cell.set(3);

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn last_set_wins() {
        let cell = Observable::new(0.0_f64);
        for value in [1.2, 3.4, 0.6] {
            cell.set(value);
        }
        assert_eq!(cell.get(), 0.6);
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let cell = Observable::new(0_u8);
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&order);
        let _a = cell.subscribe(move |v| first.lock().unwrap().push(("a", *v)));
        let second = Arc::clone(&order);
        let _b = cell.subscribe(move |v| second.lock().unwrap().push(("b", *v)));

        order.lock().unwrap().clear();
        cell.set(7);

        assert_eq!(*order.lock().unwrap(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn dropping_subscription_stops_notifications() {
        let cell = Observable::new(String::from("a"));
        let (seen, listener) = recorder::<String>();

        let sub = cell.subscribe(listener);
        cell.set("b".to_owned());
        drop(sub);
        cell.set("c".to_owned());

        assert_eq!(*seen.lock().unwrap(), vec!["a".to_owned(), "b".to_owned()]);
        assert_eq!(cell.listener_count(), 0);
    }

    #[test]
    fn listener_may_read_the_cell() {
        let cell = Observable::new(1_i32);
        let reader = cell.clone();
        let observed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&observed);

        let _sub = cell.subscribe(move |_| sink.lock().unwrap().push(reader.get()));
        cell.set(5);

        assert_eq!(*observed.lock().unwrap(), vec![1, 5]);
    }

    #[test]
    fn subscription_outliving_cell_is_harmless() {
        let cell = Observable::new(0_u8);
        let sub = cell.subscribe(|_| {});
        drop(cell);
        sub.unsubscribe();
    }

    #[test]
    fn update_mutates_in_place() {
        let cell = Observable::new(vec![1, 2]);
        cell.update(|values| values.push(3));
        assert_eq!(cell.with(|values| values.len()), 3);
    }
}
