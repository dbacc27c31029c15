use crate::observable::{Observable, Subscription};

/// Global "work in progress" flag driving the loading overlay.
#[derive(Debug, Clone, Default)]
pub struct LoadingIndicator {
    loading: Observable<bool>,
}

impl LoadingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) {
        self.loading.set(true);
    }

    pub fn stop(&self) {
        self.loading.set(false);
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn subscribe(&self, listener: impl Fn(&bool) + Send + Sync + 'static) -> Subscription {
        self.loading.subscribe(listener)
    }
}
