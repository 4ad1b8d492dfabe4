use std::sync::Arc;

use ctrltk_core::CredentialStore;

use crate::capture::ScreenCapturer;
use crate::inject::InputInjector;

/// Shared, read-only application state: the credential store plus the two
/// host collaborator seams. Everything is immutable after startup, so
/// concurrent requests need no locking.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    credentials: CredentialStore,
    capturer: Box<dyn ScreenCapturer>,
    injector: Box<dyn InputInjector>,
}

impl AppState {
    pub fn new(
        credentials: CredentialStore,
        capturer: impl ScreenCapturer + 'static,
        injector: impl InputInjector + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                credentials,
                capturer: Box::new(capturer),
                injector: Box::new(injector),
            }),
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.inner.credentials
    }

    pub fn capturer(&self) -> &dyn ScreenCapturer {
        self.inner.capturer.as_ref()
    }

    pub fn injector(&self) -> &dyn InputInjector {
        self.inner.injector.as_ref()
    }
}
