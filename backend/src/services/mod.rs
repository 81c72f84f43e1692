pub mod cookie_writer;
pub mod gate_service;
pub mod path_classifier;
pub mod session_provider;

pub use gate_service::{LocaleGate, Route};
pub use path_classifier::{PathClass, PathClassifier, PathPrefixes};
pub use session_provider::{HttpSessionProvider, SessionProvider};
