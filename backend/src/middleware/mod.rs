pub mod locale;

pub use locale::locale_gate_middleware;
