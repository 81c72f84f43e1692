mod common;
mod gate_middleware_test;
