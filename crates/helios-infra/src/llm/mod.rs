//! Generative provider backends.

pub mod gemini;
