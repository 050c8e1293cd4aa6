//! Pipeline stages for case-file analysis.
//!
//! Each submodule implements exactly one transformation step. Keeping
//! stages separate makes each independently testable and lets us swap an
//! implementation (a different inference backend, a different page size)
//! without touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ prompt ──▶ completion ──▶ layout ──▶ render
//! (per file)  (budget)   (Ollama)       (pure)     (txt + pdf)
//! ```
//!
//! 1. [`extract`]    — decode each uploaded file into a marker-delimited
//!    text block; failures degrade to inline diagnostics, never errors
//! 2. [`crate::prompt`] — join blocks, cut to the character budget, prepend
//!    the frozen nine-section instruction template
//! 3. [`completion`] — one non-streaming round-trip to the local model; the
//!    only stage with network I/O
//! 4. [`layout`]     — pure wrap/paginate of the answer onto A4 pages
//! 5. [`render`]     — serialise the answer verbatim as text and via the
//!    layout as PDF

pub mod completion;
pub mod extract;
pub mod layout;
pub mod render;
