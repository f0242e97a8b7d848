//! Workspace tooling package. It only exists to carry the pre-commit hook
//! configuration; the code lives under `crates/`.
