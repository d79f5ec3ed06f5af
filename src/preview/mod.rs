// Preview pipeline: session lifecycle, debounced regeneration, artifact
// ownership, and the local view state that survives regenerations.

pub mod artifact;
pub mod orchestrator;
pub mod pagination;
pub mod session;
pub mod stats;
pub mod viewport;
