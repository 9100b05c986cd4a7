//! Pointer interaction: candidate sets, constrained dragging, selection
//! highlight and the camera orbit gate they share.

pub mod arbiter;
pub mod candidates;
pub mod drag;
pub mod selection;

pub use arbiter::CameraOrbitArbiter;
pub use candidates::{CandidatePool, CandidateSet, InteractionMode, TargetPolicy};
pub use drag::{AxisConstraint, DragConstraintController, DragPhase, DragSession, HandleSpec, ViewContext};
pub use selection::SelectionHighlighter;
