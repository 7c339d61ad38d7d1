mod markup_vm;
mod study_vm;

pub use markup_vm::{sanitize_markup, strip_markup};
pub use study_vm::{CardFaceVm, ShellPhase, ShellVm, SignalView, StudyIntent, intent_for_key};
