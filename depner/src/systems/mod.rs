//! Transition systems.

mod joint;
pub use self::joint::JointSystem;

mod labeling;
pub use self::labeling::LabelingSystem;
