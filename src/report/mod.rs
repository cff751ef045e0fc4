pub mod html;
pub mod report;
pub mod composer;

pub use report::Report;
pub use composer::{ReportComposer, CHECKPOINT_TAIL, END_TAIL};
