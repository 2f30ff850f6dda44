pub mod compare;
pub mod diff;
pub mod explain;
pub mod output;
