mod progress;

pub use progress::AssociateProgress;
