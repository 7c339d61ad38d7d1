mod study;

pub use study::StudyView;
