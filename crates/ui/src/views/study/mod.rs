mod components;
mod view;

#[cfg(test)]
mod view_smoke;

pub use view::StudyView;
