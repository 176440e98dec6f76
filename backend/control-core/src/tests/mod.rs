mod error;
mod guard;
mod model;
