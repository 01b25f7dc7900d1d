mod common;
mod guard;
mod submission;
