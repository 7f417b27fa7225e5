//! Controller layer: view state machines for login and the employee list, plus the
//! navigation and dialog seams they drive.

pub mod dialogs;
pub mod employee_list;
pub mod events;
pub mod login;
pub mod navigation;

#[cfg(test)]
#[path = "tests/fakes.rs"]
mod fakes;
