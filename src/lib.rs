#![allow(clippy::module_inception)]

use std::rc::Rc;

pub mod ast;
pub mod builtins;
pub mod context;
pub mod errors;
pub mod type_checker;

extern crate regex;

/// Byte offset into a named source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }

    pub fn is_null(&self) -> bool {
        self.0 == 0 && self.1.as_str() == "<null>"
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::Position;

    #[test]
    fn test_null_position() {
        assert!(Position::null().is_null());
        assert!(!Position(0, Rc::new(String::from("main.tl"))).is_null());
        assert!(!Position(7, Rc::new(String::from("<null>"))).is_null());
    }
}
