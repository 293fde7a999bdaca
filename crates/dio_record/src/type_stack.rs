//! Stack of record types currently being processed.
//!
//! Only tracked in debug builds with the `debug` feature; otherwise every
//! method is a no-op and the stack is zero-sized.

#[derive(Debug, Default, Clone)]
pub(crate) struct TypeStack {
    #[cfg(all(debug_assertions, feature = "debug"))]
    stack: Vec<&'static str>,
}

impl TypeStack {
    #[inline]
    pub const fn new() -> Self {
        Self {
            #[cfg(all(debug_assertions, feature = "debug"))]
            stack: Vec::new(),
        }
    }

    #[inline(always)]
    pub fn push(&mut self, _type_path: &'static str) {
        #[cfg(all(debug_assertions, feature = "debug"))]
        self.stack.push(_type_path);
    }

    #[inline(always)]
    pub fn pop(&mut self) {
        #[cfg(all(debug_assertions, feature = "debug"))]
        self.stack.pop();
    }

    /// Renders the stack as `` `A` -> `B` ``, outermost first.
    pub fn render(&self) -> Option<String> {
        #[cfg(all(debug_assertions, feature = "debug"))]
        {
            if self.stack.is_empty() {
                return None;
            }
            let parts: Vec<String> = self.stack.iter().map(|p| format!("`{p}`")).collect();
            Some(parts.join(" -> "))
        }
        #[cfg(not(all(debug_assertions, feature = "debug")))]
        {
            None
        }
    }
}

#[cfg(all(test, debug_assertions, feature = "debug"))]
mod tests {
    use super::TypeStack;

    #[test]
    fn render() {
        let mut stack = TypeStack::new();
        assert_eq!(stack.render(), None);
        stack.push("a::Outer");
        stack.push("a::Inner");
        assert_eq!(stack.render().as_deref(), Some("`a::Outer` -> `a::Inner`"));
        stack.pop();
        assert_eq!(stack.render().as_deref(), Some("`a::Outer`"));
    }
}
