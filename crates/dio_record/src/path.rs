use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Root,
    Field(&'a str),
    Index(usize),
    Key(&'a str),
}

/// Location of a value inside the record being processed.
///
/// Paths are built on the stack while recursing: every child borrows its
/// parent, so extending a path never allocates. Rendering joins the segments
/// with dots, e.g. `parent.children.3.name`.
///
/// # Examples
///
/// ```
/// use dio_record::FieldPath;
///
/// let root = FieldPath::ROOT;
/// let children = root.field("children");
/// let third = children.index(3);
/// let name = third.field("name");
///
/// assert_eq!(name.to_string(), "children.3.name");
/// assert_eq!(root.to_string(), "");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FieldPath<'a> {
    parent: Option<&'a FieldPath<'a>>,
    segment: Segment<'a>,
}

impl<'a> FieldPath<'a> {
    /// The empty path of the top-level record.
    pub const ROOT: FieldPath<'static> = FieldPath {
        parent: None,
        segment: Segment::Root,
    };

    /// Extends the path with a record field name.
    #[inline]
    pub fn field<'b>(&'b self, name: &'b str) -> FieldPath<'b> {
        FieldPath {
            parent: Some(self),
            segment: Segment::Field(name),
        }
    }

    /// Extends the path with a sequence position.
    #[inline]
    pub fn index(&self, index: usize) -> FieldPath<'_> {
        FieldPath {
            parent: Some(self),
            segment: Segment::Index(index),
        }
    }

    /// Extends the path with a dict key (already in its stored string form).
    #[inline]
    pub fn key<'b>(&'b self, key: &'b str) -> FieldPath<'b> {
        FieldPath {
            parent: Some(self),
            segment: Segment::Key(key),
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        matches!(self.segment, Segment::Root) && self.parent.is_none()
    }

    fn write_to(&self, f: &mut fmt::Formatter<'_>) -> Result<bool, fmt::Error> {
        let written = match self.parent {
            Some(parent) => parent.write_to(f)?,
            None => false,
        };

        let sep = if written { "." } else { "" };
        match self.segment {
            Segment::Root => Ok(written),
            Segment::Field(name) | Segment::Key(name) => {
                write!(f, "{sep}{name}")?;
                Ok(true)
            }
            Segment::Index(index) => {
                write!(f, "{sep}{index}")?;
                Ok(true)
            }
        }
    }
}

impl fmt::Display for FieldPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::FieldPath;

    #[test]
    fn render() {
        let root = FieldPath::ROOT;
        assert!(root.is_root());

        let a = root.field("a");
        let k = a.key("red");
        let i = k.index(0);
        assert!(!i.is_root());
        assert_eq!(i.to_string(), "a.red.0");

        let top = root.index(7);
        assert_eq!(top.to_string(), "7");
    }
}
